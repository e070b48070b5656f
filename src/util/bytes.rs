/*!
A collection of helper functions and error types for serializing automata.

The serialized form of a [`FiniteAutomaton`](crate::FiniteAutomaton) is a
small bespoke binary format: a one byte version number, the start state, the
number of states and then, for each state in ID order, its 256 transitions
followed by a one byte accept flag. All multi-byte integers are written in
little endian, so a serialized automaton can be moved between targets of
different endianness.

Unlike the formats used by zero-copy DFAs, nothing here needs alignment or
padding. Deserialization always copies into a freshly allocated table and
validates every state ID it reads, so arbitrary bytes can never produce an
automaton that indexes out of bounds.
*/

use core::convert::TryInto;

use crate::util::id::{StateID, StateIDError};

/// An error that occurs when serializing an automaton.
///
/// Serialization is infallible when using APIs that allocate their own
/// buffer. When writing into a caller provided buffer, it can fail if the
/// buffer is too small or if the caller requested a format version that this
/// crate cannot produce.
///
/// A `SerializeError` provides no introspection capabilities. Its only
/// supported operation is conversion to a human readable error message.
#[derive(Debug)]
pub struct SerializeError(SerializeErrorKind);

#[derive(Debug)]
enum SerializeErrorKind {
    BufferTooSmall { what: &'static str },
    UnsupportedVersion { requested: u8, max: u8 },
}

impl SerializeError {
    pub(crate) fn buffer_too_small(what: &'static str) -> SerializeError {
        SerializeError(SerializeErrorKind::BufferTooSmall { what })
    }

    pub(crate) fn unsupported_version(
        requested: u8,
        max: u8,
    ) -> SerializeError {
        let kind = SerializeErrorKind::UnsupportedVersion { requested, max };
        SerializeError(kind)
    }
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.0 {
            SerializeErrorKind::BufferTooSmall { what } => {
                write!(f, "destination buffer is too small to write {}", what)
            }
            SerializeErrorKind::UnsupportedVersion { requested, max } => {
                write!(
                    f,
                    "cannot write version {} of the serialization format, \
                     the maximum supported version is {}",
                    requested, max,
                )
            }
        }
    }
}

impl std::error::Error for SerializeError {}

/// An error that occurs when deserializing an automaton.
///
/// Whenever this error is returned, the automaton being deserialized into
/// (if any) has not been modified.
///
/// A `DeserializeError` provides no introspection capabilities. Its only
/// supported operation is conversion to a human readable error message.
#[derive(Debug)]
pub struct DeserializeError(DeserializeErrorKind);

#[derive(Debug)]
enum DeserializeErrorKind {
    Generic { msg: &'static str },
    BufferTooSmall { what: &'static str },
    VersionMismatch { max: u8, found: u8 },
    InvalidFlag { what: &'static str, found: u8 },
    StateOutOfRange { what: &'static str, id: StateID, count: usize },
    StateID(StateIDError),
}

impl DeserializeError {
    pub(crate) fn generic(msg: &'static str) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::Generic { msg })
    }

    pub(crate) fn buffer_too_small(what: &'static str) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::BufferTooSmall { what })
    }

    fn version_mismatch(max: u8, found: u8) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::VersionMismatch { max, found })
    }

    fn invalid_flag(what: &'static str, found: u8) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::InvalidFlag { what, found })
    }

    pub(crate) fn state_out_of_range(
        what: &'static str,
        id: StateID,
        count: usize,
    ) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::StateOutOfRange {
            what,
            id,
            count,
        })
    }

    fn state_id_error(err: StateIDError) -> DeserializeError {
        DeserializeError(DeserializeErrorKind::StateID(err))
    }
}

impl std::error::Error for DeserializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.0 {
            DeserializeErrorKind::StateID(ref err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::DeserializeErrorKind::*;

        match self.0 {
            Generic { msg } => write!(f, "{}", msg),
            BufferTooSmall { what } => {
                write!(f, "buffer is too small to read {}", what)
            }
            VersionMismatch { max, found } => write!(
                f,
                "unsupported version: \
                 expected version at most {} but found version {}",
                max, found,
            ),
            InvalidFlag { what, found } => write!(
                f,
                "invalid {}: expected 0 or 1 but found {}",
                what, found,
            ),
            StateOutOfRange { what, id, count } => write!(
                f,
                "{} refers to state {} but only {} states exist",
                what,
                id.as_usize(),
                count,
            ),
            StateID(ref err) => err.fmt(f),
        }
    }
}

impl From<StateIDError> for DeserializeError {
    fn from(err: StateIDError) -> DeserializeError {
        DeserializeError::state_id_error(err)
    }
}

/// Reads a version number from the beginning of the given slice and confirms
/// that this crate knows how to read it. Any version from `1` up to and
/// including `max_version` is accepted.
///
/// Upon success, the version number found is returned.
pub(crate) fn read_version(
    slice: &[u8],
    max_version: u8,
) -> Result<u8, DeserializeError> {
    let n = try_read_u8(slice, "version")?;
    if n == 0 || n > max_version {
        return Err(DeserializeError::version_mismatch(max_version, n));
    }
    Ok(n)
}

/// Writes the given version number to the beginning of the given slice.
///
/// Upon success, the total number of bytes written is returned.
pub(crate) fn write_version(
    version: u8,
    dst: &mut [u8],
) -> Result<usize, SerializeError> {
    if dst.is_empty() {
        return Err(SerializeError::buffer_too_small("version number"));
    }
    dst[0] = version;
    Ok(1)
}

/// Reads a boolean encoded as a single `0` or `1` byte. Any other value is
/// an error.
pub(crate) fn try_read_bool(
    slice: &[u8],
    what: &'static str,
) -> Result<bool, DeserializeError> {
    match try_read_u8(slice, what)? {
        0 => Ok(false),
        1 => Ok(true),
        n => Err(DeserializeError::invalid_flag(what, n)),
    }
}

/// Writes a boolean as a single `0` or `1` byte. The given slice must not be
/// empty, or else this panics.
pub(crate) fn write_bool(yes: bool, dst: &mut [u8]) -> usize {
    dst[0] = if yes { 1 } else { 0 };
    1
}

/// Attempts to read a state ID from the given slice. If the slice has an
/// insufficient number of bytes or if the state ID exceeds the limit for
/// the current target, then this returns an error.
pub(crate) fn try_read_state_id(
    slice: &[u8],
    what: &'static str,
) -> Result<StateID, DeserializeError> {
    if slice.len() < StateID::SIZE {
        return Err(DeserializeError::buffer_too_small(what));
    }
    Ok(StateID::from_le_bytes(slice[..StateID::SIZE].try_into().unwrap())?)
}

/// Write the given state ID to the beginning of the given slice of bytes in
/// little endian. The given slice must have length at least
/// `StateID::SIZE`, or else this panics. Upon success, the total number of
/// bytes written is returned.
pub(crate) fn write_state_id(sid: StateID, dst: &mut [u8]) -> usize {
    dst[..StateID::SIZE].copy_from_slice(&sid.to_le_bytes());
    StateID::SIZE
}

/// Try to read a u32 as a usize from the beginning of the given slice in
/// little endian format. If the slice has fewer than 4 bytes, then this
/// returns an error. The error message will include the `what` description
/// of what is being deserialized, for better error messages. `what` should
/// be a noun in singular form.
pub(crate) fn try_read_u32_as_usize(
    slice: &[u8],
    what: &'static str,
) -> Result<usize, DeserializeError> {
    if slice.len() < 4 {
        return Err(DeserializeError::buffer_too_small(what));
    }
    let n = u32::from_le_bytes(slice[..4].try_into().unwrap());
    n.try_into()
        .map_err(|_| DeserializeError::generic("u32 does not fit usize"))
}

/// Write the given usize as a little endian u32. If it doesn't fit, then
/// this panics. The given slice must have length at least 4.
pub(crate) fn write_usize_as_u32(n: usize, dst: &mut [u8]) -> usize {
    let n: u32 = n.try_into().expect("count must fit in a u32");
    dst[..4].copy_from_slice(&n.to_le_bytes());
    4
}

/// Try to read a single byte from the beginning of the given slice.
pub(crate) fn try_read_u8(
    slice: &[u8],
    what: &'static str,
) -> Result<u8, DeserializeError> {
    match slice.first() {
        None => Err(DeserializeError::buffer_too_small(what)),
        Some(&b) => Ok(b),
    }
}
