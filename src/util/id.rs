/*!
Type definitions for state identifiers.

A [`StateID`] identifies a single state in a [`FiniteAutomaton`]'s transition
table. It is a thin `u32` wrapper whose range is clamped to
[`StateID::MAX`], which means the number of states in any automaton always
fits into a `u32`, a `usize` and an `i32`.

[`FiniteAutomaton`]: crate::FiniteAutomaton
*/

use core::{convert::TryFrom, mem, ops};

/// An identifier for a state in a finite automaton.
///
/// The identifier `0` is reserved for the dead state, which is available as
/// [`StateID::DEAD`]. The dead state is never accepting and every one of its
/// transitions leads back to itself. Every other identifier refers to a state
/// that was created by one of the construction routines on
/// [`FiniteAutomaton`](crate::FiniteAutomaton).
///
/// # Representation
///
/// This type is always represented internally by a `u32` and is marked as
/// `repr(transparent)`.
///
/// # Indexing
///
/// For convenience, callers may use a `StateID` to index slices and vectors.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct StateID(u32);

impl StateID {
    /// The maximum state ID value.
    pub const MAX: StateID =
        StateID::new_unchecked(core::i32::MAX as usize - 1);

    /// The total number of states that are allowed in any single automaton,
    /// represented as a `usize`.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    /// The zero state ID value.
    pub const ZERO: StateID = StateID::new_unchecked(0);

    /// The identifier of the dead state. This is always equivalent to
    /// [`StateID::ZERO`].
    pub const DEAD: StateID = StateID::ZERO;

    /// The number of bytes that a single `StateID` uses in memory.
    pub const SIZE: usize = core::mem::size_of::<StateID>();

    /// Create a new state ID.
    ///
    /// If the given identifier exceeds [`StateID::MAX`], then this returns
    /// an error.
    #[inline]
    pub fn new(id: usize) -> Result<StateID, StateIDError> {
        StateID::try_from(id)
    }

    /// Create a new state ID without checking whether the given value
    /// exceeds [`StateID::MAX`].
    #[inline]
    pub const fn new_unchecked(id: usize) -> StateID {
        StateID(id as u32)
    }

    /// Like [`StateID::new`], but panics if the given ID is not valid.
    #[inline]
    pub fn must(id: usize) -> StateID {
        StateID::new(id).unwrap()
    }

    /// Return this state ID as a `usize`.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal u32 of this state ID.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true if and only if this is the dead state.
    #[inline]
    pub const fn is_dead(&self) -> bool {
        self.0 == 0
    }

    /// Decode a state ID from the little endian bytes given.
    ///
    /// If the decoded integer is not representable as a state ID, then this
    /// returns an error.
    #[inline]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Result<StateID, StateIDError> {
        StateID::try_from(u32::from_le_bytes(bytes))
    }

    /// Return the underlying state ID integer as raw bytes in little endian
    /// format.
    #[inline]
    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Returns an iterator over all state IDs from 0 up to and not including
    /// the given length.
    ///
    /// If the given length exceeds [`StateID::LIMIT`], then this panics.
    pub(crate) fn iter(len: usize) -> StateIDIter {
        StateIDIter::new(len)
    }
}

/// This error occurs when a state ID could not be constructed.
///
/// This occurs when given an integer exceeding the maximum state ID value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateIDError {
    attempted: u64,
}

impl StateIDError {
    /// Returns the value that failed to constructed a state ID.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

impl std::error::Error for StateIDError {}

impl core::fmt::Display for StateIDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create StateID from {:?}, which exceeds {:?}",
            self.attempted(),
            StateID::MAX,
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StateIDIter {
    rng: ops::Range<usize>,
}

impl StateIDIter {
    fn new(len: usize) -> StateIDIter {
        assert!(
            len <= StateID::LIMIT,
            "cannot create iterator with IDs when number of \
             elements exceed {:?}",
            StateID::LIMIT,
        );
        StateIDIter { rng: 0..len }
    }
}

impl Iterator for StateIDIter {
    type Item = StateID;

    fn next(&mut self) -> Option<StateID> {
        if self.rng.start >= self.rng.end {
            return None;
        }
        let next_id = self.rng.start + 1;
        let id = mem::replace(&mut self.rng.start, next_id);
        // new_unchecked is OK since we asserted that the number of
        // elements in this iterator will fit in an ID at construction.
        Some(StateID::new_unchecked(id))
    }
}

impl<T> ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl<T> ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl TryFrom<usize> for StateID {
    type Error = StateIDError;

    fn try_from(id: usize) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_usize() {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id))
    }
}

impl TryFrom<u32> for StateID {
    type Error = StateIDError;

    fn try_from(id: u32) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_u32() {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id as usize))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for StateID {
    fn arbitrary(gen: &mut quickcheck::Gen) -> StateID {
        use core::cmp::max;

        let id = max(i32::MIN + 1, i32::arbitrary(gen)).abs();
        if id > StateID::MAX.as_u32() as i32 {
            StateID::MAX
        } else {
            StateID::new(usize::try_from(id).unwrap()).unwrap()
        }
    }
}

/// A utility trait for attaching state IDs to the elements of an iterator.
/// We require ExactSizeIterator so that iterator construction can do a
/// single check to make sure the index of each element is representable.
pub(crate) trait IteratorIDExt: Iterator {
    fn with_state_ids(self) -> WithStateIDIter<Self>
    where
        Self: Sized + ExactSizeIterator,
    {
        WithStateIDIter::new(self)
    }
}

impl<I: Iterator> IteratorIDExt for I {}

/// An iterator adapter that is like std::iter::Enumerate, but attaches state
/// IDs.
#[derive(Clone, Debug)]
pub(crate) struct WithStateIDIter<I> {
    it: I,
    ids: StateIDIter,
}

impl<I: Iterator + ExactSizeIterator> WithStateIDIter<I> {
    fn new(it: I) -> WithStateIDIter<I> {
        let ids = StateID::iter(it.len());
        WithStateIDIter { it, ids }
    }
}

impl<I: Iterator + ExactSizeIterator> Iterator for WithStateIDIter<I> {
    type Item = (StateID, I::Item);

    fn next(&mut self) -> Option<(StateID, I::Item)> {
        let item = self.it.next()?;
        // Number of elements in this iterator must match, according
        // to contract of ExactSizeIterator.
        let id = self.ids.next().unwrap();
        Some((id, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_is_zero() {
        assert_eq!(StateID::DEAD, StateID::ZERO);
        assert!(StateID::DEAD.is_dead());
        assert!(!StateID::must(1).is_dead());
    }

    #[test]
    fn limit() {
        assert!(StateID::new(StateID::MAX.as_usize()).is_ok());
        let err = StateID::new(StateID::LIMIT).unwrap_err();
        assert_eq!(StateID::LIMIT as u64, err.attempted());
        assert!(StateID::from_le_bytes(u32::MAX.to_le_bytes()).is_err());
    }

    quickcheck::quickcheck! {
        fn prop_le_bytes_roundtrip(sid: StateID) -> bool {
            StateID::from_le_bytes(sid.to_le_bytes()) == Ok(sid)
        }
    }
}
