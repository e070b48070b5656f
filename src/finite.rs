/*!
The mutable, always-deterministic finite automaton and its configuration.
*/

use core::{fmt, mem, ops};

use crate::{
    accumulator::Accumulator,
    automaton::Automaton,
    determinize::Determinizer,
    minimize::Minimizer,
    nfa::NFA,
    table::{State, StateTable, ALPHABET_LEN},
    util::{
        bytes::{self, DeserializeError, SerializeError},
        id::StateID,
    },
};

/// The latest version of the serialization format. This is the version
/// written by [`FiniteAutomaton::to_bytes`].
const VERSION: u8 = 1;

/// The number of bytes a single state occupies when serialized: one state ID
/// per byte value followed by the accept flag.
const SERIALIZED_STATE_LEN: usize = ALPHABET_LEN * StateID::SIZE + 1;

/// The configuration used when combining automata.
///
/// A configuration is attached to a [`FiniteAutomaton`] when it is created
/// via [`FiniteAutomaton::new_with_config`] and applies to every subsequent
/// structural operation on it. Automata produced by the binary operators
/// (`+` and `|`) inherit the configuration of their left operand.
///
/// Configuration has no effect on the language recognized. It only affects
/// the shape of the transition table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    minimize: Option<bool>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Minimize the transition table after every structural operation.
    ///
    /// Subset construction only ever creates reachable states, but it can
    /// still create several states that are equivalent. When this is
    /// enabled, equivalent states are merged after each operation, which
    /// keeps tables small when an automaton is edited many times. The cost
    /// is extra work on every edit.
    ///
    /// This is disabled by default.
    pub fn minimize(mut self, yes: bool) -> Config {
        self.minimize = Some(yes);
        self
    }

    /// Returns whether this configuration has minimization enabled.
    pub fn get_minimize(&self) -> bool {
        self.minimize.unwrap_or(false)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config { minimize: o.minimize.or(self.minimize) }
    }
}

/// A deterministic finite automaton over bytes that can be edited in place.
///
/// A new automaton recognizes exactly the empty string. Its language can then
/// be extended with the `append` family of methods, combined with other
/// automata via [`concat`](FiniteAutomaton::concat) (`+=`) and
/// [`union`](FiniteAutomaton::union) (`|=`), and closed under
/// [Kleene star](FiniteAutomaton::assign_kleene_star).
///
/// Every one of these operations leaves the automaton fully deterministic:
/// each state has exactly one transition for every byte, with a dedicated
/// dead state standing in for "no match is possible anymore". This means
/// matching costs a single table lookup per byte of input, regardless of
/// how the automaton was built. The trade off is that edits are relatively
/// expensive, since most of them rerun subset construction over the whole
/// automaton.
///
/// To run an automaton, either use [`FiniteAutomaton::is_match`] or create
/// one or more [`Accumulator`]s.
///
/// # Example
///
/// This builds an automaton for `[ab]c(abc)*`:
///
/// ```
/// use byte_automata::FiniteAutomaton;
///
/// let mut abc = FiniteAutomaton::new();
/// abc.append_sequence(b"abc");
/// abc.assign_kleene_star();
///
/// let mut fa = FiniteAutomaton::new();
/// fa.append_set(b"ab");
/// fa.append(b'c');
/// fa += &abc;
///
/// assert!(fa.is_match(b"ac"));
/// assert!(fa.is_match(b"bcabcabc"));
/// assert!(!fa.is_match(b"cc"));
/// assert!(!fa.is_match(b"acab"));
/// ```
#[derive(Clone)]
pub struct FiniteAutomaton {
    config: Config,
    table: StateTable,
    start: StateID,
    valid: bool,
}

impl FiniteAutomaton {
    /// Create a new automaton that recognizes only the empty string.
    pub fn new() -> FiniteAutomaton {
        FiniteAutomaton::new_with_config(Config::new())
    }

    /// Create a new automaton that recognizes only the empty string, and
    /// which uses the given configuration for all subsequent edits.
    pub fn new_with_config(config: Config) -> FiniteAutomaton {
        let mut fa = FiniteAutomaton {
            config: Config::new().overwrite(config),
            table: StateTable::new(),
            start: StateID::DEAD,
            valid: true,
        };
        fa.remove_all();
        fa
    }

    /// Returns the configuration of this automaton.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Extend every string in this automaton's language by `byte`.
    pub fn append(&mut self, byte: u8) {
        self.append_set(&[byte]);
    }

    /// Extend every string in this automaton's language by any one of the
    /// bytes in `set`. Duplicate bytes in `set` are ignored. Appending an
    /// empty set has no effect, just like appending an empty sequence.
    pub fn append_set(&mut self, set: &[u8]) {
        if set.is_empty() || !self.valid {
            return;
        }
        let mut piece = StateTable::new();
        let start = piece.add_state();
        let end = piece.add_state();
        for &b in set {
            piece.set_transition(start, b, end);
        }
        piece.set_accepting(end, true);
        self.concat_table(&piece, start);
    }

    /// Extend every string in this automaton's language by the entire
    /// sequence of bytes given. Appending an empty sequence has no effect.
    pub fn append_sequence(&mut self, sequence: &[u8]) {
        if sequence.is_empty() || !self.valid {
            return;
        }
        let mut piece = StateTable::new();
        let start = piece.add_state();
        let mut prev = start;
        for &b in sequence {
            let next = piece.add_state();
            piece.set_transition(prev, b, next);
            prev = next;
        }
        piece.set_accepting(prev, true);
        self.concat_table(&piece, start);
    }

    /// Replace this automaton's language with the concatenation of its
    /// language and the language of `other`. That is, the result accepts
    /// every `wv` such that this automaton accepts `w` and `other` accepts
    /// `v`.
    ///
    /// This is also available as `+=`.
    ///
    /// If `other` is invalid, then this automaton becomes invalid.
    pub fn concat(&mut self, other: &FiniteAutomaton) {
        if !other.valid {
            self.invalidate();
            return;
        }
        if !self.valid {
            return;
        }
        self.concat_table(&other.table, other.start);
    }

    /// Replace this automaton's language with the union of its language and
    /// the language of `other`.
    ///
    /// This is also available as `|=`.
    ///
    /// If `other` is invalid, then this automaton becomes invalid.
    pub fn union(&mut self, other: &FiniteAutomaton) {
        if !other.valid {
            self.invalidate();
            return;
        }
        if !self.valid {
            return;
        }
        let table = mem::take(&mut self.table);
        let nfa = NFA::union(table, self.start, &other.table, other.start);
        self.set_from_nfa(&nfa);
    }

    /// Replace this automaton's language `L` with `L*`: the empty string
    /// along with every concatenation of one or more strings from `L`.
    pub fn assign_kleene_star(&mut self) {
        if !self.valid {
            return;
        }
        let table = mem::take(&mut self.table);
        let nfa = NFA::kleene_star(table, self.start);
        self.set_from_nfa(&nfa);
    }

    /// Return a new automaton recognizing the Kleene star of this
    /// automaton's language, leaving this automaton unchanged.
    pub fn kleene_star(&self) -> FiniteAutomaton {
        let mut fa = self.clone();
        fa.assign_kleene_star();
        fa
    }

    /// Reset this automaton such that it recognizes only the empty string.
    ///
    /// This also makes an invalid automaton valid again.
    pub fn remove_all(&mut self) {
        self.table.clear();
        self.start = self.table.add_state();
        self.table.set_accepting(self.start, true);
        self.valid = true;
    }

    /// Mark this automaton as invalid.
    ///
    /// An invalid automaton recognizes nothing: every accumulator created
    /// from it reports an error immediately. Edits to an invalid automaton
    /// are ignored, and combining a valid automaton with an invalid one
    /// makes the result invalid. Only [`remove_all`] makes an automaton
    /// valid again.
    ///
    /// This exists so that higher level builders can record that a
    /// construction failed part way through.
    ///
    /// [`remove_all`]: FiniteAutomaton::remove_all
    pub fn invalidate(&mut self) {
        self.table.clear();
        self.start = StateID::DEAD;
        self.valid = false;
    }

    /// Returns false if and only if this automaton has been invalidated.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if and only if the entire haystack is in the language of
    /// this automaton.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        Automaton::is_match(self, haystack)
    }

    /// Create a new accumulator positioned at the start of this automaton.
    pub fn accumulator(&self) -> Accumulator<'_, FiniteAutomaton> {
        Accumulator::new(self)
    }

    /// Returns the start state of this automaton.
    pub fn start_state(&self) -> StateID {
        self.start
    }

    /// Returns the total number of states in this automaton, including the
    /// dead state.
    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Returns the underlying transition table.
    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Returns the heap memory usage, in bytes, of this automaton.
    pub fn memory_usage(&self) -> usize {
        self.table.memory_usage()
    }

    /// L ← L · L(table from start)
    fn concat_table(&mut self, other: &StateTable, other_start: StateID) {
        let table = mem::take(&mut self.table);
        let nfa = NFA::concat(table, self.start, other, other_start);
        self.set_from_nfa(&nfa);
    }

    /// Replace this automaton's table with the determinized form of `nfa`.
    fn set_from_nfa(&mut self, nfa: &NFA) {
        let (table, start) = Determinizer::new(nfa).build();
        let (table, start) = if self.config.get_minimize() {
            Minimizer::new(&table, start).run()
        } else {
            (table, start)
        };
        self.table = table;
        self.start = start;
    }
}

/// Serialization.
impl FiniteAutomaton {
    /// Returns the latest version of the serialization format that this
    /// crate can read and write.
    pub fn max_supported_version() -> u8 {
        VERSION
    }

    /// Serialize this automaton to a freshly allocated byte vector using the
    /// latest format version.
    ///
    /// Validity is not part of the serialized form. An invalid automaton
    /// serializes as an automaton recognizing nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use byte_automata::FiniteAutomaton;
    ///
    /// let mut fa = FiniteAutomaton::new();
    /// fa.append_set(b"xyz");
    /// fa.assign_kleene_star();
    ///
    /// let bytes = fa.to_bytes();
    /// let (restored, nread) = FiniteAutomaton::from_bytes(&bytes)?;
    /// assert_eq!(bytes.len(), nread);
    /// assert!(restored.is_match(b"zyxxy"));
    /// assert!(!restored.is_match(b"zyxxa"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0; self.write_to_len()];
        // OK since we just allocated a buffer of exactly the right size.
        let nwrite = self.write_to(&mut buf).unwrap();
        assert_eq!(nwrite, buf.len());
        buf
    }

    /// Serialize this automaton into `dst` using the latest format version,
    /// returning the number of bytes written.
    ///
    /// If `dst` is smaller than [`write_to_len`](Self::write_to_len), then
    /// this returns an error.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<usize, SerializeError> {
        self.write_to_version(VERSION, dst)
    }

    /// Serialize this automaton into `dst` using the given format version,
    /// returning the number of bytes written.
    ///
    /// If the version is not in the range `1..=max_supported_version()`, or
    /// if `dst` is too small, then this returns an error and `dst` is left
    /// in an unspecified state.
    pub fn write_to_version(
        &self,
        version: u8,
        dst: &mut [u8],
    ) -> Result<usize, SerializeError> {
        if version == 0 || version > VERSION {
            return Err(SerializeError::unsupported_version(version, VERSION));
        }
        if dst.len() < self.write_to_len() {
            return Err(SerializeError::buffer_too_small("finite automaton"));
        }
        let dst = &mut dst[..self.write_to_len()];

        let mut nw = bytes::write_version(version, dst)?;
        nw += bytes::write_state_id(self.start, &mut dst[nw..]);
        nw += bytes::write_usize_as_u32(self.table.len(), &mut dst[nw..]);
        for (_, state) in self.table.iter() {
            for &next in state.transitions().iter() {
                nw += bytes::write_state_id(next, &mut dst[nw..]);
            }
            nw += bytes::write_bool(state.is_accepting(), &mut dst[nw..]);
        }
        Ok(nw)
    }

    /// Returns the number of bytes that serializing this automaton will
    /// write.
    pub fn write_to_len(&self) -> usize {
        1 + StateID::SIZE + 4 + self.table.len() * SERIALIZED_STATE_LEN
    }

    /// Deserialize an automaton from the beginning of `slice`, returning it
    /// along with the number of bytes read.
    ///
    /// Every state ID in the input is checked, so this never produces an
    /// automaton that could index out of bounds. Every state other than the
    /// dead state must also be able to reach an accepting state, so that
    /// [`Accumulator::is_error`] stays exact. The returned automaton is
    /// valid and uses the default configuration.
    pub fn from_bytes(
        slice: &[u8],
    ) -> Result<(FiniteAutomaton, usize), DeserializeError> {
        let mut nr = 0;

        let _version = bytes::read_version(&slice[nr..], VERSION)?;
        nr += 1;

        let start = bytes::try_read_state_id(&slice[nr..], "start state")?;
        nr += StateID::SIZE;

        let count = bytes::try_read_u32_as_usize(&slice[nr..], "state count")?;
        nr += 4;
        if count == 0 {
            return Err(DeserializeError::generic(
                "automaton must contain at least the dead state",
            ));
        }
        if count > StateID::LIMIT {
            return Err(DeserializeError::generic(
                "state count exceeds the maximum number of states",
            ));
        }
        let states_len = match count.checked_mul(SERIALIZED_STATE_LEN) {
            Some(len) => len,
            None => {
                return Err(DeserializeError::generic(
                    "state table length overflows usize",
                ))
            }
        };
        if slice[nr..].len() < states_len {
            return Err(DeserializeError::buffer_too_small("state table"));
        }
        if start.as_usize() >= count {
            return Err(DeserializeError::state_out_of_range(
                "start state",
                start,
                count,
            ));
        }

        let mut states = Vec::with_capacity(count);
        for _ in 0..count {
            let mut state = State::new();
            for b in 0..=255 {
                let next =
                    bytes::try_read_state_id(&slice[nr..], "transition")?;
                nr += StateID::SIZE;
                if next.as_usize() >= count {
                    return Err(DeserializeError::state_out_of_range(
                        "transition",
                        next,
                        count,
                    ));
                }
                state.set_next(b, next);
            }
            let accepting = bytes::try_read_bool(&slice[nr..], "accept flag")?;
            state.set_accepting(accepting);
            nr += 1;
            states.push(state);
        }
        if !states[0].is_dead_like() {
            return Err(DeserializeError::generic(
                "first state must be a non-accepting state whose \
                 transitions all lead to itself",
            ));
        }

        let table = StateTable::from_states_unchecked(states);
        let live = table.live_states(&[]);
        if table.iter().skip(1).any(|(id, _)| !live[id]) {
            return Err(DeserializeError::generic(
                "every state other than the dead state must be able to \
                 reach an accepting state",
            ));
        }

        let fa = FiniteAutomaton {
            config: Config::new(),
            table,
            start,
            valid: true,
        };
        Ok((fa, nr))
    }

    /// Replace this automaton with one deserialized from the beginning of
    /// `slice`, returning the number of bytes read. The configuration of
    /// this automaton is kept.
    ///
    /// If deserialization fails for any reason, including an unsupported
    /// format version, then this automaton is left unmodified.
    pub fn read_from(
        &mut self,
        slice: &[u8],
    ) -> Result<usize, DeserializeError> {
        let (fa, nread) = FiniteAutomaton::from_bytes(slice)?;
        self.table = fa.table;
        self.start = fa.start;
        self.valid = fa.valid;
        Ok(nread)
    }
}

impl Automaton for FiniteAutomaton {
    #[inline]
    fn start_state(&self) -> StateID {
        self.start
    }

    #[inline]
    fn next_state(&self, current: StateID, input: u8) -> StateID {
        self.table.next_state(current, input)
    }

    #[inline]
    fn is_accepting_state(&self, id: StateID) -> bool {
        self.table.is_accepting(id)
    }
}

impl Default for FiniteAutomaton {
    fn default() -> FiniteAutomaton {
        FiniteAutomaton::new()
    }
}

impl fmt::Debug for FiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FiniteAutomaton(")?;
        for (id, state) in self.table.iter() {
            fmt_state_indicator(f, self, id)?;
            writeln!(f, "{:06?}: {:?}", id.as_usize(), state)?;
        }
        writeln!(f, "state count: {:?}", self.state_count())?;
        if !self.valid {
            writeln!(f, "INVALID")?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

/// Writes a two character marker in front of a state: `D` for the dead
/// state, `>` for the start state and `*` for accepting states.
fn fmt_state_indicator(
    f: &mut fmt::Formatter<'_>,
    fa: &FiniteAutomaton,
    id: StateID,
) -> fmt::Result {
    if id.is_dead() {
        write!(f, "D")?;
    } else if fa.is_accepting_state(id) {
        write!(f, "*")?;
    } else {
        write!(f, " ")?;
    }
    if id == fa.start {
        write!(f, ">")?;
    } else {
        write!(f, " ")?;
    }
    Ok(())
}

impl<'a> ops::AddAssign<&'a FiniteAutomaton> for FiniteAutomaton {
    fn add_assign(&mut self, rhs: &'a FiniteAutomaton) {
        self.concat(rhs);
    }
}

impl ops::AddAssign<FiniteAutomaton> for FiniteAutomaton {
    fn add_assign(&mut self, rhs: FiniteAutomaton) {
        self.concat(&rhs);
    }
}

impl<'a> ops::BitOrAssign<&'a FiniteAutomaton> for FiniteAutomaton {
    fn bitor_assign(&mut self, rhs: &'a FiniteAutomaton) {
        self.union(rhs);
    }
}

impl ops::BitOrAssign<FiniteAutomaton> for FiniteAutomaton {
    fn bitor_assign(&mut self, rhs: FiniteAutomaton) {
        self.union(&rhs);
    }
}

impl<'a, 'b> ops::Add<&'b FiniteAutomaton> for &'a FiniteAutomaton {
    type Output = FiniteAutomaton;

    fn add(self, rhs: &'b FiniteAutomaton) -> FiniteAutomaton {
        let mut fa = self.clone();
        fa.concat(rhs);
        fa
    }
}

impl<'a, 'b> ops::BitOr<&'b FiniteAutomaton> for &'a FiniteAutomaton {
    type Output = FiniteAutomaton;

    fn bitor(self, rhs: &'b FiniteAutomaton) -> FiniteAutomaton {
        let mut fa = self.clone();
        fa.union(rhs);
        fa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(bytes: &[u8]) -> FiniteAutomaton {
        let mut fa = FiniteAutomaton::new();
        fa.append_sequence(bytes);
        fa
    }

    #[test]
    fn new_accepts_only_empty() {
        let fa = FiniteAutomaton::new();
        assert!(fa.is_valid());
        assert!(fa.is_match(b""));
        for b in 0..=255 {
            assert!(!fa.is_match(&[b]));
        }
        assert_eq!(2, fa.state_count());
    }

    #[test]
    fn empty_sequence_is_noop() {
        let mut fa = literal(b"ab");
        let before = fa.table().clone();
        fa.append_sequence(b"");
        assert_eq!(&before, fa.table());
    }

    #[test]
    fn empty_set_is_noop() {
        let mut fa = literal(b"ab");
        let before = fa.table().clone();
        fa.append_set(b"");
        assert_eq!(&before, fa.table());
        assert!(fa.is_match(b"ab"));
    }

    #[test]
    fn invalid_propagates() {
        let mut bad = literal(b"a");
        bad.invalidate();
        assert!(!bad.is_valid());
        assert!(!bad.is_match(b"a"));
        assert!(!bad.is_match(b""));

        bad.append(b'b');
        assert!(!bad.is_valid());

        let mut fa = literal(b"a");
        fa |= &bad;
        assert!(!fa.is_valid());
        assert!(!fa.is_match(b"a"));

        fa.remove_all();
        assert!(fa.is_valid());
        assert!(fa.is_match(b""));
    }

    #[test]
    fn minimize_config_keeps_language() {
        let config = Config::new().minimize(true);
        let mut min = FiniteAutomaton::new_with_config(config);
        let mut plain = FiniteAutomaton::new();
        for fa in [&mut min, &mut plain].iter_mut() {
            fa.append_set(b"ab");
            fa.assign_kleene_star();
            fa.append_set(b"ab");
            fa.union(&literal(b"abc"));
        }
        assert!(min.config().get_minimize());
        assert!(!plain.config().get_minimize());
        assert!(min.state_count() <= plain.state_count());
        for input in &[&b""[..], b"a", b"ab", b"abc", b"abca", b"bbba"] {
            assert_eq!(
                plain.is_match(input),
                min.is_match(input),
                "{:?}",
                input,
            );
        }
    }

    #[test]
    fn operators_inherit_left_config() {
        let left =
            FiniteAutomaton::new_with_config(Config::new().minimize(true));
        let right = literal(b"x");
        assert!((&left + &right).config().get_minimize());
        assert!((&left | &right).config().get_minimize());
        assert!(!(&right + &left).config().get_minimize());
    }

    #[test]
    fn debug_output() {
        let fa = literal(b"a");
        let got = format!("{:?}", fa);
        assert!(got.starts_with("FiniteAutomaton(\n"), "{}", got);
        assert!(got.contains("D 000000: \n"), "{}", got);
        assert!(got.contains(" >000001: a => 2\n"), "{}", got);
        assert!(got.contains("* 000002: \n"), "{}", got);
        assert!(got.contains("state count: 3\n"), "{}", got);
    }

    #[test]
    fn serialize_rejects_unknown_version() {
        let fa = literal(b"a");
        let mut buf = vec![0; fa.write_to_len()];
        assert!(fa.write_to_version(0, &mut buf).is_err());
        assert!(fa.write_to_version(VERSION + 1, &mut buf).is_err());
        assert!(fa.write_to(&mut buf[..3]).is_err());
        assert_eq!(buf.len(), fa.write_to_version(VERSION, &mut buf).unwrap());
    }
}
