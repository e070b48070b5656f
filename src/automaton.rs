use crate::util::id::StateID;

/// A read-only view of a deterministic finite automaton over bytes.
///
/// This is the only interface an [`Accumulator`](crate::Accumulator) needs:
/// a start state, a total transition function and a way to ask whether a
/// state is accepting. Implementations must uphold two properties:
///
/// * `next_state` is total. For every state ID returned by `start_state` or
///   `next_state`, and every byte, it returns another valid state ID.
/// * The dead state, [`StateID::DEAD`], is absorbing and never accepting.
///   That is, `next_state(StateID::DEAD, b) == StateID::DEAD` for every `b`.
///
/// Implementations should also ensure that every other state can reach an
/// accepting state. Otherwise, [`Accumulator::is_error`] may report false
/// for input that can never match.
///
/// [`Accumulator::is_error`]: crate::Accumulator::is_error
///
/// [`FiniteAutomaton`](crate::FiniteAutomaton) is the implementation
/// provided by this crate. The trait is also implemented for references to
/// any implementation, so that generic code can take either.
pub trait Automaton {
    /// Return the state in which every traversal begins.
    ///
    /// If this is the dead state, then the automaton recognizes the empty
    /// language.
    fn start_state(&self) -> StateID;

    /// Return the state reached from `current` after reading `input`.
    ///
    /// If `current` is not a state of this automaton, then this may panic or
    /// return an incorrect state, but it will never result in memory
    /// unsafety.
    fn next_state(&self, current: StateID, input: u8) -> StateID;

    /// Returns true if and only if input that ends in the given state is in
    /// the language of this automaton.
    fn is_accepting_state(&self, id: StateID) -> bool;

    /// Returns true if and only if the given state is the dead state. Once a
    /// traversal reaches the dead state, no further input can lead to a
    /// match.
    #[inline]
    fn is_dead_state(&self, id: StateID) -> bool {
        id.is_dead()
    }

    /// Returns true if and only if the entire haystack is in the language of
    /// this automaton.
    ///
    /// This stops reading input as soon as the dead state is entered.
    ///
    /// # Example
    ///
    /// ```
    /// use byte_automata::{Automaton, FiniteAutomaton};
    ///
    /// let mut fa = FiniteAutomaton::new();
    /// fa.append_sequence(b"foo");
    /// assert!(fa.is_match(b"foo"));
    /// assert!(!fa.is_match(b"fo"));
    /// assert!(!fa.is_match(b"foofoo"));
    /// ```
    fn is_match(&self, haystack: &[u8]) -> bool {
        let mut state = self.start_state();
        for &b in haystack {
            if self.is_dead_state(state) {
                return false;
            }
            state = self.next_state(state, b);
        }
        self.is_accepting_state(state)
    }
}

impl<'a, A: Automaton + ?Sized> Automaton for &'a A {
    #[inline]
    fn start_state(&self) -> StateID {
        (**self).start_state()
    }

    #[inline]
    fn next_state(&self, current: StateID, input: u8) -> StateID {
        (**self).next_state(current, input)
    }

    #[inline]
    fn is_accepting_state(&self, id: StateID) -> bool {
        (**self).is_accepting_state(id)
    }

    #[inline]
    fn is_dead_state(&self, id: StateID) -> bool {
        (**self).is_dead_state(id)
    }

    fn is_match(&self, haystack: &[u8]) -> bool {
        (**self).is_match(haystack)
    }
}
