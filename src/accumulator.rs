use core::fmt;

use crate::{automaton::Automaton, util::id::StateID};

/// A cursor that feeds input into an automaton one byte at a time.
///
/// An accumulator borrows an [`Automaton`] and stores nothing but the
/// current state, so it is cheap to create and to copy. Any number of
/// accumulators may traverse the same automaton at once, including from
/// different threads.
///
/// At any point, an accumulator is in one of three conditions:
///
/// * accepting: the input so far is in the language,
/// * error: the input so far is not in the language, and no further input
///   can change that,
/// * neither: the input so far is not in the language, but some
///   continuation of it might be.
///
/// Feeding more input after reaching the error condition is always safe and
/// has no effect. Checking [`Accumulator::is_error`] is only useful to stop
/// reading input early.
///
/// # Example
///
/// ```
/// use byte_automata::{Accumulator, FiniteAutomaton};
///
/// let mut fa = FiniteAutomaton::new();
/// fa.append_sequence(b"abc");
/// fa.assign_kleene_star();
///
/// let mut acc = Accumulator::new(&fa);
/// assert!(acc.is_accepting());
/// acc.transition_all(b"abcab");
/// assert!(!acc.is_accepting());
/// assert!(!acc.is_error());
/// acc.transition(b'c');
/// assert!(acc.is_accepting());
/// acc.transition(b'x');
/// assert!(acc.is_error());
/// ```
pub struct Accumulator<'a, A: ?Sized> {
    aut: &'a A,
    current: StateID,
}

impl<'a, A: Automaton + ?Sized> Accumulator<'a, A> {
    /// Create a new accumulator positioned at the start state of the given
    /// automaton.
    #[inline]
    pub fn new(aut: &'a A) -> Accumulator<'a, A> {
        Accumulator { aut, current: aut.start_state() }
    }

    /// Consume a single byte of input.
    #[inline]
    pub fn transition(&mut self, byte: u8) {
        self.current = self.aut.next_state(self.current, byte);
    }

    /// Consume every byte in `bytes`, stopping early if the error condition
    /// is reached.
    pub fn transition_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.is_error() {
                return;
            }
            self.transition(b);
        }
    }

    /// Returns true if and only if the input consumed so far is in the
    /// language of the automaton.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.aut.is_accepting_state(self.current)
    }

    /// Returns true if and only if the input consumed so far can never be
    /// extended into a string in the language of the automaton.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.aut.is_dead_state(self.current)
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> StateID {
        self.current
    }

    /// Move this accumulator back to the start state, forgetting all input
    /// consumed so far.
    #[inline]
    pub fn reset(&mut self) {
        self.current = self.aut.start_state();
    }

    /// Returns the automaton this accumulator traverses.
    #[inline]
    pub fn automaton(&self) -> &'a A {
        self.aut
    }
}

impl<'a, A: ?Sized> Clone for Accumulator<'a, A> {
    fn clone(&self) -> Accumulator<'a, A> {
        *self
    }
}

impl<'a, A: ?Sized> Copy for Accumulator<'a, A> {}

impl<'a, A: ?Sized> fmt::Debug for Accumulator<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator").field("current", &self.current).finish()
    }
}
