/*!
The transition table shared by every automaton in this crate.

A [`StateTable`] is an arena of [`State`]s addressed by [`StateID`]. Each
state has exactly one transition for every possible byte, which makes the
transition function total: a missing transition is simply a transition to
the dead state at [`StateID::DEAD`]. The dead state is always present at index
`0`, is never accepting and all of its transitions point back to itself.
*/

use core::fmt;

use crate::util::{
    escape::DebugByte,
    id::{IteratorIDExt, StateID},
};

/// The size of the alphabet. Every state has exactly this many transitions,
/// one for each possible byte value.
pub const ALPHABET_LEN: usize = 256;

/// A single state in a [`StateTable`].
#[derive(Clone, Eq, PartialEq)]
pub struct State {
    trans: [StateID; ALPHABET_LEN],
    accepting: bool,
}

impl State {
    /// Create a fresh state whose transitions all lead to the dead state.
    /// The state is not accepting.
    pub fn new() -> State {
        State { trans: [StateID::DEAD; ALPHABET_LEN], accepting: false }
    }

    /// Return the state reached by following the transition for `byte`.
    #[inline]
    pub fn next(&self, byte: u8) -> StateID {
        self.trans[usize::from(byte)]
    }

    /// Set the transition for `byte` to `next`.
    #[inline]
    pub fn set_next(&mut self, byte: u8, next: StateID) {
        self.trans[usize::from(byte)] = next;
    }

    /// Returns true if and only if ending input in this state means the input
    /// is in the language.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Set whether this state is accepting.
    #[inline]
    pub fn set_accepting(&mut self, yes: bool) {
        self.accepting = yes;
    }

    /// Returns all transitions of this state, indexed by byte.
    #[inline]
    pub fn transitions(&self) -> &[StateID; ALPHABET_LEN] {
        &self.trans
    }

    /// Returns all transitions of this state mutably, indexed by byte.
    #[inline]
    pub(crate) fn transitions_mut(&mut self) -> &mut [StateID; ALPHABET_LEN] {
        &mut self.trans
    }

    /// Returns true if this state is indistinguishable from the dead state:
    /// it isn't accepting and every transition leads to the dead state.
    pub(crate) fn is_dead_like(&self) -> bool {
        !self.accepting && self.trans.iter().all(|id| id.is_dead())
    }
}

impl Default for State {
    fn default() -> State {
        State::new()
    }
}

impl fmt::Debug for State {
    /// Writes the transitions of this state as ranges of bytes that share
    /// the same target. Transitions to the dead state are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut b = 0usize;
        while b < ALPHABET_LEN {
            let next = self.trans[b];
            let start = b;
            while b + 1 < ALPHABET_LEN && self.trans[b + 1] == next {
                b += 1;
            }
            let end = b;
            b += 1;
            if next.is_dead() {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            // start/end are always < 256.
            let (start, end) = (start as u8, end as u8);
            if start == end {
                write!(f, "{:?} => {:?}", DebugByte(start), next.as_usize())?;
            } else {
                write!(
                    f,
                    "{:?}-{:?} => {:?}",
                    DebugByte(start),
                    DebugByte(end),
                    next.as_usize(),
                )?;
            }
        }
        Ok(())
    }
}

/// An owned, growable table of states.
///
/// A table always contains at least the dead state. New states are appended
/// at the end and are never removed individually; the entire table is either
/// cleared back to the dead state or replaced wholesale.
#[derive(Clone, Eq, PartialEq)]
pub struct StateTable {
    states: Vec<State>,
}

impl StateTable {
    /// Create a new table containing only the dead state.
    pub fn new() -> StateTable {
        StateTable { states: vec![State::new()] }
    }

    /// Create a table from the given states without checking any of the
    /// invariants. Callers must ensure that the first state is dead-like and
    /// that every transition refers to a state in the table.
    pub(crate) fn from_states_unchecked(states: Vec<State>) -> StateTable {
        StateTable { states }
    }

    /// Appends a fresh state to this table and returns its ID. The state is
    /// not accepting and all of its transitions lead to the dead state.
    ///
    /// This panics if the number of states would exceed [`StateID::LIMIT`].
    pub fn add_state(&mut self) -> StateID {
        let id = match StateID::new(self.states.len()) {
            Ok(id) => id,
            Err(_) => panic!(
                "automaton exceeded the maximum of {} states",
                StateID::LIMIT,
            ),
        };
        self.states.push(State::new());
        id
    }

    /// Appends a copy of the given state and returns its new ID. Callers are
    /// responsible for making its transitions meaningful in this table.
    ///
    /// This panics if the number of states would exceed [`StateID::LIMIT`].
    pub(crate) fn push(&mut self, state: State) -> StateID {
        let id = self.add_state();
        self.states[id] = state;
        id
    }

    /// Return the state for the given ID.
    ///
    /// This panics if the ID does not refer to a state in this table.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }

    /// Return the state for the given ID mutably.
    ///
    /// This panics if the ID does not refer to a state in this table.
    #[inline]
    pub fn state_mut(&mut self, id: StateID) -> &mut State {
        &mut self.states[id]
    }

    /// Follow the transition for `byte` out of the state `id`.
    #[inline]
    pub fn next_state(&self, id: StateID, byte: u8) -> StateID {
        self.states[id].next(byte)
    }

    /// Set the transition for `byte` out of `from` to `to`.
    #[inline]
    pub fn set_transition(&mut self, from: StateID, byte: u8, to: StateID) {
        self.states[from].set_next(byte, to);
    }

    /// Returns true if and only if the given state is accepting.
    #[inline]
    pub fn is_accepting(&self, id: StateID) -> bool {
        self.states[id].is_accepting()
    }

    /// Set whether the given state is accepting.
    ///
    /// The dead state must never be accepting, so this panics if `id` is
    /// [`StateID::DEAD`] and `yes` is true.
    #[inline]
    pub fn set_accepting(&mut self, id: StateID, yes: bool) {
        assert!(!(yes && id.is_dead()), "dead state cannot be accepting");
        self.states[id].set_accepting(yes);
    }

    /// Discards every state except the dead state.
    pub fn clear(&mut self) {
        self.states.truncate(1);
        self.states[0] = State::new();
    }

    /// Returns the total number of states in this table, including the dead
    /// state.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always returns false, since a table always has a dead state. This
    /// exists only for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns an iterator over every state in this table along with its ID.
    pub fn iter(&self) -> impl Iterator<Item = (StateID, &State)> + '_ {
        self.states.iter().with_state_ids()
    }

    /// Returns the IDs of every accepting state in this table.
    pub(crate) fn accepting_states(&self) -> Vec<StateID> {
        self.iter()
            .filter(|(_, state)| state.is_accepting())
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns, for every state, whether an accepting state can be reached
    /// from it. A state is live if it is accepting or has a transition to a
    /// live state.
    ///
    /// `epsilons` lists additional unlabeled transitions per state. It may
    /// be shorter than the table (or empty), in which case the remaining
    /// states have none.
    pub(crate) fn live_states(&self, epsilons: &[Vec<StateID>]) -> Vec<bool> {
        let mut incoming: Vec<Vec<StateID>> = vec![vec![]; self.len()];
        for (id, state) in self.iter() {
            for &next in state.transitions().iter() {
                if next != id && incoming[next].last() != Some(&id) {
                    incoming[next].push(id);
                }
            }
        }
        for (id, targets) in epsilons.iter().enumerate() {
            let id = StateID::must(id);
            for &next in targets {
                incoming[next].push(id);
            }
        }

        let mut live = vec![false; self.len()];
        let mut stack = self.accepting_states();
        for &id in &stack {
            live[id] = true;
        }
        while let Some(id) = stack.pop() {
            for &prev in &incoming[id] {
                if !live[prev] {
                    live[prev] = true;
                    stack.push(prev);
                }
            }
        }
        live
    }

    /// Returns the heap memory usage, in bytes, of this table.
    pub fn memory_usage(&self) -> usize {
        self.states.len() * core::mem::size_of::<State>()
    }
}

impl Default for StateTable {
    fn default() -> StateTable {
        StateTable::new()
    }
}

impl fmt::Debug for StateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.iter() {
            let marker = if state.is_accepting() { '*' } else { ' ' };
            writeln!(f, "{}{:06?}: {:?}", marker, id.as_usize(), state)?;
        }
        Ok(())
    }
}
