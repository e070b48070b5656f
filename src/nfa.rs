/*!
A temporary nondeterministic automaton used while combining automata.

Every structural operation on a [`FiniteAutomaton`](crate::FiniteAutomaton)
that can introduce nondeterminism works by first gluing deterministic
fragments together with epsilon transitions, in the style of Thompson's
construction, and then handing the result to the
[`Determinizer`](crate::determinize::Determinizer).

Since every fragment is itself a DFA, an NFA here is simply a
[`StateTable`] (one deterministic row per state) plus a side-map of epsilon
transitions. The side-map never escapes this crate: determinization always
consumes it before control returns to the caller.
*/

use crate::{
    table::StateTable,
    util::id::StateID,
};

#[derive(Debug)]
pub(crate) struct NFA {
    /// The byte transitions and accept flags of every state.
    table: StateTable,
    /// For each state, the states reachable by following a single epsilon
    /// transition. This always has the same length as `table`.
    epsilons: Vec<Vec<StateID>>,
    /// The state where matching begins. This may be the dead state, in which
    /// case the NFA recognizes the empty language.
    start: StateID,
}

impl NFA {
    /// Wrap an existing deterministic table. The resulting NFA has no
    /// epsilon transitions and recognizes the same language as the table
    /// does from `start`.
    pub(crate) fn new(table: StateTable, start: StateID) -> NFA {
        let epsilons = vec![vec![]; table.len()];
        NFA { table, epsilons, start }
    }

    /// L ← L(a) · L(b)
    ///
    /// Every accepting state of `a` gives up its accept flag and instead
    /// gets an epsilon transition to the start of a copy of `b`.
    pub(crate) fn concat(
        a: StateTable,
        a_start: StateID,
        b: &StateTable,
        b_start: StateID,
    ) -> NFA {
        let mut nfa = NFA::new(a, a_start);
        let accepting = nfa.table.accepting_states();
        let b_start = nfa.import(b, b_start);
        for id in accepting {
            nfa.table.set_accepting(id, false);
            nfa.add_epsilon(id, b_start);
        }
        nfa
    }

    /// L ← L(a) ∪ L(b)
    ///
    /// A fresh, non-accepting start state gets epsilon transitions to the
    /// start of `a` and to the start of a copy of `b`.
    pub(crate) fn union(
        a: StateTable,
        a_start: StateID,
        b: &StateTable,
        b_start: StateID,
    ) -> NFA {
        let mut nfa = NFA::new(a, a_start);
        let b_start = nfa.import(b, b_start);
        let start = nfa.add_empty();
        nfa.add_epsilon(start, a_start);
        nfa.add_epsilon(start, b_start);
        nfa.start = start;
        nfa
    }

    /// L ← L(a)*
    ///
    /// A fresh accepting start state (for the empty string) gets an epsilon
    /// transition to the old start, and every accepting state of `a` gets an
    /// epsilon transition back to the old start. Using a fresh start state,
    /// instead of making the old one accepting, avoids accepting strings
    /// that merely return to the old start state in the middle of a word.
    pub(crate) fn kleene_star(a: StateTable, a_start: StateID) -> NFA {
        let mut nfa = NFA::new(a, a_start);
        let accepting = nfa.table.accepting_states();
        let start = nfa.add_empty();
        nfa.table.set_accepting(start, true);
        nfa.add_epsilon(start, a_start);
        for id in accepting {
            nfa.add_epsilon(id, a_start);
        }
        nfa.start = start;
        nfa
    }

    pub(crate) fn start(&self) -> StateID {
        self.start
    }

    pub(crate) fn table(&self) -> &StateTable {
        &self.table
    }

    /// Returns the number of states in this NFA, including the dead state.
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns, for every state, whether an accepting state can be reached
    /// from it by following byte or epsilon transitions.
    pub(crate) fn live_states(&self) -> Vec<bool> {
        self.table.live_states(&self.epsilons)
    }

    /// Returns the targets of every epsilon transition leaving `id`.
    pub(crate) fn epsilons(&self, id: StateID) -> &[StateID] {
        &self.epsilons[id]
    }

    /// Add a new state with no byte transitions.
    fn add_empty(&mut self) -> StateID {
        let id = self.table.add_state();
        self.epsilons.push(vec![]);
        id
    }

    /// Add an epsilon transition from `from` to `to`. Epsilon transitions
    /// into the dead state are dropped, since they can never contribute to
    /// a match.
    fn add_epsilon(&mut self, from: StateID, to: StateID) {
        if to.is_dead() || self.epsilons[from].contains(&to) {
            return;
        }
        self.epsilons[from].push(to);
    }

    /// Copy every non-dead state of `other` into this NFA, rewriting their
    /// transitions to refer to the copies. Transitions to the dead state in
    /// `other` remain transitions to the dead state here.
    ///
    /// Returns the ID of the copy of `start`.
    fn import(&mut self, other: &StateTable, start: StateID) -> StateID {
        // The dead state is shared, so other's state i (for i >= 1) lands
        // at offset + i.
        let offset = self.table.len() - 1;
        let remap = |id: StateID| -> StateID {
            if id.is_dead() {
                StateID::DEAD
            } else {
                StateID::must(offset + id.as_usize())
            }
        };
        for (_, state) in other.iter().skip(1) {
            let mut state = state.clone();
            for next in state.transitions_mut().iter_mut() {
                *next = remap(*next);
            }
            self.table.push(state);
            self.epsilons.push(vec![]);
        }
        remap(start)
    }
}
