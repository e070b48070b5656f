/*!
Subset construction: converts an [`NFA`] with epsilon transitions into an
equivalent, fully deterministic [`StateTable`].

Each DFA state corresponds to a set of NFA states. Only sets reachable from
the epsilon closure of the NFA's start state are ever materialized, and each
distinct set is materialized exactly once. The empty set is the dead state.
*/

use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use crate::{
    nfa::NFA,
    table::StateTable,
    util::{id::StateID, sparse_set::SparseSet},
};

#[derive(Debug)]
pub(crate) struct Determinizer<'a> {
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    /// The DFA we're building.
    table: StateTable,
    /// Whether each NFA state can influence the result. Two kinds of states
    /// are left out of the sets that define DFA states:
    ///
    /// * states that cannot reach an accepting state, since no input will
    ///   ever make them matter,
    /// * states that are not accepting and whose byte transitions all lead
    ///   to the dead state, since they only exist to carry epsilon
    ///   transitions.
    ///
    /// A set with no useful members is the dead state. This is what makes
    /// the dead state the only state from which no match is possible.
    useful: Vec<bool>,
    /// Each DFA state being built is defined as a sorted set of NFA states.
    ///
    /// This is never empty. The first state is always the dead state, such
    /// that StateID::DEAD in the DFA corresponds to the empty set.
    builder_states: Vec<Rc<DeterminizerState>>,
    /// A cache of DFA states that already exist and can be easily looked up
    /// via sorted sets of NFA states.
    cache: HashMap<Rc<DeterminizerState>, StateID>,
    /// A stack of NFA states to visit, for depth first visiting.
    stack: Vec<StateID>,
    /// The NFA states found while computing the next DFA state.
    sparse: SparseSet,
    /// Scratch space for storing a sequence of NFA states, for amortizing
    /// allocation.
    scratch_nfa_states: Vec<StateID>,
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct DeterminizerState {
    is_match: bool,
    nfa_states: Vec<StateID>,
}

impl<'a> Determinizer<'a> {
    pub(crate) fn new(nfa: &'a NFA) -> Determinizer<'a> {
        let dead = Rc::new(DeterminizerState::dead());
        let mut cache = HashMap::new();
        cache.insert(Rc::clone(&dead), StateID::DEAD);

        let live = nfa.live_states();
        let useful = nfa
            .table()
            .iter()
            .map(|(id, state)| live[id] && !state.is_dead_like())
            .collect();
        Determinizer {
            nfa,
            table: StateTable::new(),
            useful,
            builder_states: vec![dead],
            cache,
            stack: vec![],
            sparse: SparseSet::new(nfa.len()),
            scratch_nfa_states: vec![],
        }
    }

    /// Run subset construction to completion and return the deterministic
    /// table along with its start state.
    pub(crate) fn build(mut self) -> (StateTable, StateID) {
        let start = self.add_start();
        let mut uncompiled = vec![];
        if !start.is_dead() {
            uncompiled.push(start);
        }
        while let Some(dfa_id) = uncompiled.pop() {
            for b in 0..=255 {
                let (next_dfa_id, is_new) = self.cached_state(dfa_id, b);
                self.table.set_transition(dfa_id, b, next_dfa_id);
                if is_new {
                    uncompiled.push(next_dfa_id);
                }
            }
        }
        trace!(
            "determinized {} NFA states into {} DFA states",
            self.nfa.len(),
            self.table.len(),
        );
        (self.table, start)
    }

    /// Compute the DFA state reached from `dfa_id` on `b`, creating it if it
    /// doesn't already exist. The boolean returned is true when the state
    /// was created by this call and therefore still needs its transitions
    /// filled in.
    fn cached_state(&mut self, dfa_id: StateID, b: u8) -> (StateID, bool) {
        self.next(dfa_id, b);
        let state = self.new_state();
        if let Some(&cached_id) = self.cache.get(&state) {
            self.scratch_nfa_states = state.nfa_states;
            return (cached_id, false);
        }
        (self.add_state(state), true)
    }

    /// Collect into `self.sparse` the epsilon closure of every NFA state
    /// reachable from the NFA states of `dfa_id` on `b`.
    fn next(&mut self, dfa_id: StateID, b: u8) {
        self.sparse.clear();
        let current = Rc::clone(&self.builder_states[dfa_id]);
        for &nfa_id in &current.nfa_states {
            let next = self.nfa.table().next_state(nfa_id, b);
            if !next.is_dead() {
                self.epsilon_closure(next);
            }
        }
    }

    fn epsilon_closure(&mut self, start: StateID) {
        let nfa = self.nfa;
        if nfa.epsilons(start).is_empty() {
            self.sparse.insert(start);
            return;
        }

        self.stack.push(start);
        while let Some(id) = self.stack.pop() {
            if !self.sparse.insert(id) {
                continue;
            }
            self.stack.extend(nfa.epsilons(id).iter().rev());
        }
    }

    fn add_start(&mut self) -> StateID {
        self.sparse.clear();
        let start = self.nfa.start();
        if !start.is_dead() {
            self.epsilon_closure(start);
        }
        let state = self.new_state();
        match self.cache.get(&state) {
            Some(&id) => id,
            None => self.add_state(state),
        }
    }

    fn add_state(&mut self, state: DeterminizerState) -> StateID {
        let id = self.table.add_state();
        self.table.set_accepting(id, state.is_match);
        let rstate = Rc::new(state);
        self.builder_states.push(Rc::clone(&rstate));
        self.cache.insert(rstate, id);
        id
    }

    /// Build the canonical form of the NFA state set in `self.sparse`.
    fn new_state(&mut self) -> DeterminizerState {
        let mut state = DeterminizerState {
            is_match: false,
            nfa_states: mem::replace(&mut self.scratch_nfa_states, vec![]),
        };
        state.nfa_states.clear();

        let table = self.nfa.table();
        for id in &self.sparse {
            if table.is_accepting(id) {
                state.is_match = true;
            }
            if self.useful[id] {
                state.nfa_states.push(id);
            }
        }
        state.nfa_states.sort_unstable();
        state
    }
}

impl DeterminizerState {
    fn dead() -> DeterminizerState {
        DeterminizerState { nfa_states: vec![], is_match: false }
    }
}
