/*!
DFA minimization via Hopcroft's partition refinement.

Minimization is optional (see [`Config::minimize`](crate::Config::minimize)).
It is useful when an automaton is edited many times in a row, since subset
construction alone may leave behind states that recognize the same
remainder of the language.

The dead state is always the smallest ID in its block, so it keeps the ID
`0` in the minimized table. Any state that is equivalent to the dead state
(non-accepting, and unable to ever reach an accepting state) is merged into
it.
*/

use crate::{
    table::{StateTable, ALPHABET_LEN},
    util::id::StateID,
};

#[derive(Debug)]
pub(crate) struct Minimizer<'a> {
    table: &'a StateTable,
    start: StateID,
    in_transitions: Vec<Vec<Vec<StateID>>>,
    partitions: Vec<StateSet>,
    waiting: Vec<StateSet>,
}

/// A sorted set of state IDs.
#[derive(Clone, Debug, Eq, PartialEq)]
struct StateSet {
    ids: Vec<StateID>,
}

impl<'a> Minimizer<'a> {
    pub(crate) fn new(table: &'a StateTable, start: StateID) -> Minimizer<'a> {
        let in_transitions = Minimizer::incoming_transitions(table);
        let partitions = Minimizer::initial_partitions(table);
        let waiting = vec![partitions[0].clone()];
        Minimizer { table, start, in_transitions, partitions, waiting }
    }

    /// Run partition refinement and return a new minimal table along with
    /// its start state.
    pub(crate) fn run(mut self) -> (StateTable, StateID) {
        let mut incoming = StateSet::empty();

        while let Some(set) = self.waiting.pop() {
            for b in 0..=255 {
                self.find_incoming_to(b, &set, &mut incoming);
                if incoming.is_empty() {
                    continue;
                }

                let mut newparts = Vec::with_capacity(self.partitions.len());
                for p in 0..self.partitions.len() {
                    let x = self.partitions[p].intersection(&incoming);
                    if x.is_empty() {
                        newparts.push(self.partitions[p].clone());
                        continue;
                    }

                    let y = self.partitions[p].subtract(&incoming);
                    if y.is_empty() {
                        newparts.push(self.partitions[p].clone());
                        continue;
                    }

                    newparts.push(x.clone());
                    newparts.push(y.clone());
                    let part = &self.partitions[p];
                    let pos = self.waiting.iter().position(|s| s == part);
                    match pos {
                        Some(i) => {
                            self.waiting[i] = x;
                            self.waiting.push(y);
                        }
                        None => {
                            if x.len() <= y.len() {
                                self.waiting.push(x);
                            } else {
                                self.waiting.push(y);
                            }
                        }
                    }
                }
                self.partitions = newparts;
            }
        }

        let mut state_to_part = vec![StateID::DEAD; self.table.len()];
        for p in &self.partitions {
            let first = p.first();
            for &id in &p.ids {
                state_to_part[id] = first;
            }
        }

        let mut minimal_ids = vec![StateID::DEAD; self.table.len()];
        let mut states = vec![];
        for (id, state) in self.table.iter() {
            if state_to_part[id] == id {
                minimal_ids[id] = StateID::must(states.len());
                states.push(state.clone());
            }
        }
        for state in states.iter_mut() {
            for next in state.transitions_mut().iter_mut() {
                *next = minimal_ids[state_to_part[*next]];
            }
        }
        let start = minimal_ids[state_to_part[self.start]];
        debug!(
            "minimized DFA from {} states to {} states",
            self.table.len(),
            states.len(),
        );
        (StateTable::from_states_unchecked(states), start)
    }

    fn find_incoming_to(
        &self,
        b: u8,
        set: &StateSet,
        incoming: &mut StateSet,
    ) {
        incoming.clear();
        for &id in &set.ids {
            for &inid in &self.in_transitions[id][usize::from(b)] {
                incoming.add(inid);
            }
        }
        incoming.canonicalize();
    }

    fn initial_partitions(table: &StateTable) -> Vec<StateSet> {
        let mut is_match = StateSet::empty();
        let mut no_match = StateSet::empty();
        for (id, state) in table.iter() {
            if state.is_accepting() {
                is_match.add(id);
            } else {
                no_match.add(id);
            }
        }

        // The dead state guarantees that no_match is never empty.
        let mut sets = vec![no_match];
        if !is_match.is_empty() {
            sets.push(is_match);
        }
        sets.sort_by_key(|s| s.len());
        sets
    }

    fn incoming_transitions(table: &StateTable) -> Vec<Vec<Vec<StateID>>> {
        let mut incoming = vec![vec![vec![]; ALPHABET_LEN]; table.len()];
        for (id, state) in table.iter() {
            for (b, &next) in state.transitions().iter().enumerate() {
                incoming[next][b].push(id);
            }
        }
        incoming
    }
}

impl StateSet {
    fn empty() -> StateSet {
        StateSet { ids: vec![] }
    }

    fn add(&mut self, id: StateID) {
        self.ids.push(id);
    }

    fn first(&self) -> StateID {
        self.ids[0]
    }

    fn canonicalize(&mut self) {
        self.ids.sort_unstable();
        self.ids.dedup();
    }

    fn clear(&mut self) {
        self.ids.clear();
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn intersection(&self, other: &StateSet) -> StateSet {
        let mut result = StateSet::empty();
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() && j < other.ids.len() {
            let (a, b) = (self.ids[i], other.ids[j]);
            if a == b {
                result.add(a);
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }
        result
    }

    fn subtract(&self, other: &StateSet) -> StateSet {
        let mut result = StateSet::empty();
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() {
            let a = self.ids[i];
            if j >= other.ids.len() || a < other.ids[j] {
                result.add(a);
                i += 1;
            } else if a == other.ids[j] {
                i += 1;
                j += 1;
            } else {
                j += 1;
            }
        }
        result
    }
}
