use crate::util::id::StateID;

/// A sparse set used for collecting NFA states during epsilon closure.
///
/// This supports constant time addition and membership testing. Clearing an
/// entire set can also be done in constant time. Iteration yields elements
/// in the order in which they were inserted.
///
/// The data structure is based on: https://research.swtch.com/sparse
/// Note though that we don't actually use uninitialized memory. We reuse
/// a single sparse set for an entire determinization, so the initial
/// allocation cost is bareable.
#[derive(Clone)]
pub(crate) struct SparseSet {
    /// The number of elements currently in this set.
    len: usize,
    /// Dense contains the ids in the order in which they were inserted.
    dense: Vec<StateID>,
    /// Sparse maps ids to their location in dense.
    ///
    /// A state ID is in the set if and only if
    /// sparse[id] < len && id == dense[sparse[id]].
    sparse: Vec<StateID>,
}

impl SparseSet {
    /// Create a new sparse set with the given capacity.
    ///
    /// Sparse sets have a fixed size and they cannot grow. Attempting to
    /// insert more distinct elements than the total capacity of the set will
    /// result in a panic.
    ///
    /// This panics if the capacity given is bigger than `StateID::LIMIT`.
    #[inline]
    pub(crate) fn new(capacity: usize) -> SparseSet {
        assert!(
            capacity <= StateID::LIMIT,
            "sparse set capacity cannot excced {:?}",
            StateID::LIMIT
        );
        SparseSet {
            len: 0,
            dense: vec![StateID::ZERO; capacity],
            sparse: vec![StateID::ZERO; capacity],
        }
    }

    /// Returns the capacity of this set.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.dense.len()
    }

    /// Returns the number of elements in this set.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Insert the state ID value into this set and return true if the given
    /// state ID was not previously in this set.
    ///
    /// If more than `capacity` ids are inserted, then this panics.
    #[inline(always)]
    pub(crate) fn insert(&mut self, value: StateID) -> bool {
        if self.contains(value) {
            return false;
        }

        let i = self.len();
        assert!(
            i < self.capacity(),
            "{:?} exceeds capacity of {:?} when inserting {:?}",
            i,
            self.capacity(),
            value,
        );
        // OK since i < self.capacity() and self.capacity() is guaranteed to
        // be <= StateID::LIMIT.
        let id = StateID::new_unchecked(i);
        self.dense[id] = value;
        self.sparse[value] = id;
        self.len += 1;
        true
    }

    /// Returns true if and only if this set contains the given value.
    #[inline]
    pub(crate) fn contains(&self, value: StateID) -> bool {
        let i = self.sparse[value];
        i.as_usize() < self.len() && self.dense[i] == value
    }

    /// Clear this set such that it has no members.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the members of this set in insertion order.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[StateID] {
        &self.dense[..self.len()]
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("SparseSet").field(&self.as_slice()).finish()
    }
}

/// An iterator over all elements in a sparse set.
///
/// The lifetime `'a` refers to the lifetime of the set being iterated over.
#[derive(Debug)]
pub(crate) struct SparseSetIter<'a>(core::slice::Iter<'a, StateID>);

impl<'a> IntoIterator for &'a SparseSet {
    type Item = StateID;
    type IntoIter = SparseSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        SparseSetIter(self.as_slice().iter())
    }
}

impl<'a> Iterator for SparseSetIter<'a> {
    type Item = StateID;

    #[inline(always)]
    fn next(&mut self) -> Option<StateID> {
        self.0.next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = SparseSet::new(10);
        assert_eq!(0, set.len());
        assert!(set.insert(StateID::must(3)));
        assert!(!set.insert(StateID::must(3)));
        assert!(set.insert(StateID::must(1)));
        assert_eq!(2, set.len());
        assert!(set.contains(StateID::must(1)));
        assert!(!set.contains(StateID::must(2)));
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut set = SparseSet::new(10);
        for &id in &[7, 2, 9, 2, 0] {
            set.insert(StateID::must(id));
        }
        let got: Vec<usize> =
            set.into_iter().map(|id| id.as_usize()).collect();
        assert_eq!(vec![7, 2, 9, 0], got);
    }

    #[test]
    fn clear_forgets_members() {
        let mut set = SparseSet::new(4);
        set.insert(StateID::must(3));
        set.clear();
        assert_eq!(0, set.len());
        assert!(!set.contains(StateID::must(3)));
        assert!(set.insert(StateID::must(3)));
    }

    #[test]
    #[should_panic]
    fn insert_past_capacity_panics() {
        let mut set = SparseSet::new(1);
        set.insert(StateID::must(0));
        set.insert(StateID::must(1));
    }
}
