//! State identifiers and bit-set backed state sets.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state identifier: an index into the automaton's state arena.
pub type StateId = u32;

/// A set of states. Grows on demand, so sets built for automata of
/// different sizes can still be combined.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with room for `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state, returning whether it was absent.
    pub fn insert(&mut self, state: StateId) -> bool {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.bits.contains(state as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Add every state of `other` to this set.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if the two sets share a state.
    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    /// Sorted list of members. Two sets with the same members give the
    /// same list regardless of capacity, which makes it usable as a key.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}
