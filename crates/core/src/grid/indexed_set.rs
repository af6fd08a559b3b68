//! Dense set with O(1) insert, remove and membership
//!
//! Members live in a contiguous `Vec` so hot readers get a plain slice; an
//! index map gives each member's slot. Removal swaps the last member into the
//! vacated slot, so member order is not stable across removals.

use rustc_hash::{FxBuildHasher, FxHashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct IndexedSet<T> {
    items: Vec<T>,
    slots: FxHashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> IndexedSet<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    /// Add a member. Returns false if it was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.slots.contains_key(&item) {
            return false;
        }
        self.slots.insert(item, self.items.len());
        self.items.push(item);
        true
    }

    /// Remove a member by moving the last member into its slot.
    /// Returns false if it was not present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(slot) = self.slots.remove(item) else {
            return false;
        };
        self.items.swap_remove(slot);
        // Unless the removed member was last, a member now sits in `slot`
        if let Some(moved) = self.items.get(slot) {
            self.slots.insert(*moved, slot);
        }
        true
    }

    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Slot of a member in [`IndexedSet::as_slice`]
    pub fn position(&self, item: &T) -> Option<usize> {
        self.slots.get(item).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.slots.clear();
    }
}

impl<T: Copy + Eq + Hash> Default for IndexedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
