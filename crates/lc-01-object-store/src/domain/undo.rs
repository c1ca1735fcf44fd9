//! # Undo State
//!
//! Per-session change log of a table. Only the state as it was at session
//! start is recorded, once per key:
//!
//! | Change in session | Recorded as |
//! |-------------------|-------------|
//! | create            | key in `new_keys` |
//! | first modify      | prior value in `old_values` |
//! | remove            | prior value in `removed` (or drop from `new_keys`) |
//!
//! The three sets are disjoint except for a key that was removed and then
//! recreated, which sits in both `removed` and `new_keys`.

use crate::ports::LedgerObject;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub(crate) struct UndoState<T: LedgerObject> {
    pub(crate) old_values: BTreeMap<T::Key, T>,
    pub(crate) new_keys: BTreeSet<T::Key>,
    pub(crate) removed: BTreeMap<T::Key, T>,
    pub(crate) old_next_sequence: u64,
}

impl<T: LedgerObject> UndoState<T> {
    pub(crate) fn new(next_sequence: u64) -> Self {
        Self {
            old_values: BTreeMap::new(),
            new_keys: BTreeSet::new(),
            removed: BTreeMap::new(),
            old_next_sequence: next_sequence,
        }
    }

    pub(crate) fn on_create(&mut self, key: T::Key) {
        self.new_keys.insert(key);
    }

    pub(crate) fn on_modify(&mut self, key: T::Key, before: &T) {
        if self.new_keys.contains(&key) || self.old_values.contains_key(&key) {
            return;
        }
        self.old_values.insert(key, before.clone());
    }

    pub(crate) fn on_remove(&mut self, key: T::Key, before: &T) {
        if self.new_keys.remove(&key) {
            return;
        }
        let original = self
            .old_values
            .remove(&key)
            .unwrap_or_else(|| before.clone());
        self.removed.entry(key).or_insert(original);
    }

    /// Fold a committed child session into this (parent) session so that
    /// undoing the parent also reverts the child's changes.
    pub(crate) fn merge_child(&mut self, child: UndoState<T>) {
        for (key, value) in child.old_values {
            if self.new_keys.contains(&key) || self.old_values.contains_key(&key) {
                continue;
            }
            self.old_values.insert(key, value);
        }

        // Removals first: a key removed and recreated by the child appears in
        // both sets and must end up as a modification of the parent's state.
        for (key, value) in child.removed {
            if self.new_keys.remove(&key) {
                continue;
            }
            let original = self.old_values.remove(&key).unwrap_or(value);
            self.removed.entry(key).or_insert(original);
        }

        for key in child.new_keys {
            match self.removed.remove(&key) {
                Some(original) => {
                    self.old_values.insert(key, original);
                }
                None => {
                    self.new_keys.insert(key);
                }
            }
        }
    }
}
