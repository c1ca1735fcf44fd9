//! # Tables
//!
//! A [`Table`] is an ordered arena of one object type, addressed by the key the
//! object carries. All mutation goes through `create`, `modify` and `remove`,
//! which record undo information and drive the table's secondary index.

use super::errors::StoreError;
use super::undo::UndoState;
use crate::ports::{LedgerObject, NoIndex, SecondaryIndex, UndoScope};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Table<T: LedgerObject, I = NoIndex> {
    objects: BTreeMap<T::Key, T>,
    /// Monotonic counter handed out by `create_with` for tables whose keys
    /// are allocated by the store.
    next_sequence: u64,
    undo_stack: Vec<UndoState<T>>,
    index: I,
}

impl<T: LedgerObject, I: SecondaryIndex<T> + Default> Default for Table<T, I> {
    fn default() -> Self {
        Self::with_index(I::default())
    }
}

impl<T: LedgerObject, I: SecondaryIndex<T>> Table<T, I> {
    pub fn with_index(index: I) -> Self {
        Self {
            objects: BTreeMap::new(),
            next_sequence: 0,
            undo_stack: Vec::new(),
            index,
        }
    }

    // === Reads ===

    pub fn get(&self, key: &T::Key) -> Result<&T, StoreError> {
        self.objects
            .get(key)
            .ok_or_else(|| StoreError::not_found(T::TABLE, key))
    }

    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.objects.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.objects.contains_key(key)
    }

    /// Objects in key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// The value the next `create_with` will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    // === Writes ===

    pub fn create(&mut self, obj: T) -> Result<T::Key, StoreError> {
        let key = obj.key();
        if self.objects.contains_key(&key) {
            return Err(StoreError::already_exists(T::TABLE, &key));
        }

        if let Some(state) = self.undo_stack.last_mut() {
            state.on_create(key);
        }
        self.index.object_inserted(&obj);
        self.objects.insert(key, obj);

        trace!(table = T::TABLE, key = ?key, "object created");
        Ok(key)
    }

    /// Create an object whose key derives from the table's sequence counter.
    /// The counter only advances if the object is stored.
    pub fn create_with<F>(&mut self, init: F) -> Result<T::Key, StoreError>
    where
        F: FnOnce(u64) -> T,
    {
        let obj = init(self.next_sequence);
        let key = self.create(obj)?;
        self.next_sequence += 1;
        Ok(key)
    }

    /// Copy-modify-write: the mutator runs on a clone, which then replaces
    /// the stored record. The key must survive the mutation.
    pub fn modify<F>(&mut self, key: &T::Key, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        let before = self.get(key)?.clone();
        let mut after = before.clone();
        mutate(&mut after);

        if after.key() != *key {
            return Err(StoreError::KeyChanged {
                table: T::TABLE,
                before: format!("{key:?}"),
                after: format!("{:?}", after.key()),
            });
        }

        if let Some(state) = self.undo_stack.last_mut() {
            state.on_modify(*key, &before);
        }
        self.index.object_modified(&before, &after);
        self.objects.insert(*key, after);
        Ok(())
    }

    pub fn remove(&mut self, key: &T::Key) -> Result<T, StoreError> {
        let obj = self
            .objects
            .remove(key)
            .ok_or_else(|| StoreError::not_found(T::TABLE, key))?;

        if let Some(state) = self.undo_stack.last_mut() {
            state.on_remove(*key, &obj);
        }
        self.index.object_removed(&obj);

        trace!(table = T::TABLE, key = ?key, "object removed");
        Ok(obj)
    }

    fn pop_session(&mut self) -> Result<UndoState<T>, StoreError> {
        self.undo_stack
            .pop()
            .ok_or(StoreError::NoActiveSession { table: T::TABLE })
    }
}

impl<T: LedgerObject, I: SecondaryIndex<T>> UndoScope for Table<T, I> {
    fn start_undo_session(&mut self) {
        self.undo_stack.push(UndoState::new(self.next_sequence));
    }

    fn undo(&mut self) -> Result<(), StoreError> {
        let state = self.pop_session()?;

        for key in &state.new_keys {
            if let Some(obj) = self.objects.remove(key) {
                self.index.object_removed(&obj);
            }
        }
        for (key, original) in state.old_values {
            match self.objects.insert(key, original.clone()) {
                Some(current) => self.index.object_modified(&current, &original),
                None => self.index.object_inserted(&original),
            }
        }
        for (key, original) in state.removed {
            self.index.object_inserted(&original);
            self.objects.insert(key, original);
        }
        self.next_sequence = state.old_next_sequence;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let state = self.pop_session()?;
        if let Some(parent) = self.undo_stack.last_mut() {
            parent.merge_child(state);
        }
        Ok(())
    }
}
