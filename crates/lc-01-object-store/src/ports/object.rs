use crate::domain::StoreError;
use std::fmt::Debug;

/// A record that can live in a [`Table`](crate::Table).
///
/// The key is carried by the object itself and must never change across a
/// `modify`; the table rejects a mutator that rewrites it.
pub trait LedgerObject: Clone + Debug {
    /// Table name used in diagnostics.
    const TABLE: &'static str;

    /// Stable identifier.
    type Key: Copy + Ord + Debug;

    fn key(&self) -> Self::Key;
}

/// Derived lookup structure kept in lock-step with a table.
///
/// The table calls these hooks for every mutation, including the inverse
/// mutations performed while undoing a session, so an index never has to
/// know about sessions itself.
pub trait SecondaryIndex<T: LedgerObject> {
    fn object_inserted(&mut self, obj: &T);

    fn object_removed(&mut self, obj: &T);

    fn object_modified(&mut self, before: &T, after: &T) {
        self.object_removed(before);
        self.object_inserted(after);
    }
}

/// Index for tables that need no derived lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndex;

impl<T: LedgerObject> SecondaryIndex<T> for NoIndex {
    fn object_inserted(&mut self, _obj: &T) {}

    fn object_removed(&mut self, _obj: &T) {}

    fn object_modified(&mut self, _before: &T, _after: &T) {}
}

/// Anything that can open, revert and commit undo sessions.
///
/// Implemented by [`Table`](crate::Table); a database composed of several
/// tables implements it by fanning out to each of them.
pub trait UndoScope {
    fn start_undo_session(&mut self);

    /// Revert every change made since the matching `start_undo_session`.
    fn undo(&mut self) -> Result<(), StoreError>;

    /// Keep the changes. Inside a nested session they fold into the parent
    /// session and remain revertible from there.
    fn commit(&mut self) -> Result<(), StoreError>;
}
