use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{table} object not found: {key}")]
    NotFound { table: &'static str, key: String },

    #[error("{table} object already exists: {key}")]
    AlreadyExists { table: &'static str, key: String },

    #[error("{table} mutation changed the object key: {before} -> {after}")]
    KeyChanged {
        table: &'static str,
        before: String,
        after: String,
    },

    #[error("No active undo session on {table}")]
    NoActiveSession { table: &'static str },
}

impl StoreError {
    pub(crate) fn not_found<K: std::fmt::Debug>(table: &'static str, key: &K) -> Self {
        Self::NotFound {
            table,
            key: format!("{key:?}"),
        }
    }

    pub(crate) fn already_exists<K: std::fmt::Debug>(table: &'static str, key: &K) -> Self {
        Self::AlreadyExists {
            table,
            key: format!("{key:?}"),
        }
    }
}
