//! # Authority Errors

use shared_types::{AccountUid, AuthorityTier};
use thiserror::Error;

/// Reasons a set of signatures and approvals fails to authorize operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// A required account does not exist.
    #[error("Unknown account {uid}")]
    UnknownAccount { uid: AccountUid },

    /// The account's authority at `tier` (or any stronger tier) is not met.
    #[error("Missing {tier} authority of account {uid}")]
    MissingAuthority { uid: AccountUid, tier: AuthorityTier },

    /// A required key-only authority is not met.
    #[error("Missing key authority (threshold {threshold})")]
    MissingKeyAuthority { threshold: u32 },

    /// Signatures were supplied that no required authority needed.
    #[error("Unnecessary signature(s) detected: {count}")]
    UnnecessarySignatures { count: usize },

    /// A supplied signature does not verify against its key.
    #[error("Invalid signature for key {key}")]
    InvalidSignature { key: String },

    /// The same key signed twice.
    #[error("Duplicate signature for key {key}")]
    DuplicateSignature { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthorityError::MissingAuthority {
            uid: 25,
            tier: AuthorityTier::Active,
        };
        assert_eq!(err.to_string(), "Missing active authority of account 25");

        let err = AuthorityError::UnnecessarySignatures { count: 2 };
        assert_eq!(err.to_string(), "Unnecessary signature(s) detected: 2");
    }
}
