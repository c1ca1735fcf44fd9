//! # Error Types
//!
//! Every evaluation failure aborts the enclosing transaction. Validation
//! failures carry the offending values; store and codec failures during
//! apply are internal consistency errors.

use super::operations::OperationKind;
use super::proposal::ProposalId;
use lc_01_object_store::StoreError;
use lc_02_authority::AuthorityError;
use shared_types::{AccountUid, AssetAid, AuthorityTier, ShareType, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    // =========================================================================
    // STATELESS VALIDATION
    // =========================================================================
    #[error("invalid {kind} operation: {reason}")]
    InvalidOperation { kind: OperationKind, reason: String },

    #[error("fee portions sum to {sum}, expected total {total}")]
    FeeSplitMismatch { total: ShareType, sum: ShareType },

    #[error("transaction has no operations")]
    EmptyTransaction,

    #[error("transaction expired at {expiration}, head block time is {now}")]
    TransactionExpired { expiration: Timestamp, now: Timestamp },

    // =========================================================================
    // FEES
    // =========================================================================
    #[error("must use core asset {core} as fee, got asset {asset}")]
    NonCoreFeeAsset { asset: AssetAid, core: AssetAid },

    #[error("insufficient fee: paid {paid}, required {required}")]
    InsufficientFee { paid: ShareType, required: ShareType },

    #[error("insufficient real fee: balance and prepaid cover {paid}, required {required}")]
    InsufficientRealFee { paid: ShareType, required: ShareType },

    #[error("insufficient prepaid: account {uid}'s prepaid of {available} is less than required {required}")]
    InsufficientPrepaid {
        uid: AccountUid,
        available: ShareType,
        required: ShareType,
    },

    #[error("insufficient csaf: account {uid}'s csaf of {available} is less than required {required}")]
    InsufficientCsaf {
        uid: AccountUid,
        available: ShareType,
        required: ShareType,
    },

    #[error("insufficient balance: account {uid} holds {available} of asset {asset}, required {required}")]
    InsufficientBalance {
        uid: AccountUid,
        asset: AssetAid,
        available: ShareType,
        required: ShareType,
    },

    // =========================================================================
    // LEDGER LOOKUPS
    // =========================================================================
    #[error("account {uid} not found")]
    AccountNotFound { uid: AccountUid },

    #[error("asset {aid} not found")]
    AssetNotFound { aid: AssetAid },

    #[error("proposal {id} not found")]
    ProposalNotFound { id: ProposalId },

    #[error("custom vote {vid} of account {creator} not found")]
    CustomVoteNotFound { creator: AccountUid, vid: u32 },

    // =========================================================================
    // TRANSFERS
    // =========================================================================
    #[error("asset {aid} is transfer restricted: {from} -> {to} does not involve the issuer")]
    TransferRestricted {
        aid: AssetAid,
        from: AccountUid,
        to: AccountUid,
    },

    // =========================================================================
    // PROPOSALS
    // =========================================================================
    #[error("proposal expiration {expiration} must be in ({now}, {latest}]")]
    ProposalExpirationOutOfRange {
        expiration: Timestamp,
        now: Timestamp,
        latest: Timestamp,
    },

    #[error("proposal nesting depth {depth} exceeds maximum {max}")]
    ProposalNestingTooDeep { depth: u8, max: u8 },

    #[error("account {uid} already approved proposal at {tier} tier")]
    DuplicateApproval { uid: AccountUid, tier: AuthorityTier },

    #[error("account {uid} has no {tier} approval on the proposal to remove")]
    MissingApproval { uid: AccountUid, tier: AuthorityTier },

    #[error("key {key} already approved the proposal")]
    DuplicateKeyApproval { key: String },

    #[error("key {key} has no approval on the proposal to remove")]
    MissingKeyApproval { key: String },

    #[error("account {uid} is not a required approver of proposal {proposal}")]
    NotRequiredApprover { uid: AccountUid, proposal: ProposalId },

    #[error("proposal {proposal} failed to execute: {source}")]
    ProposalExecutionFailed {
        proposal: ProposalId,
        source: Box<EvaluationError>,
    },

    // =========================================================================
    // CUSTOM VOTES
    // =========================================================================
    #[error("custom votes are enabled from {activation}, head block time is {now}")]
    HardforkNotActive { now: Timestamp, activation: Timestamp },

    #[error("vote_vid {provided} is invalid: account {creator} expects {expected}")]
    VoteSequenceMismatch {
        creator: AccountUid,
        expected: u32,
        provided: u32,
    },

    #[error("vote expired time {expiration} should be in range {start}--{end}")]
    VoteExpirationOutOfRange {
        expiration: Timestamp,
        start: Timestamp,
        end: Timestamp,
    },

    #[error("custom vote {vid} of account {creator} expired at {expired_time}, now {now}")]
    CustomVoteExpired {
        creator: AccountUid,
        vid: u32,
        expired_time: Timestamp,
        now: Timestamp,
    },

    #[error("vote options num {count} is not in range {min} - {max}")]
    SelectionCountOutOfRange { count: usize, min: u8, max: u8 },

    #[error("asset {asset} balance {available} less than required amount for vote {required}")]
    InsufficientStake {
        asset: AssetAid,
        available: ShareType,
        required: ShareType,
    },

    #[error("option {index} is not existent, poll has {options} options")]
    OptionOutOfRange { index: u8, options: usize },

    #[error("account {voter} already voted on custom vote {vid} of account {creator}")]
    AlreadyVoted {
        voter: AccountUid,
        creator: AccountUid,
        vid: u32,
    },

    // =========================================================================
    // WRAPPED
    // =========================================================================
    #[error("authorization failed: {0}")]
    Authority(#[from] AuthorityError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {reason}")]
    Codec { reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl EvaluationError {
    pub(crate) fn invalid(kind: OperationKind, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            kind,
            reason: reason.into(),
        }
    }

    /// Internal consistency failure rather than a rejected user input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Codec { .. } | Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_values() {
        let err = EvaluationError::InsufficientPrepaid {
            uid: 7,
            available: 50,
            required: 60,
        };
        assert_eq!(
            err.to_string(),
            "insufficient prepaid: account 7's prepaid of 50 is less than required 60"
        );

        let err = EvaluationError::SelectionCountOutOfRange {
            count: 3,
            min: 1,
            max: 2,
        };
        assert_eq!(err.to_string(), "vote options num 3 is not in range 1 - 2");
    }

    #[test]
    fn test_internal_classification() {
        let store = EvaluationError::Store(StoreError::NoActiveSession { table: "account" });
        assert!(store.is_internal());
        assert!(!EvaluationError::AccountNotFound { uid: 1 }.is_internal());
        assert!(!EvaluationError::from(AuthorityError::UnknownAccount { uid: 1 }).is_internal());

        // A bundled operation's store rejection does not escape execution.
        let failed = EvaluationError::ProposalExecutionFailed {
            proposal: 4,
            source: Box::new(store),
        };
        assert!(!failed.is_internal());
        assert!(failed.to_string().starts_with("proposal 4 failed to execute: store error"));
    }
}
