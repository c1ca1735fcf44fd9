//! # Inbound Ports (Driving Ports / API)

use crate::domain::{AuthorizationStatus, EvaluationError, ProposalId, SignedTransaction};
use crate::evaluator::OperationResult;
use shared_types::{BlockNum, Timestamp};

/// Entry points block processing drives, in block order.
pub trait LedgerApi {
    /// Verify signatures and authorities, then evaluate and apply every
    /// operation atomically. On error no state changes.
    fn apply_transaction(
        &mut self,
        trx: &SignedTransaction,
    ) -> Result<Vec<OperationResult>, EvaluationError>;

    /// Move the head block forward and settle proposals that expired.
    fn advance_head_block(&mut self, num: BlockNum, time: Timestamp)
        -> Result<(), EvaluationError>;

    /// Whether a pending proposal could execute now. Never fails the ledger.
    fn proposal_status(&self, id: ProposalId) -> Result<AuthorizationStatus, EvaluationError>;
}
