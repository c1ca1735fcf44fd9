//! # Evaluators
//!
//! Two-phase execution of operations:
//!
//! ```text
//! resolve ──► evaluate (read-only, every op) ──► apply (mutating, every op)
//!               │                                   │
//!               └ prepare_fee                       └ debit balance, process_fee_options, do_apply
//! ```
//!
//! A transaction applies only if every one of its operations evaluated
//! cleanly. The caller wraps the apply phase in an undo session so a failure
//! part-way leaves no trace.

pub mod custom_vote;
pub mod generic;
pub mod proposal;
pub mod transfer;

pub use custom_vote::{CustomVoteCastEvaluator, CustomVoteCreateEvaluator};
pub use generic::{FeeState, GenericEvaluator};
pub use proposal::{
    clear_expired_proposals, push_proposal, ProposalCreateEvaluator, ProposalDeleteEvaluator,
    ProposalUpdateEvaluator,
};
pub use transfer::TransferEvaluator;

use crate::database::Database;
use crate::domain::{BaseOperation, CustomVoteKey, EvaluationError, Operation, ProposalId};
use lc_02_authority::SignedInformation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything an evaluator may touch, passed explicitly.
pub struct TransactionContext<'a> {
    pub db: &'a mut Database,
    /// Internally generated transactions pay no fees.
    pub skip_fee: bool,
    /// Signatures and approvals that authorized the transaction.
    pub signed: SignedInformation,
    /// 0 for a top-level transaction, +1 per enclosing proposal execution.
    pub proposal_depth: u8,
}

impl<'a> TransactionContext<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            skip_fee: false,
            signed: SignedInformation::default(),
            proposal_depth: 0,
        }
    }

    pub fn with_skip_fee(mut self, skip_fee: bool) -> Self {
        self.skip_fee = skip_fee;
        self
    }

    pub fn with_signed(mut self, signed: SignedInformation) -> Self {
        self.signed = signed;
        self
    }

    pub fn with_proposal_depth(mut self, depth: u8) -> Self {
        self.proposal_depth = depth;
        self
    }
}

/// Identifier of an object an operation created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectRef {
    Proposal(ProposalId),
    CustomVote(CustomVoteKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    Void,
    ObjectCreated(ObjectRef),
}

/// Operation-specific half of an evaluator. Fee handling is shared and lives
/// in [`GenericEvaluator`].
pub trait Evaluator: Default {
    type Op: BaseOperation;

    /// Read-only precondition checks. State captured here is reused by
    /// `do_apply`.
    fn do_evaluate(
        &mut self,
        op: &Self::Op,
        fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError>;

    fn do_apply(
        &mut self,
        op: &Self::Op,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError>;
}

/// Evaluator registry: one variant per [`Operation`] variant, each bound to
/// its typed operation body.
pub enum OperationEvaluator<'op> {
    Transfer(GenericEvaluator<'op, TransferEvaluator>),
    ProposalCreate(GenericEvaluator<'op, ProposalCreateEvaluator>),
    ProposalUpdate(GenericEvaluator<'op, ProposalUpdateEvaluator>),
    ProposalDelete(GenericEvaluator<'op, ProposalDeleteEvaluator>),
    CustomVoteCreate(GenericEvaluator<'op, CustomVoteCreateEvaluator>),
    CustomVoteCast(GenericEvaluator<'op, CustomVoteCastEvaluator>),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            OperationEvaluator::Transfer($e) => $body,
            OperationEvaluator::ProposalCreate($e) => $body,
            OperationEvaluator::ProposalUpdate($e) => $body,
            OperationEvaluator::ProposalDelete($e) => $body,
            OperationEvaluator::CustomVoteCreate($e) => $body,
            OperationEvaluator::CustomVoteCast($e) => $body,
        }
    };
}

impl<'op> OperationEvaluator<'op> {
    pub fn resolve(op: &'op Operation) -> Self {
        match op {
            Operation::Transfer(body) => Self::Transfer(GenericEvaluator::new(op, body)),
            Operation::ProposalCreate(body) => Self::ProposalCreate(GenericEvaluator::new(op, body)),
            Operation::ProposalUpdate(body) => Self::ProposalUpdate(GenericEvaluator::new(op, body)),
            Operation::ProposalDelete(body) => Self::ProposalDelete(GenericEvaluator::new(op, body)),
            Operation::CustomVoteCreate(body) => {
                Self::CustomVoteCreate(GenericEvaluator::new(op, body))
            }
            Operation::CustomVoteCast(body) => Self::CustomVoteCast(GenericEvaluator::new(op, body)),
        }
    }

    pub fn evaluate(&mut self, ctx: &TransactionContext<'_>) -> Result<(), EvaluationError> {
        dispatch!(self, e => e.evaluate(ctx))
    }

    pub fn apply(
        &mut self,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        dispatch!(self, e => e.apply(ctx))
    }

    pub fn fee_state(&self) -> &FeeState {
        dispatch!(self, e => e.fee_state())
    }
}

/// Evaluate every operation, then apply every operation, in order.
///
/// Does not open an undo session; callers wrap this in
/// [`Database::with_undo_session`].
pub fn apply_operations(
    ctx: &mut TransactionContext<'_>,
    operations: &[Operation],
) -> Result<Vec<OperationResult>, EvaluationError> {
    let mut evaluators: Vec<OperationEvaluator<'_>> =
        operations.iter().map(OperationEvaluator::resolve).collect();

    for (index, evaluator) in evaluators.iter_mut().enumerate() {
        evaluator.evaluate(ctx).inspect_err(|e| {
            debug!(index, kind = %operations[index].kind(), error = %e, "operation rejected");
        })?;
    }

    let mut results = Vec::with_capacity(evaluators.len());
    for evaluator in &mut evaluators {
        results.push(evaluator.apply(ctx)?);
    }

    debug!(
        ops = results.len(),
        signers = ctx.signed.signatures.len(),
        depth = ctx.proposal_depth,
        "operations applied"
    );
    Ok(results)
}
