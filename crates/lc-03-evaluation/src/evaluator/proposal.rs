//! # Proposal Evaluators
//!
//! Create, update and delete pending proposals, plus execution.
//!
//! ## Execution
//!
//! A proposal executes as soon as an update leaves it authorized, or when it
//! expires while authorized. Execution runs the bundled operations in a
//! nested undo session:
//!
//! ```text
//! push_proposal ──► with_undo_session ──► apply_operations ──► remove proposal
//!                        │ on error
//!                        └─► session reverted, proposal stays pending
//! ```
//!
//! A rejected bundled operation surfaces as
//! [`EvaluationError::ProposalExecutionFailed`], never as an internal error,
//! so it cannot abort the transaction or block that triggered execution.
//!
//! Execution depth is bounded by `max_proposal_nesting_depth`.

use super::{apply_operations, Evaluator, FeeState, ObjectRef, OperationResult, TransactionContext};
use crate::database::Database;
use crate::domain::{
    AuthorizationStatus, EvaluationError, Operation, OperationKind, ProposalCreateOperation,
    ProposalDeleteOperation, ProposalId, ProposalObject, ProposalUpdateOperation, Transaction,
};
use lc_02_authority::{RequiresAuthority, SignedInformation, TierApprovals};
use ledger_telemetry::log_proposal_event;
use shared_types::AuthorityTier;
use std::collections::BTreeSet;
use tracing::{error, warn};

// =============================================================================
// CREATE
// =============================================================================

#[derive(Debug, Default)]
pub struct ProposalCreateEvaluator {
    required: TierApprovals,
}

impl Evaluator for ProposalCreateEvaluator {
    type Op = ProposalCreateOperation;

    fn do_evaluate(
        &mut self,
        op: &ProposalCreateOperation,
        _fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let db = &*ctx.db;
        let now = db.head_block_time();
        let latest = now.saturating_add(db.params().max_proposal_lifetime);
        if op.expiration_time <= now || op.expiration_time > latest {
            return Err(EvaluationError::ProposalExpirationOutOfRange {
                expiration: op.expiration_time,
                now,
                latest,
            });
        }

        let nesting = op
            .proposed_ops
            .iter()
            .map(Operation::proposal_nesting_depth)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let depth = ctx.proposal_depth.saturating_add(nesting);
        let max = db.params().max_proposal_nesting_depth;
        if depth > max {
            return Err(EvaluationError::ProposalNestingTooDeep { depth, max });
        }

        let needed = op
            .proposed_ops
            .as_slice()
            .required_authorities(db.enabled_hardfork());
        if !needed.other.is_empty() {
            return Err(EvaluationError::invalid(
                OperationKind::ProposalCreate,
                "key-only authorities cannot be proposed",
            ));
        }

        // A stronger requirement on the same account subsumes the weaker one.
        let owner = needed.owner;
        let active: BTreeSet<_> = needed.active.difference(&owner).copied().collect();
        let secondary = needed
            .secondary
            .into_iter()
            .filter(|uid| !owner.contains(uid) && !active.contains(uid))
            .collect();
        self.required = TierApprovals {
            owner,
            active,
            secondary,
        };
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &ProposalCreateOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        let required = std::mem::take(&mut self.required);
        let id = ctx.db.proposals.create_with(|id| ProposalObject {
            id,
            proposer: op.fee_paying_account,
            expiration_time: op.expiration_time,
            proposed_transaction: Transaction {
                expiration: op.expiration_time,
                operations: op.proposed_ops.clone(),
            },
            required,
            available: TierApprovals::default(),
            available_key_approvals: BTreeSet::new(),
        })?;

        log_proposal_event!(
            info,
            "proposal created",
            id,
            proposer = op.fee_paying_account,
            ops = op.proposed_ops.len()
        );
        Ok(OperationResult::ObjectCreated(ObjectRef::Proposal(id)))
    }
}

// =============================================================================
// UPDATE
// =============================================================================

#[derive(Debug, Default)]
pub struct ProposalUpdateEvaluator;

impl Evaluator for ProposalUpdateEvaluator {
    type Op = ProposalUpdateOperation;

    fn do_evaluate(
        &mut self,
        op: &ProposalUpdateOperation,
        _fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let proposal = ctx.db.proposal(op.proposal)?;

        for tier in AuthorityTier::ALL {
            let available = proposal.available.get(tier);
            if let Some(uid) = op.approvals_to_add(tier).iter().find(|u| available.contains(u)) {
                return Err(EvaluationError::DuplicateApproval { uid: *uid, tier });
            }
            if let Some(uid) = op
                .approvals_to_remove(tier)
                .iter()
                .find(|u| !available.contains(u))
            {
                return Err(EvaluationError::MissingApproval { uid: *uid, tier });
            }
        }

        let keys = &proposal.available_key_approvals;
        if let Some(key) = op.key_approvals_to_add.iter().find(|k| keys.contains(*k)) {
            return Err(EvaluationError::DuplicateKeyApproval {
                key: hex::encode(key),
            });
        }
        if let Some(key) = op.key_approvals_to_remove.iter().find(|k| !keys.contains(*k)) {
            return Err(EvaluationError::MissingKeyApproval {
                key: hex::encode(key),
            });
        }
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &ProposalUpdateOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        ctx.db.proposals.modify(&op.proposal, |p| {
            for tier in AuthorityTier::ALL {
                let available = p.available.get_mut(tier);
                available.extend(op.approvals_to_add(tier));
                for uid in op.approvals_to_remove(tier) {
                    available.remove(uid);
                }
            }
            p.available_key_approvals.extend(&op.key_approvals_to_add);
            for key in &op.key_approvals_to_remove {
                p.available_key_approvals.remove(key);
            }
        })?;

        let status = ctx.db.is_authorized_to_execute(ctx.db.proposal(op.proposal)?);
        if let AuthorizationStatus::Authorized(signed) = status {
            let depth = ctx.proposal_depth.saturating_add(1);
            match execute(ctx.db, op.proposal, signed, depth) {
                Ok(_) => {}
                Err(e) if e.is_internal() => return Err(e),
                Err(e) => {
                    warn!(proposal = op.proposal, error = %e, "authorized proposal failed to execute, left pending");
                }
            }
        }
        Ok(OperationResult::Void)
    }
}

// =============================================================================
// DELETE
// =============================================================================

#[derive(Debug, Default)]
pub struct ProposalDeleteEvaluator;

impl Evaluator for ProposalDeleteEvaluator {
    type Op = ProposalDeleteOperation;

    fn do_evaluate(
        &mut self,
        op: &ProposalDeleteOperation,
        _fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let proposal = ctx.db.proposal(op.proposal)?;
        let payer = op.fee_paying_account;
        let required = &proposal.required;
        let authoritative = if op.using_owner_authority {
            required.owner.contains(&payer)
        } else {
            required.active.contains(&payer) || required.secondary.contains(&payer)
        };
        if !authoritative {
            return Err(EvaluationError::NotRequiredApprover {
                uid: payer,
                proposal: op.proposal,
            });
        }
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &ProposalDeleteOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        // An earlier operation in the same bundle may have removed it.
        ctx.db.proposal(op.proposal)?;
        ctx.db.proposals.remove(&op.proposal)?;
        log_proposal_event!(debug, "proposal deleted", op.proposal, by = op.fee_paying_account);
        Ok(OperationResult::Void)
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Execute proposal `id` at execution depth `depth` (1 for a proposal run by
/// a top-level transaction).
///
/// Fails without side effects if the proposal is not authorized, the depth
/// limit is exceeded or any bundled operation fails. On success the proposal
/// is removed.
pub fn push_proposal(
    db: &mut Database,
    id: ProposalId,
    depth: u8,
) -> Result<Vec<OperationResult>, EvaluationError> {
    let status = db.is_authorized_to_execute(db.proposal(id)?);
    match status {
        AuthorizationStatus::Authorized(signed) => execute(db, id, signed, depth),
        AuthorizationStatus::Pending(reason) => Err(reason.into()),
    }
}

fn execute(
    db: &mut Database,
    id: ProposalId,
    signed: SignedInformation,
    depth: u8,
) -> Result<Vec<OperationResult>, EvaluationError> {
    let max = db.params().max_proposal_nesting_depth;
    if depth > max {
        return Err(EvaluationError::ProposalNestingTooDeep { depth, max });
    }
    let operations = db.proposal(id)?.proposed_transaction.operations.clone();

    let results = db.with_undo_session(|db| {
        let mut ctx = TransactionContext::new(db)
            .with_signed(signed)
            .with_proposal_depth(depth);
        let results = apply_operations(&mut ctx, &operations).map_err(|e| {
            EvaluationError::ProposalExecutionFailed {
                proposal: id,
                source: Box::new(e),
            }
        })?;
        // A bundled delete may already have removed it.
        if db.proposals.contains(&id) {
            db.proposals.remove(&id)?;
        }
        Ok(results)
    })?;

    log_proposal_event!(info, "proposal executed", id, depth, ops = operations.len());
    Ok(results)
}

/// Settle every proposal whose expiration time has been reached.
///
/// Authorized proposals get one execution attempt; whatever is still present
/// afterwards is removed, whatever the outcome of that attempt. Returns the
/// number of proposals settled.
pub fn clear_expired_proposals(db: &mut Database) -> Result<usize, EvaluationError> {
    let now = db.head_block_time();
    let expired: Vec<ProposalId> = db
        .proposals
        .iter()
        .filter(|p| p.expiration_time <= now)
        .map(|p| p.id)
        .collect();

    let mut settled = 0;
    for id in expired {
        // An earlier execution in this loop may have removed it.
        let Some(proposal) = db.proposals.find(&id) else {
            continue;
        };
        let status = db.is_authorized_to_execute(proposal);
        if let AuthorizationStatus::Authorized(signed) = status {
            match execute(db, id, signed, 1) {
                Ok(_) => {}
                Err(e) if e.is_internal() => {
                    error!(proposal = id, error = %e, "expired proposal execution hit a store fault")
                }
                Err(e) => warn!(proposal = id, error = %e, "expired proposal failed to execute"),
            }
        }
        if db.proposals.contains(&id) {
            db.proposals.remove(&id)?;
            log_proposal_event!(debug, "expired proposal removed", id);
        }
        settled += 1;
    }
    Ok(settled)
}
