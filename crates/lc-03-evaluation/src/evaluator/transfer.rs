//! Transfer evaluator.

use super::{Evaluator, FeeState, OperationResult, TransactionContext};
use crate::domain::{EvaluationError, TransferOperation};
use shared_types::{Asset, ShareType};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TransferEvaluator;

impl Evaluator for TransferEvaluator {
    type Op = TransferOperation;

    fn do_evaluate(
        &mut self,
        op: &TransferOperation,
        fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let db = &*ctx.db;
        db.account(op.to)?;
        let asset = db.asset(op.amount.asset_id)?;

        if asset.is_transfer_restricted() && op.from != asset.issuer && op.to != asset.issuer {
            return Err(EvaluationError::TransferRestricted {
                aid: asset.aid,
                from: op.from,
                to: op.to,
            });
        }

        // The balance portion of the fee leaves the same pool first.
        let fee_share = if op.amount.asset_id == db.params().core_asset {
            fee.from_balance
        } else {
            0
        };
        let available = db.balance(op.from, op.amount.asset_id);
        let required = op.amount.amount.checked_add(fee_share).unwrap_or(ShareType::MAX);
        if available < required {
            return Err(EvaluationError::InsufficientBalance {
                uid: op.from,
                asset: op.amount.asset_id,
                available,
                required,
            });
        }
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &TransferOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        ctx.db
            .adjust_balance(op.from, Asset::new(-op.amount.amount, op.amount.asset_id))?;
        ctx.db.adjust_balance(op.to, op.amount)?;
        debug!(from = op.from, to = op.to, asset = op.amount.asset_id, amount = op.amount.amount, "transfer applied");
        Ok(OperationResult::Void)
    }
}
