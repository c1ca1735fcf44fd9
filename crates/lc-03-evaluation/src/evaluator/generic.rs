//! # Generic Evaluator
//!
//! Fee machinery shared by every operation.
//!
//! ## Fee Lifecycle
//!
//! | Phase | Step | Effect |
//! |-------|------|--------|
//! | evaluate | `prepare_fee` | resolve the balance / prepaid / csaf split, require the core asset |
//! | evaluate | schedule check | total and real-fee floors from the fee schedule |
//! | apply | balance debit | ordinary balance portion leaves the payer |
//! | apply | `process_fee_options` | prepaid and csaf debited, core supply reduced by balance + prepaid |
//!
//! Fee-exempt transactions skip every apply step and the schedule check.

use super::{Evaluator, OperationResult, TransactionContext};
use crate::database::Database;
use crate::domain::{BaseOperation, EvaluationError, Fee, Operation};
use shared_types::{AccountUid, Asset, AssetAid, ShareType};
use tracing::debug;

/// Resolved fee sources of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeeState {
    pub payer: AccountUid,
    pub from_balance: ShareType,
    pub from_prepaid: ShareType,
    pub from_csaf: ShareType,
    pub total_fee_paid: ShareType,
}

pub struct GenericEvaluator<'op, E: Evaluator> {
    operation: &'op Operation,
    op: &'op E::Op,
    fee: FeeState,
    inner: E,
}

impl<'op, E: Evaluator> GenericEvaluator<'op, E> {
    /// `op` must be the body of `operation`.
    pub fn new(operation: &'op Operation, op: &'op E::Op) -> Self {
        Self {
            operation,
            op,
            fee: FeeState::default(),
            inner: E::default(),
        }
    }

    pub fn fee_state(&self) -> &FeeState {
        &self.fee
    }

    pub fn evaluate(&mut self, ctx: &TransactionContext<'_>) -> Result<(), EvaluationError> {
        let db: &Database = &*ctx.db;
        self.prepare_fee(db, self.op.fee_payer_uid(), self.op.fee())?;
        if !ctx.skip_fee {
            self.check_fee_schedule(db)?;
        }
        self.inner.do_evaluate(self.op, &self.fee, ctx)
    }

    pub fn apply(
        &mut self,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        if !ctx.skip_fee && self.fee.from_balance > 0 {
            let core = ctx.db.params().core_asset;
            ctx.db
                .adjust_balance(self.fee.payer, Asset::new(-self.fee.from_balance, core))?;
        }
        self.process_fee_options(ctx)?;
        self.inner.do_apply(self.op, ctx)
    }

    /// Resolve which pools fund `fee`. Performs no mutation.
    ///
    /// Every asset named by the fee must be the core asset.
    pub fn prepare_fee(
        &mut self,
        db: &Database,
        payer: AccountUid,
        fee: &Fee,
    ) -> Result<(), EvaluationError> {
        db.account(payer)?;
        db.account_statistics(payer)?;
        let core = db.params().core_asset;

        require_core(&fee.total, core)?;
        let mut state = FeeState {
            payer,
            total_fee_paid: fee.total.amount,
            ..Default::default()
        };

        match &fee.options {
            None => state.from_balance = fee.total.amount,
            Some(options) => {
                state.from_balance = portion(&options.from_balance, core)?;
                state.from_prepaid = portion(&options.from_prepaid, core)?;
                state.from_csaf = portion(&options.from_csaf, core)?;
            }
        }

        self.fee = state;
        Ok(())
    }

    /// Settle the prepaid and csaf portions and reconcile core supply.
    /// The ordinary balance portion must already be debited.
    pub fn process_fee_options(
        &self,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        if ctx.skip_fee {
            return Ok(());
        }
        let FeeState {
            payer,
            from_balance,
            from_prepaid,
            from_csaf,
            ..
        } = self.fee;

        let stats = ctx.db.account_statistics(payer)?;
        if from_prepaid > 0 && stats.prepaid < from_prepaid {
            return Err(EvaluationError::InsufficientPrepaid {
                uid: payer,
                available: stats.prepaid,
                required: from_prepaid,
            });
        }
        if from_csaf > 0 && stats.csaf < from_csaf {
            return Err(EvaluationError::InsufficientCsaf {
                uid: payer,
                available: stats.csaf,
                required: from_csaf,
            });
        }

        ctx.db.statistics.modify(&payer, |s| {
            s.prepaid -= from_prepaid;
            s.csaf -= from_csaf;
        })?;

        let core = ctx.db.params().core_asset;
        ctx.db.asset_dynamic_data.modify(&core, |d| {
            d.current_supply -= from_prepaid + from_balance;
        })?;

        debug!(
            payer,
            from_balance, from_prepaid, from_csaf, "fee settled"
        );
        Ok(())
    }

    pub fn calculate_fee_for_operation(&self, db: &Database) -> ShareType {
        db.fee_schedule().calculate_fee(self.operation).amount
    }

    pub fn calculate_fee_pair_for_operation(&self, db: &Database) -> (ShareType, ShareType) {
        db.fee_schedule().calculate_fee_pair(self.operation)
    }

    fn check_fee_schedule(&self, db: &Database) -> Result<(), EvaluationError> {
        let required = self.calculate_fee_for_operation(db);
        if self.fee.total_fee_paid < required {
            return Err(EvaluationError::InsufficientFee {
                paid: self.fee.total_fee_paid,
                required,
            });
        }

        let (_, min_real) = self.calculate_fee_pair_for_operation(db);
        let real = self.fee.from_balance + self.fee.from_prepaid;
        if real < min_real {
            return Err(EvaluationError::InsufficientRealFee {
                paid: real,
                required: min_real,
            });
        }
        Ok(())
    }
}

fn require_core(asset: &Asset, core: AssetAid) -> Result<(), EvaluationError> {
    if asset.asset_id != core {
        return Err(EvaluationError::NonCoreFeeAsset {
            asset: asset.asset_id,
            core,
        });
    }
    Ok(())
}

fn portion(asset: &Option<Asset>, core: AssetAid) -> Result<ShareType, EvaluationError> {
    match asset {
        Some(a) => {
            require_core(a, core)?;
            Ok(a.amount)
        }
        None => Ok(0),
    }
}
