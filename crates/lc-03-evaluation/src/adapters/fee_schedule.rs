//! # Default Fee Schedule
//!
//! Flat fee per operation kind plus a data fee on the operation's encoded
//! size:
//!
//! ```text
//! total    = fee + price_per_kbyte * serialized_size / 1024
//! min_real = min(total, max(min_real_fee, total * min_rf_percent / 10000))
//! ```

use crate::domain::{Operation, OperationKind};
use crate::ports::FeeSchedule;
use serde::{Deserialize, Serialize};
use shared_types::{Asset, AssetAid, ShareType, BLOCKCHAIN_PRECISION};
use std::collections::BTreeMap;

/// `min_rf_percent` value meaning 100%.
pub const HUNDRED_PERCENT: u64 = 10_000;

/// Fee knobs of one operation kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParameters {
    pub fee: u64,
    pub price_per_kbyte: u32,
    pub min_real_fee: u64,
    pub min_rf_percent: u16,
}

impl FeeParameters {
    pub fn flat(fee: u64) -> Self {
        Self {
            fee,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultFeeSchedule {
    core_asset: AssetAid,
    parameters: BTreeMap<OperationKind, FeeParameters>,
}

impl DefaultFeeSchedule {
    /// Schedule with the stock parameters for every operation kind.
    pub fn new(core_asset: AssetAid) -> Self {
        let p = BLOCKCHAIN_PRECISION as u64;
        let kbyte = BLOCKCHAIN_PRECISION as u32;
        let mut parameters = BTreeMap::new();
        parameters.insert(
            OperationKind::Transfer,
            FeeParameters {
                fee: 20 * p,
                price_per_kbyte: 10 * kbyte,
                ..Default::default()
            },
        );
        parameters.insert(
            OperationKind::ProposalCreate,
            FeeParameters {
                fee: p,
                price_per_kbyte: kbyte,
                ..Default::default()
            },
        );
        parameters.insert(
            OperationKind::ProposalUpdate,
            FeeParameters {
                fee: p,
                price_per_kbyte: kbyte,
                ..Default::default()
            },
        );
        parameters.insert(OperationKind::ProposalDelete, FeeParameters::flat(p));
        parameters.insert(
            OperationKind::CustomVoteCreate,
            FeeParameters {
                fee: 10 * p,
                price_per_kbyte: kbyte,
                ..Default::default()
            },
        );
        parameters.insert(OperationKind::CustomVoteCast, FeeParameters::flat(p / 10));
        Self {
            core_asset,
            parameters,
        }
    }

    /// Schedule charging nothing for anything.
    pub fn free(core_asset: AssetAid) -> Self {
        Self {
            core_asset,
            parameters: BTreeMap::new(),
        }
    }

    /// Builder method to replace one kind's parameters.
    pub fn with_parameters(mut self, kind: OperationKind, parameters: FeeParameters) -> Self {
        self.parameters.insert(kind, parameters);
        self
    }

    /// Parameters of `kind`; all zero when unset.
    pub fn parameters(&self, kind: OperationKind) -> FeeParameters {
        self.parameters.get(&kind).copied().unwrap_or_default()
    }

    fn total_fee(&self, op: &Operation) -> u128 {
        let k = self.parameters(op.kind());
        let data_fee = u128::from(op.serialized_size()) * u128::from(k.price_per_kbyte) / 1024;
        u128::from(k.fee) + data_fee
    }
}

fn to_share(amount: u128) -> ShareType {
    ShareType::try_from(amount).unwrap_or(ShareType::MAX)
}

impl FeeSchedule for DefaultFeeSchedule {
    fn calculate_fee(&self, op: &Operation) -> Asset {
        Asset::new(to_share(self.total_fee(op)), self.core_asset)
    }

    fn calculate_fee_pair(&self, op: &Operation) -> (ShareType, ShareType) {
        let k = self.parameters(op.kind());
        let total = self.total_fee(op);
        let by_percent = total * u128::from(k.min_rf_percent) / u128::from(HUNDRED_PERCENT);
        let min_real = by_percent.max(u128::from(k.min_real_fee)).min(total);
        (to_share(total), to_share(min_real))
    }
}
