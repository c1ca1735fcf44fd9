//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::Operation;
use shared_types::{Asset, ShareType};
use std::fmt::Debug;

/// Pure mapping from an operation to its fee.
///
/// Implementations must be deterministic; every node charges the same fee
/// for the same operation under the same schedule.
pub trait FeeSchedule: Debug {
    /// Minimum total fee, in the core asset.
    fn calculate_fee(&self, op: &Operation) -> Asset;

    /// `(total, min_real)`: the minimum total fee and the part of it that
    /// must come from the ordinary balance or prepaid pool rather than csaf.
    fn calculate_fee_pair(&self, op: &Operation) -> (ShareType, ShareType);
}
