//! # Core Ledger Entities
//!
//! Primitive identifiers and value types shared by every ledger-core crate.
//!
//! ## Clusters
//!
//! - **Identity**: `AccountUid`, `PublicKey`, `Signature`
//! - **Value**: `AssetAid`, `ShareType`, `Asset`
//! - **Time**: `Timestamp`, `BlockNum`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Stable numeric identifier of an account.
pub type AccountUid = u64;

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 32-byte digest (SHA-256).
pub type Hash = [u8; 32];

/// A raw 64-byte Ed25519 signature.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(#[serde_as(as = "Bytes")] pub [u8; 64]);

impl Signature {
    /// Placeholder used where a key is known to have signed but no bytes exist,
    /// e.g. key approvals recorded on a proposal.
    pub const PLACEHOLDER: Signature = Signature([0u8; 64]);
}

impl Default for Signature {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

// =============================================================================
// CLUSTER B: VALUE
// =============================================================================

/// Numeric identifier of an asset.
pub type AssetAid = u64;

/// Signed share amount. Negative values are only legal as balance deltas.
pub type ShareType = i64;

/// The asset every fee is denominated in.
pub const CORE_ASSET_AID: AssetAid = 0;

/// Smallest-unit multiplier of the core asset.
pub const BLOCKCHAIN_PRECISION: ShareType = 100_000;

/// An amount of a specific asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Asset {
    /// Amount in the asset's smallest unit.
    pub amount: ShareType,
    /// Which asset the amount is denominated in.
    pub asset_id: AssetAid,
}

impl Asset {
    /// Create an amount of `asset_id`.
    pub fn new(amount: ShareType, asset_id: AssetAid) -> Self {
        Self { amount, asset_id }
    }

    /// Create an amount of the core asset.
    pub fn core(amount: ShareType) -> Self {
        Self::new(amount, CORE_ASSET_AID)
    }

    /// Whether this amount is denominated in the core asset.
    pub fn is_core(&self) -> bool {
        self.asset_id == CORE_ASSET_AID
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of asset {}", self.amount, self.asset_id)
    }
}

// =============================================================================
// CLUSTER C: TIME
// =============================================================================

/// Seconds since UNIX epoch, as declared by the head block.
pub type Timestamp = u64;

/// Block height.
pub type BlockNum = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_asset_constructor() {
        let fee = Asset::core(40);
        assert!(fee.is_core());
        assert_eq!(fee.amount, 40);
        assert!(!Asset::new(40, 7).is_core());
    }

    #[test]
    fn test_signature_serde_roundtrip() {
        let sig = Signature([0xAB; 64]);
        let bytes = bincode::serialize(&sig).unwrap();
        let decoded: Signature = bincode::deserialize(&bytes).unwrap();
        assert_eq!(sig, decoded);
    }

    #[test]
    fn test_asset_display() {
        assert_eq!(Asset::new(5, 3).to_string(), "5 of asset 3");
    }
}
