//! Chain parameters consulted by evaluators.

use serde::{Deserialize, Serialize};
use shared_types::{AssetAid, Timestamp, CORE_ASSET_AID};
use std::env;
use std::str::FromStr;

/// Consensus-relevant configuration.
///
/// Every node must run with identical values; they are part of chain state,
/// not local tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParameters {
    /// Maximum nesting of account authorities resolved during verification.
    pub max_authority_depth: u8,
    /// Longest allowed poll duration, in seconds.
    pub custom_vote_effective_time: u64,
    /// Longest allowed proposal lifetime, in seconds.
    pub max_proposal_lifetime: u64,
    /// Maximum depth of proposals executing proposals.
    pub max_proposal_nesting_depth: u8,
    /// The asset every fee is paid in.
    pub core_asset: AssetAid,
    /// Head block time from which custom votes and the post-hardfork
    /// authority rules apply.
    pub hardfork_04_time: Timestamp,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            max_authority_depth: 2,
            custom_vote_effective_time: 30 * 24 * 60 * 60,
            max_proposal_lifetime: 28 * 24 * 60 * 60,
            max_proposal_nesting_depth: 2,
            core_asset: CORE_ASSET_AID,
            hardfork_04_time: 0,
        }
    }
}

impl ChainParameters {
    /// Create parameters from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LEDGER_MAX_AUTHORITY_DEPTH` (default: 2)
    /// - `LEDGER_CUSTOM_VOTE_EFFECTIVE_TIME` (default: 30 days)
    /// - `LEDGER_MAX_PROPOSAL_LIFETIME` (default: 28 days)
    /// - `LEDGER_MAX_PROPOSAL_NESTING_DEPTH` (default: 2)
    /// - `LEDGER_CORE_ASSET` (default: 0)
    /// - `LEDGER_HARDFORK_04_TIME` (default: 0)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_authority_depth: env_or("LEDGER_MAX_AUTHORITY_DEPTH", defaults.max_authority_depth),
            custom_vote_effective_time: env_or(
                "LEDGER_CUSTOM_VOTE_EFFECTIVE_TIME",
                defaults.custom_vote_effective_time,
            ),
            max_proposal_lifetime: env_or(
                "LEDGER_MAX_PROPOSAL_LIFETIME",
                defaults.max_proposal_lifetime,
            ),
            max_proposal_nesting_depth: env_or(
                "LEDGER_MAX_PROPOSAL_NESTING_DEPTH",
                defaults.max_proposal_nesting_depth,
            ),
            core_asset: env_or("LEDGER_CORE_ASSET", defaults.core_asset),
            hardfork_04_time: env_or("LEDGER_HARDFORK_04_TIME", defaults.hardfork_04_time),
        }
    }

    /// Whether the post-hardfork rules apply at `now`.
    pub fn hardfork_04_enabled(&self, now: Timestamp) -> bool {
        now >= self.hardfork_04_time
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = ChainParameters::default();
        assert_eq!(params.max_authority_depth, 2);
        assert_eq!(params.custom_vote_effective_time, 2_592_000);
        assert_eq!(params.core_asset, CORE_ASSET_AID);
        assert!(params.hardfork_04_enabled(0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: ChainParameters =
            serde_json::from_str(r#"{"max_authority_depth": 4, "hardfork_04_time": 500}"#)
                .unwrap();
        assert_eq!(params.max_authority_depth, 4);
        assert_eq!(params.max_proposal_nesting_depth, 2);
        assert!(!params.hardfork_04_enabled(499));
        assert!(params.hardfork_04_enabled(500));
    }

    #[test]
    fn test_env_override() {
        env::set_var("LEDGER_MAX_PROPOSAL_LIFETIME", "3600");
        env::set_var("LEDGER_CORE_ASSET", "not-a-number");
        let params = ChainParameters::from_env();
        env::remove_var("LEDGER_MAX_PROPOSAL_LIFETIME");
        env::remove_var("LEDGER_CORE_ASSET");

        assert_eq!(params.max_proposal_lifetime, 3600);
        assert_eq!(params.core_asset, CORE_ASSET_AID);
    }
}
