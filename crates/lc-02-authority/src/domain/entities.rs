//! # Authority Entities

use serde::{Deserialize, Serialize};
use shared_types::{AccountAuthority, AccountUid, AuthorityTier, PublicKey, Signature};
use std::collections::{BTreeMap, BTreeSet};

/// Explicit account-level approvals, one set per tier.
///
/// An account listed here counts as satisfied at that tier without any
/// signature, and at every weaker tier as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierApprovals {
    pub owner: BTreeSet<AccountUid>,
    pub active: BTreeSet<AccountUid>,
    pub secondary: BTreeSet<AccountUid>,
}

impl TierApprovals {
    pub fn get(&self, tier: AuthorityTier) -> &BTreeSet<AccountUid> {
        match tier {
            AuthorityTier::Owner => &self.owner,
            AuthorityTier::Active => &self.active,
            AuthorityTier::Secondary => &self.secondary,
        }
    }

    pub fn get_mut(&mut self, tier: AuthorityTier) -> &mut BTreeSet<AccountUid> {
        match tier {
            AuthorityTier::Owner => &mut self.owner,
            AuthorityTier::Active => &mut self.active,
            AuthorityTier::Secondary => &mut self.secondary,
        }
    }

    /// Every `(account, tier)` pair listed.
    pub fn entries(&self) -> impl Iterator<Item = AccountAuthority> + '_ {
        AuthorityTier::ALL.into_iter().flat_map(move |tier| {
            self.get(tier)
                .iter()
                .map(move |uid| AccountAuthority::new(*uid, tier))
        })
    }

    /// Every account listed at any tier, each once.
    pub fn accounts(&self) -> BTreeSet<AccountUid> {
        self.owner
            .iter()
            .chain(&self.active)
            .chain(&self.secondary)
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() && self.active.is_empty() && self.secondary.is_empty()
    }
}

/// Knobs for a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Whether the post-hardfork authority requirements apply.
    pub enabled_hardfork: bool,
    /// Maximum nesting of account members resolved recursively.
    pub max_depth: u8,
    /// Fail if some supplied signature was not needed by any authority.
    pub reject_unused_signatures: bool,
}

impl VerifyOptions {
    /// Options for checking a signed transaction.
    pub fn for_transaction(enabled_hardfork: bool, max_depth: u8) -> Self {
        Self {
            enabled_hardfork,
            max_depth,
            reject_unused_signatures: true,
        }
    }

    /// Options for checking a pending proposal. Extra key approvals are
    /// tolerated so that adding an approval never revokes authorization.
    pub fn for_proposal(enabled_hardfork: bool, max_depth: u8) -> Self {
        Self {
            enabled_hardfork,
            max_depth,
            reject_unused_signatures: false,
        }
    }
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedInformation {
    /// Signatures that contributed weight, by key.
    pub signatures: BTreeMap<PublicKey, Signature>,
    /// Account authorities found satisfied, directly or by approval.
    pub approved: BTreeSet<AccountAuthority>,
    /// Supplied keys that no authority needed.
    pub unused_keys: BTreeSet<PublicKey>,
}

impl SignedInformation {
    pub fn has_approval(&self, uid: AccountUid, tier: AuthorityTier) -> bool {
        tier.satisfied_by()
            .iter()
            .any(|t| self.approved.contains(&AccountAuthority::new(uid, *t)))
    }
}
