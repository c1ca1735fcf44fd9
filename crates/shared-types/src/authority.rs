//! # Authorities
//!
//! Weighted threshold signer sets. Every account carries three of them, one per
//! tier; an authority may name keys or other accounts (at a given tier) as
//! weighted members.

use crate::entities::{AccountUid, PublicKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weight of a single authority member.
pub type Weight = u16;

/// The three authority tiers of an account, weakest first.
///
/// `Owner` is strictly more powerful than `Active`, which is strictly more
/// powerful than `Secondary`. The derived ordering follows that ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuthorityTier {
    /// Day-to-day posting authority.
    Secondary,
    /// Authority over balances.
    Active,
    /// Authority over the account itself.
    Owner,
}

impl AuthorityTier {
    /// All tiers, weakest first.
    pub const ALL: [AuthorityTier; 3] = [Self::Secondary, Self::Active, Self::Owner];

    /// Tiers able to satisfy a requirement at `self`, strongest last.
    pub fn satisfied_by(self) -> &'static [AuthorityTier] {
        match self {
            Self::Secondary => &Self::ALL,
            Self::Active => &[Self::Active, Self::Owner],
            Self::Owner => &[Self::Owner],
        }
    }
}

impl fmt::Display for AuthorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Secondary => "secondary",
            Self::Active => "active",
            Self::Owner => "owner",
        };
        f.write_str(name)
    }
}

/// An account referenced as an authority member, at a specific tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountAuthority {
    /// The member account.
    pub uid: AccountUid,
    /// Which of the member's authorities must sign.
    pub tier: AuthorityTier,
}

impl AccountAuthority {
    /// Reference `uid`'s authority at `tier`.
    pub fn new(uid: AccountUid, tier: AuthorityTier) -> Self {
        Self { uid, tier }
    }
}

/// A weighted threshold signer set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Authority {
    /// Minimum summed weight required to satisfy this authority.
    pub weight_threshold: u32,
    /// Account members and their weights.
    pub account_auths: BTreeMap<AccountAuthority, Weight>,
    /// Key members and their weights.
    pub key_auths: BTreeMap<PublicKey, Weight>,
}

impl Authority {
    /// An authority satisfied by a single key.
    pub fn single_key(key: PublicKey) -> Self {
        let mut key_auths = BTreeMap::new();
        key_auths.insert(key, 1);
        Self {
            weight_threshold: 1,
            account_auths: BTreeMap::new(),
            key_auths,
        }
    }

    /// Builder method to set the threshold.
    pub fn with_threshold(mut self, weight_threshold: u32) -> Self {
        self.weight_threshold = weight_threshold;
        self
    }

    /// Builder method to add a key member.
    pub fn with_key(mut self, key: PublicKey, weight: Weight) -> Self {
        self.key_auths.insert(key, weight);
        self
    }

    /// Builder method to add an account member.
    pub fn with_account(mut self, uid: AccountUid, tier: AuthorityTier, weight: Weight) -> Self {
        self.account_auths
            .insert(AccountAuthority::new(uid, tier), weight);
        self
    }

    /// Total weight of all members. An authority whose members can never
    /// reach its threshold is unsatisfiable.
    pub fn total_weight(&self) -> u64 {
        let keys: u64 = self.key_auths.values().map(|w| u64::from(*w)).sum();
        let accounts: u64 = self.account_auths.values().map(|w| u64::from(*w)).sum();
        keys + accounts
    }

    /// Whether the threshold is reachable at all.
    pub fn is_satisfiable(&self) -> bool {
        self.weight_threshold > 0 && self.total_weight() >= u64::from(self.weight_threshold)
    }
}
