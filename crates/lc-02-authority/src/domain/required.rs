//! # Required Authorities
//!
//! What an operation needs signed before it may be applied.

use shared_types::{AccountUid, Authority, AuthorityTier};
use std::collections::BTreeSet;

/// Accounts whose authority is required, per tier, plus key-only authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredAuthorities {
    pub owner: BTreeSet<AccountUid>,
    pub active: BTreeSet<AccountUid>,
    pub secondary: BTreeSet<AccountUid>,
    /// Authorities not tied to an account (e.g. ad-hoc key approvals).
    pub other: Vec<Authority>,
}

impl RequiredAuthorities {
    pub fn tier(&self, tier: AuthorityTier) -> &BTreeSet<AccountUid> {
        match tier {
            AuthorityTier::Owner => &self.owner,
            AuthorityTier::Active => &self.active,
            AuthorityTier::Secondary => &self.secondary,
        }
    }

    pub fn require(&mut self, uid: AccountUid, tier: AuthorityTier) {
        match tier {
            AuthorityTier::Owner => self.owner.insert(uid),
            AuthorityTier::Active => self.active.insert(uid),
            AuthorityTier::Secondary => self.secondary.insert(uid),
        };
    }

    pub fn merge(&mut self, other: RequiredAuthorities) {
        self.owner.extend(other.owner);
        self.active.extend(other.active);
        self.secondary.extend(other.secondary);
        self.other.extend(other.other);
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
            && self.active.is_empty()
            && self.secondary.is_empty()
            && self.other.is_empty()
    }
}

/// Implemented by every operation type.
///
/// `enabled_hardfork` selects the post-hardfork requirement rules; some
/// operations demand more authority once it is active.
pub trait RequiresAuthority {
    fn collect_required(&self, out: &mut RequiredAuthorities, enabled_hardfork: bool);

    fn required_authorities(&self, enabled_hardfork: bool) -> RequiredAuthorities {
        let mut out = RequiredAuthorities::default();
        self.collect_required(&mut out, enabled_hardfork);
        out
    }
}

impl<T: RequiresAuthority> RequiresAuthority for [T] {
    fn collect_required(&self, out: &mut RequiredAuthorities, enabled_hardfork: bool) {
        for item in self {
            item.collect_required(out, enabled_hardfork);
        }
    }
}
