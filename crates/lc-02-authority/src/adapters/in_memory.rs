//! # In-Memory Authority Table
//!
//! Standalone [`AuthorityLookup`] for tests and tooling that have no ledger
//! database at hand.

use crate::ports::outbound::AuthorityLookup;
use shared_types::{AccountUid, Authority, AuthorityTier, PublicKey};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AccountAuthorities {
    owner: Authority,
    active: Authority,
    secondary: Authority,
}

/// Account uid → authorities per tier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorities {
    accounts: BTreeMap<AccountUid, AccountAuthorities>,
}

impl InMemoryAuthorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account's authorities.
    pub fn insert(
        &mut self,
        uid: AccountUid,
        owner: Authority,
        active: Authority,
        secondary: Authority,
    ) {
        self.accounts.insert(
            uid,
            AccountAuthorities {
                owner,
                active,
                secondary,
            },
        );
    }

    /// Insert an account controlled by one key at every tier.
    pub fn insert_single_key(&mut self, uid: AccountUid, key: PublicKey) {
        let auth = Authority::single_key(key);
        self.insert(uid, auth.clone(), auth.clone(), auth);
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AuthorityLookup for InMemoryAuthorities {
    fn authority(&self, uid: AccountUid, tier: AuthorityTier) -> Option<Authority> {
        let account = self.accounts.get(&uid)?;
        let auth = match tier {
            AuthorityTier::Owner => &account.owner,
            AuthorityTier::Active => &account.active,
            AuthorityTier::Secondary => &account.secondary,
        };
        Some(auth.clone())
    }
}
