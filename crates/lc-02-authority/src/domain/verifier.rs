//! # Weighted Threshold Verification
//!
//! `verify_authority` walks the authorities required by a list of operations
//! and sums member weights from three sources:
//!
//! 1. supplied signatures (key members),
//! 2. explicit approvals (account members, at their tier or stronger),
//! 3. recursive resolution of account members, bounded by `max_depth`.
//!
//! Resolution is a pure function of its inputs; the only ledger access is
//! through [`AuthorityLookup`].

use super::entities::{SignedInformation, TierApprovals, VerifyOptions};
use super::errors::AuthorityError;
use super::required::RequiresAuthority;
use crate::ports::outbound::AuthorityLookup;
use shared_types::{AccountAuthority, AccountUid, Authority, AuthorityTier, PublicKey, Signature};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

struct SignState<'a> {
    lookup: &'a dyn AuthorityLookup,
    provided: &'a BTreeMap<PublicKey, Signature>,
    max_depth: u8,
    used: BTreeSet<PublicKey>,
    /// Seeded from explicit approvals only.
    approved: BTreeSet<AccountAuthority>,
    /// Authorities found satisfied through signatures. Not consulted when
    /// checking, so the outcome never depends on traversal order.
    resolved: BTreeSet<AccountAuthority>,
}

impl<'a> SignState<'a> {
    fn new(
        lookup: &'a dyn AuthorityLookup,
        provided: &'a BTreeMap<PublicKey, Signature>,
        approvals: &TierApprovals,
        max_depth: u8,
    ) -> Self {
        Self {
            lookup,
            provided,
            max_depth,
            used: BTreeSet::new(),
            approved: approvals.entries().collect(),
            resolved: BTreeSet::new(),
        }
    }

    fn is_approved(&self, uid: AccountUid, tier: AuthorityTier) -> bool {
        tier.satisfied_by()
            .iter()
            .any(|t| self.approved.contains(&AccountAuthority::new(uid, *t)))
    }

    /// Sum weights until the threshold is met. A zero threshold is treated as
    /// unsatisfiable.
    fn check_authority(&mut self, auth: &Authority, depth: u8) -> bool {
        if auth.weight_threshold == 0 {
            return false;
        }
        let threshold = u64::from(auth.weight_threshold);
        let mut total: u64 = 0;

        for (key, weight) in &auth.key_auths {
            if self.provided.contains_key(key) {
                self.used.insert(*key);
                total += u64::from(*weight);
                if total >= threshold {
                    return true;
                }
            }
        }

        for (member, weight) in &auth.account_auths {
            let satisfied = self.is_approved(member.uid, member.tier)
                || (depth < self.max_depth && self.resolve(*member, depth + 1));
            if satisfied {
                total += u64::from(*weight);
                if total >= threshold {
                    return true;
                }
            }
        }

        false
    }

    /// Try the member's authority at its tier, then at each stronger tier.
    /// Keys counted by a failed attempt are released again.
    fn resolve(&mut self, member: AccountAuthority, depth: u8) -> bool {
        for tier in member.tier.satisfied_by() {
            let Some(auth) = self.lookup.authority(member.uid, *tier) else {
                return false;
            };
            let checkpoint = self.used.clone();
            if self.check_authority(&auth, depth) {
                self.resolved
                    .insert(AccountAuthority::new(member.uid, *tier));
                return true;
            }
            self.used = checkpoint;
        }
        false
    }

    fn require(&mut self, uid: AccountUid, tier: AuthorityTier) -> Result<(), AuthorityError> {
        if self.is_approved(uid, tier) {
            return Ok(());
        }
        if self.lookup.authority(uid, tier).is_none() {
            return Err(AuthorityError::UnknownAccount { uid });
        }
        if self.resolve(AccountAuthority::new(uid, tier), 0) {
            Ok(())
        } else {
            Err(AuthorityError::MissingAuthority { uid, tier })
        }
    }
}

/// Verify that `signatures` plus `approvals` satisfy every authority the
/// operations require.
///
/// On success the returned [`SignedInformation`] lists the signatures that
/// carried weight and every account authority found satisfied.
pub fn verify_authority<Op: RequiresAuthority>(
    operations: &[Op],
    signatures: &BTreeMap<PublicKey, Signature>,
    lookup: &dyn AuthorityLookup,
    approvals: &TierApprovals,
    options: VerifyOptions,
) -> Result<SignedInformation, AuthorityError> {
    let required = operations.required_authorities(options.enabled_hardfork);
    let mut state = SignState::new(lookup, signatures, approvals, options.max_depth);

    for auth in &required.other {
        if !state.check_authority(auth, 0) {
            debug!(threshold = auth.weight_threshold, "key authority not satisfied");
            return Err(AuthorityError::MissingKeyAuthority {
                threshold: auth.weight_threshold,
            });
        }
    }

    for tier in [AuthorityTier::Owner, AuthorityTier::Active, AuthorityTier::Secondary] {
        for uid in required.tier(tier) {
            state.require(*uid, tier).inspect_err(|e| {
                debug!(uid, %tier, error = %e, "account authority not satisfied");
            })?;
        }
    }

    let unused_keys: BTreeSet<PublicKey> = signatures
        .keys()
        .filter(|k| !state.used.contains(*k))
        .copied()
        .collect();
    if options.reject_unused_signatures && !unused_keys.is_empty() {
        return Err(AuthorityError::UnnecessarySignatures {
            count: unused_keys.len(),
        });
    }

    let used_signatures = signatures
        .iter()
        .filter(|(k, _)| state.used.contains(*k))
        .map(|(k, s)| (*k, *s))
        .collect();

    let mut approved = state.approved;
    approved.extend(state.resolved);

    Ok(SignedInformation {
        signatures: used_signatures,
        approved,
        unused_keys,
    })
}
