//! # Proposals
//!
//! A proposal holds a transaction until enough parties approve it.
//!
//! ## Approval Sets
//!
//! | Set | Meaning |
//! |-----|---------|
//! | `required`  | accounts whose authority the bundled operations need, per tier, fixed at creation |
//! | `available` | accounts that have approved, per tier |
//! | `available_key_approvals` | keys that have approved directly |
//!
//! Authorization is re-derived on demand by running the weighted threshold
//! verifier with the available approvals treated as already satisfied.

use super::operations::Transaction;
use lc_01_object_store::LedgerObject;
use lc_02_authority::{
    verify_authority, AuthorityError, AuthorityLookup, SignedInformation, TierApprovals,
    VerifyOptions,
};
use serde::{Deserialize, Serialize};
use shared_types::{AccountUid, PublicKey, Signature, Timestamp};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

pub type ProposalId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalObject {
    pub id: ProposalId,
    pub proposer: AccountUid,
    pub expiration_time: Timestamp,
    pub proposed_transaction: Transaction,
    pub required: TierApprovals,
    pub available: TierApprovals,
    pub available_key_approvals: BTreeSet<PublicKey>,
}

/// Outcome of [`ProposalObject::is_authorized_to_execute`].
///
/// `Pending` is a normal state, not a failure of the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Authorized(SignedInformation),
    Pending(AuthorityError),
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

impl ProposalObject {
    /// Every account named in a required or available set.
    pub fn referenced_accounts(&self) -> BTreeSet<AccountUid> {
        let mut accounts = self.required.accounts();
        accounts.extend(self.available.accounts());
        accounts
    }

    /// Whether the collected approvals satisfy the bundled operations.
    pub fn is_authorized_to_execute(
        &self,
        lookup: &dyn AuthorityLookup,
        enabled_hardfork: bool,
        max_depth: u8,
    ) -> AuthorizationStatus {
        let signatures: BTreeMap<PublicKey, Signature> = self
            .available_key_approvals
            .iter()
            .map(|key| (*key, Signature::PLACEHOLDER))
            .collect();

        match verify_authority(
            self.proposed_transaction.operations.as_slice(),
            &signatures,
            lookup,
            &self.available,
            VerifyOptions::for_proposal(enabled_hardfork, max_depth),
        ) {
            Ok(info) => AuthorizationStatus::Authorized(info),
            Err(reason) => {
                trace!(proposal = self.id, %reason, "proposal not yet authorized");
                AuthorizationStatus::Pending(reason)
            }
        }
    }
}

impl LedgerObject for ProposalObject {
    const TABLE: &'static str = "proposal";
    type Key = ProposalId;

    fn key(&self) -> ProposalId {
        self.id
    }
}
