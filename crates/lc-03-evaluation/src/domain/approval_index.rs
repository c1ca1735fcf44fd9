//! # Required-Approval Index
//!
//! Reverse map from account to the pending proposals naming it in any of the
//! six approval sets (required or available, at each tier). Pure derived
//! state: the proposal table drives it through [`SecondaryIndex`] hooks,
//! undo included, and [`RequiredApprovalIndex::rebuild`] reproduces it from
//! the live proposals alone.
//!
//! Key approvals are not indexed; they name keys, not accounts.

use super::proposal::{ProposalId, ProposalObject};
use lc_01_object_store::SecondaryIndex;
use shared_types::AccountUid;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredApprovalIndex {
    account_to_proposals: BTreeMap<AccountUid, BTreeSet<ProposalId>>,
}

impl RequiredApprovalIndex {
    /// Build from scratch by replaying every live proposal.
    pub fn rebuild<'a>(proposals: impl IntoIterator<Item = &'a ProposalObject>) -> Self {
        let mut index = Self::default();
        for proposal in proposals {
            index.object_inserted(proposal);
        }
        index
    }

    /// Pending proposals that reference `uid`. Empty if none.
    pub fn proposals_for(&self, uid: AccountUid) -> impl Iterator<Item = ProposalId> + '_ {
        self.account_to_proposals
            .get(&uid)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    pub fn contains_account(&self, uid: AccountUid) -> bool {
        self.account_to_proposals.contains_key(&uid)
    }

    /// Number of accounts with at least one pending proposal.
    pub fn len(&self) -> usize {
        self.account_to_proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.account_to_proposals.is_empty()
    }
}

impl SecondaryIndex<ProposalObject> for RequiredApprovalIndex {
    fn object_inserted(&mut self, obj: &ProposalObject) {
        for uid in obj.referenced_accounts() {
            self.account_to_proposals
                .entry(uid)
                .or_default()
                .insert(obj.id);
        }
    }

    fn object_removed(&mut self, obj: &ProposalObject) {
        for uid in obj.referenced_accounts() {
            if let Some(ids) = self.account_to_proposals.get_mut(&uid) {
                ids.remove(&obj.id);
                if ids.is_empty() {
                    self.account_to_proposals.remove(&uid);
                }
            }
        }
    }
}
