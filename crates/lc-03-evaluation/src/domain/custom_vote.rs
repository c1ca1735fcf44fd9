//! # Custom Votes
//!
//! Polls are keyed by `(creator, vid)`; a creator's `vid`s run 1, 2, 3, ...
//! without gaps. A poll is open while `head_block_time <= expired_time`;
//! expiry is a predicate, never a stored state.

use lc_01_object_store::LedgerObject;
use serde::{Deserialize, Serialize};
use shared_types::{AccountUid, AssetAid, ShareType, Timestamp};
use std::collections::BTreeSet;

pub type CustomVoteKey = (AccountUid, u32);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoteObject {
    pub creator: AccountUid,
    pub vid: u32,
    pub title: String,
    pub description: String,
    pub expired_time: Timestamp,
    /// Asset a voter must hold to be eligible.
    pub asset_id: AssetAid,
    pub required_amount: ShareType,
    pub minimum_selected_items: u8,
    pub maximum_selected_items: u8,
    pub options: Vec<String>,
    /// Running tally, one slot per option.
    pub vote_result: Vec<ShareType>,
}

impl CustomVoteObject {
    pub fn is_open(&self, now: Timestamp) -> bool {
        now <= self.expired_time
    }

    pub fn accepts_selection_count(&self, count: usize) -> bool {
        count >= usize::from(self.minimum_selected_items)
            && count <= usize::from(self.maximum_selected_items)
    }
}

impl LedgerObject for CustomVoteObject {
    const TABLE: &'static str = "custom_vote";
    type Key = CustomVoteKey;

    fn key(&self) -> CustomVoteKey {
        (self.creator, self.vid)
    }
}

/// Record of one voter's ballot on one poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotObject {
    pub creator: AccountUid,
    pub vid: u32,
    pub voter: AccountUid,
    pub selection: BTreeSet<u8>,
    /// Stake credited to each selected option.
    pub weight: ShareType,
}

impl LedgerObject for BallotObject {
    const TABLE: &'static str = "ballot";
    type Key = (AccountUid, u32, AccountUid);

    fn key(&self) -> Self::Key {
        (self.creator, self.vid, self.voter)
    }
}
