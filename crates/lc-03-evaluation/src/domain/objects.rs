//! # Ledger Objects
//!
//! Records stored in the [`Database`](crate::Database) tables.
//!
//! ## Split Records
//!
//! Asset metadata that rarely changes (`AssetObject`) is kept apart from the
//! figures every fee touches (`AssetDynamicData`), so routine settlement only
//! records undo state for the small record. Account statistics are split from
//! accounts for the same reason.

use lc_01_object_store::LedgerObject;
use serde::{Deserialize, Serialize};
use shared_types::{AccountUid, AssetAid, Authority, AuthorityTier, BlockNum, ShareType, Timestamp};

// =============================================================================
// ACCOUNTS
// =============================================================================

/// A ledger account and its three authorities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: AccountUid,
    pub name: String,
    pub owner: Authority,
    pub active: Authority,
    pub secondary: Authority,
}

impl Account {
    pub fn authority(&self, tier: AuthorityTier) -> &Authority {
        match tier {
            AuthorityTier::Owner => &self.owner,
            AuthorityTier::Active => &self.active,
            AuthorityTier::Secondary => &self.secondary,
        }
    }
}

impl LedgerObject for Account {
    const TABLE: &'static str = "account";
    type Key = AccountUid;

    fn key(&self) -> AccountUid {
        self.uid
    }
}

/// Per-account counters and fee pools.
///
/// Exists for as long as the account does. Only evaluators mutate it, and
/// only through `Table::modify`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatistics {
    pub owner: AccountUid,
    /// Mirror of the ordinary core-asset balance.
    pub core_balance: ShareType,
    /// Pre-funded fee pool.
    pub prepaid: ShareType,
    /// Collected stake-activity fee credit.
    pub csaf: ShareType,
    /// Sequence number of the last poll this account created. Starts at 0.
    pub last_custom_vote_sequence: u32,
}

impl AccountStatistics {
    pub fn new(owner: AccountUid) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }

    /// Voting power derived from core-asset holdings.
    pub fn votes_from_core_balance(&self) -> ShareType {
        self.core_balance
    }
}

impl LedgerObject for AccountStatistics {
    const TABLE: &'static str = "account_statistics";
    type Key = AccountUid;

    fn key(&self) -> AccountUid {
        self.owner
    }
}

/// Ordinary balance of one asset held by one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub owner: AccountUid,
    pub asset_id: AssetAid,
    pub balance: ShareType,
}

impl LedgerObject for AccountBalance {
    const TABLE: &'static str = "account_balance";
    type Key = (AccountUid, AssetAid);

    fn key(&self) -> (AccountUid, AssetAid) {
        (self.owner, self.asset_id)
    }
}

// =============================================================================
// ASSETS
// =============================================================================

/// Permission flag bits of [`AssetObject::flags`].
pub mod asset_flags {
    pub const CHARGE_MARKET_FEE: u16 = 0x01;
    pub const WHITE_LIST: u16 = 0x02;
    pub const OVERRIDE_AUTHORITY: u16 = 0x04;
    pub const TRANSFER_RESTRICTED: u16 = 0x08;
    pub const ISSUE_ASSET: u16 = 0x200;
    pub const CHANGE_MAX_SUPPLY: u16 = 0x400;
}

/// Static asset metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetObject {
    pub aid: AssetAid,
    pub symbol: String,
    pub precision: u8,
    pub issuer: AccountUid,
    pub flags: u16,
    pub max_supply: ShareType,
}

impl AssetObject {
    pub fn enabled_whitelist(&self) -> bool {
        self.flags & asset_flags::WHITE_LIST != 0
    }

    pub fn can_issue_asset(&self) -> bool {
        self.flags & asset_flags::ISSUE_ASSET != 0
    }

    pub fn can_change_max_supply(&self) -> bool {
        self.flags & asset_flags::CHANGE_MAX_SUPPLY != 0
    }

    pub fn charges_market_fees(&self) -> bool {
        self.flags & asset_flags::CHARGE_MARKET_FEE != 0
    }

    /// Only the issuer may send or receive a transfer-restricted asset.
    pub fn is_transfer_restricted(&self) -> bool {
        self.flags & asset_flags::TRANSFER_RESTRICTED != 0
    }

    pub fn can_override(&self) -> bool {
        self.flags & asset_flags::OVERRIDE_AUTHORITY != 0
    }

    /// Amount still available for future issuance. Never negative.
    pub fn reserved(&self, dynamic: &AssetDynamicData) -> ShareType {
        (self.max_supply - dynamic.current_supply).max(0)
    }
}

impl LedgerObject for AssetObject {
    const TABLE: &'static str = "asset";
    type Key = AssetAid;

    fn key(&self) -> AssetAid {
        self.aid
    }
}

/// Frequently changing asset figures.
///
/// Invariant: `current_supply <= max_supply` of the matching `AssetObject`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDynamicData {
    pub asset_id: AssetAid,
    pub current_supply: ShareType,
    pub accumulated_fees: ShareType,
}

impl LedgerObject for AssetDynamicData {
    const TABLE: &'static str = "asset_dynamic_data";
    type Key = AssetAid;

    fn key(&self) -> AssetAid {
        self.asset_id
    }
}

// =============================================================================
// GLOBALS
// =============================================================================

/// Chain-wide values that move with every block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_num: BlockNum,
    /// The only notion of "now" any evaluator may use.
    pub head_block_time: Timestamp,
}
