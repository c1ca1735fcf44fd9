//! # Ledger Database
//!
//! All chain state in one place: object tables, head block globals, chain
//! parameters and the fee schedule. Evaluators receive it explicitly through
//! a [`TransactionContext`](crate::TransactionContext); there is no global.
//!
//! Tables are mutated only by evaluators in this crate. Everything else reads
//! through the accessors, or uses the balance helpers when seeding state.

use crate::config::ChainParameters;
use crate::domain::{
    Account, AccountBalance, AccountStatistics, AssetDynamicData, AssetObject,
    AuthorizationStatus, BallotObject, CustomVoteObject, DynamicGlobalProperties,
    EvaluationError, ProposalId, ProposalObject, RequiredApprovalIndex,
};
use crate::ports::FeeSchedule;
use lc_01_object_store::{StoreError, Table, UndoScope};
use lc_02_authority::AuthorityLookup;
use shared_types::{
    AccountUid, Asset, AssetAid, Authority, AuthorityTier, BlockNum, ShareType, Timestamp,
};
use tracing::trace;

#[derive(Debug)]
pub struct Database {
    pub(crate) accounts: Table<Account>,
    pub(crate) statistics: Table<AccountStatistics>,
    pub(crate) balances: Table<AccountBalance>,
    pub(crate) assets: Table<AssetObject>,
    pub(crate) asset_dynamic_data: Table<AssetDynamicData>,
    pub(crate) proposals: Table<ProposalObject, RequiredApprovalIndex>,
    pub(crate) custom_votes: Table<CustomVoteObject>,
    pub(crate) ballots: Table<BallotObject>,
    dynamic: DynamicGlobalProperties,
    params: ChainParameters,
    fee_schedule: Box<dyn FeeSchedule>,
}

impl Database {
    /// Empty ledger. Callers seed the core asset and accounts themselves, or
    /// start from [`Database::from_genesis`].
    pub fn new(params: ChainParameters, fee_schedule: impl FeeSchedule + 'static) -> Self {
        Self {
            accounts: Table::default(),
            statistics: Table::default(),
            balances: Table::default(),
            assets: Table::default(),
            asset_dynamic_data: Table::default(),
            proposals: Table::default(),
            custom_votes: Table::default(),
            ballots: Table::default(),
            dynamic: DynamicGlobalProperties::default(),
            params,
            fee_schedule: Box::new(fee_schedule),
        }
    }

    // =========================================================================
    // GLOBALS
    // =========================================================================

    pub fn params(&self) -> &ChainParameters {
        &self.params
    }

    pub fn fee_schedule(&self) -> &dyn FeeSchedule {
        self.fee_schedule.as_ref()
    }

    pub fn dynamic_global_properties(&self) -> &DynamicGlobalProperties {
        &self.dynamic
    }

    pub fn head_block_time(&self) -> Timestamp {
        self.dynamic.head_block_time
    }

    pub fn head_block_num(&self) -> BlockNum {
        self.dynamic.head_block_num
    }

    /// Whether the post-hardfork rules apply at the head block.
    pub fn enabled_hardfork(&self) -> bool {
        self.params.hardfork_04_enabled(self.dynamic.head_block_time)
    }

    pub fn set_head_block(&mut self, num: BlockNum, time: Timestamp) {
        self.dynamic.head_block_num = num;
        self.dynamic.head_block_time = time;
    }

    // =========================================================================
    // TABLE READS
    // =========================================================================

    pub fn accounts(&self) -> &Table<Account> {
        &self.accounts
    }

    pub fn proposals(&self) -> &Table<ProposalObject, RequiredApprovalIndex> {
        &self.proposals
    }

    pub fn custom_votes(&self) -> &Table<CustomVoteObject> {
        &self.custom_votes
    }

    pub fn ballots(&self) -> &Table<BallotObject> {
        &self.ballots
    }

    pub fn account(&self, uid: AccountUid) -> Result<&Account, EvaluationError> {
        self.accounts
            .find(&uid)
            .ok_or(EvaluationError::AccountNotFound { uid })
    }

    pub fn account_statistics(&self, uid: AccountUid) -> Result<&AccountStatistics, EvaluationError> {
        self.statistics
            .find(&uid)
            .ok_or(EvaluationError::AccountNotFound { uid })
    }

    pub fn asset(&self, aid: AssetAid) -> Result<&AssetObject, EvaluationError> {
        self.assets
            .find(&aid)
            .ok_or(EvaluationError::AssetNotFound { aid })
    }

    pub fn asset_dynamic_data(&self, aid: AssetAid) -> Result<&AssetDynamicData, EvaluationError> {
        self.asset_dynamic_data
            .find(&aid)
            .ok_or(EvaluationError::AssetNotFound { aid })
    }

    pub fn core_asset(&self) -> Result<&AssetObject, EvaluationError> {
        self.asset(self.params.core_asset)
    }

    /// Ordinary balance; zero when the account never held the asset.
    pub fn balance(&self, uid: AccountUid, aid: AssetAid) -> ShareType {
        self.balances
            .find(&(uid, aid))
            .map(|b| b.balance)
            .unwrap_or(0)
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&ProposalObject, EvaluationError> {
        self.proposals
            .find(&id)
            .ok_or(EvaluationError::ProposalNotFound { id })
    }

    pub fn find_custom_vote(&self, creator: AccountUid, vid: u32) -> Option<&CustomVoteObject> {
        self.custom_votes.find(&(creator, vid))
    }

    pub fn has_voted(&self, creator: AccountUid, vid: u32, voter: AccountUid) -> bool {
        self.ballots.contains(&(creator, vid, voter))
    }

    /// Run the proposal authorization check against current account state.
    pub fn is_authorized_to_execute(&self, proposal: &ProposalObject) -> AuthorizationStatus {
        proposal.is_authorized_to_execute(
            self,
            self.enabled_hardfork(),
            self.params.max_authority_depth,
        )
    }

    // =========================================================================
    // STATE SEEDING AND BALANCE HELPERS
    // =========================================================================

    /// Create an account together with its statistics record.
    pub fn create_account(
        &mut self,
        uid: AccountUid,
        name: impl Into<String>,
        owner: Authority,
        active: Authority,
        secondary: Authority,
    ) -> Result<(), EvaluationError> {
        self.accounts.create(Account {
            uid,
            name: name.into(),
            owner,
            active,
            secondary,
        })?;
        self.statistics.create(AccountStatistics::new(uid))?;
        Ok(())
    }

    /// Register an asset with its dynamic data.
    pub fn create_asset(
        &mut self,
        asset: AssetObject,
        current_supply: ShareType,
    ) -> Result<(), EvaluationError> {
        let aid = asset.aid;
        self.assets.create(asset)?;
        self.asset_dynamic_data.create(AssetDynamicData {
            asset_id: aid,
            current_supply,
            accumulated_fees: 0,
        })?;
        Ok(())
    }

    /// Add `delta` (possibly negative) to an ordinary balance.
    ///
    /// Core-asset balances are mirrored into `AccountStatistics::core_balance`.
    /// A balance never goes negative.
    pub fn adjust_balance(&mut self, uid: AccountUid, delta: Asset) -> Result<(), EvaluationError> {
        self.account(uid)?;
        let current = self.balance(uid, delta.asset_id);
        let updated = current + delta.amount;
        if updated < 0 {
            return Err(EvaluationError::InsufficientBalance {
                uid,
                asset: delta.asset_id,
                available: current,
                required: -delta.amount,
            });
        }

        let key = (uid, delta.asset_id);
        if self.balances.contains(&key) {
            self.balances.modify(&key, |b| b.balance = updated)?;
        } else {
            self.balances.create(AccountBalance {
                owner: uid,
                asset_id: delta.asset_id,
                balance: updated,
            })?;
        }
        if delta.asset_id == self.params.core_asset {
            self.statistics.modify(&uid, |s| s.core_balance = updated)?;
        }

        trace!(uid, asset = delta.asset_id, delta = delta.amount, updated, "balance adjusted");
        Ok(())
    }

    /// Add to an account's prepaid pool.
    pub fn adjust_prepaid(&mut self, uid: AccountUid, delta: ShareType) -> Result<(), EvaluationError> {
        let available = self.account_statistics(uid)?.prepaid;
        if available + delta < 0 {
            return Err(EvaluationError::InsufficientPrepaid {
                uid,
                available,
                required: -delta,
            });
        }
        self.statistics.modify(&uid, |s| s.prepaid += delta)?;
        Ok(())
    }

    /// Add to an account's csaf pool.
    pub fn adjust_csaf(&mut self, uid: AccountUid, delta: ShareType) -> Result<(), EvaluationError> {
        let available = self.account_statistics(uid)?.csaf;
        if available + delta < 0 {
            return Err(EvaluationError::InsufficientCsaf {
                uid,
                available,
                required: -delta,
            });
        }
        self.statistics.modify(&uid, |s| s.csaf += delta)?;
        Ok(())
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Run `f` inside an undo session: committed on `Ok`, reverted on `Err`.
    pub fn with_undo_session<T, F>(&mut self, f: F) -> Result<T, EvaluationError>
    where
        F: FnOnce(&mut Database) -> Result<T, EvaluationError>,
    {
        self.start_undo_session();
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                self.undo()?;
                Err(err)
            }
        }
    }

    fn tables(&mut self) -> [&mut dyn UndoScope; 8] {
        [
            &mut self.accounts,
            &mut self.statistics,
            &mut self.balances,
            &mut self.assets,
            &mut self.asset_dynamic_data,
            &mut self.proposals,
            &mut self.custom_votes,
            &mut self.ballots,
        ]
    }
}

impl UndoScope for Database {
    fn start_undo_session(&mut self) {
        for table in self.tables() {
            table.start_undo_session();
        }
    }

    fn undo(&mut self) -> Result<(), StoreError> {
        for table in self.tables() {
            table.undo()?;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        for table in self.tables() {
            table.commit()?;
        }
        Ok(())
    }
}

impl AuthorityLookup for Database {
    fn authority(&self, uid: AccountUid, tier: AuthorityTier) -> Option<Authority> {
        self.accounts.find(&uid).map(|a| a.authority(tier).clone())
    }
}
