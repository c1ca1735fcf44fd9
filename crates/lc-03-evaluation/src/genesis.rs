//! # Genesis State
//!
//! Seeds a [`Database`] with the core asset and initial accounts.

use crate::config::ChainParameters;
use crate::database::Database;
use crate::domain::{AssetObject, EvaluationError};
use crate::ports::FeeSchedule;
use serde::{Deserialize, Serialize};
use shared_types::{AccountUid, Asset, Authority, PublicKey, ShareType, Timestamp};
use tracing::info;

/// Initial account, controlled by a single key at every tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub uid: AccountUid,
    pub name: String,
    pub key: PublicKey,
    pub core_balance: ShareType,
    pub prepaid: ShareType,
    pub csaf: ShareType,
}

impl GenesisAccount {
    pub fn new(uid: AccountUid, name: impl Into<String>, key: PublicKey) -> Self {
        Self {
            uid,
            name: name.into(),
            key,
            core_balance: 0,
            prepaid: 0,
            csaf: 0,
        }
    }

    pub fn with_core_balance(mut self, amount: ShareType) -> Self {
        self.core_balance = amount;
        self
    }

    pub fn with_prepaid(mut self, amount: ShareType) -> Self {
        self.prepaid = amount;
        self
    }

    pub fn with_csaf(mut self, amount: ShareType) -> Self {
        self.csaf = amount;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub initial_timestamp: Timestamp,
    pub core_symbol: String,
    pub core_max_supply: ShareType,
    pub accounts: Vec<GenesisAccount>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            initial_timestamp: 0,
            core_symbol: "CORE".to_string(),
            core_max_supply: 1_000_000_000_000_000,
            accounts: Vec::new(),
        }
    }
}

impl GenesisState {
    pub fn with_account(mut self, account: GenesisAccount) -> Self {
        self.accounts.push(account);
        self
    }
}

impl Database {
    /// Build a ledger from `genesis`.
    ///
    /// The core asset's current supply counts ordinary balances and prepaid
    /// pools; csaf is credit, not supply.
    pub fn from_genesis(
        params: ChainParameters,
        fee_schedule: impl FeeSchedule + 'static,
        genesis: &GenesisState,
    ) -> Result<Self, EvaluationError> {
        let core = params.core_asset;
        let mut db = Database::new(params, fee_schedule);
        db.set_head_block(0, genesis.initial_timestamp);

        let supply: ShareType = genesis
            .accounts
            .iter()
            .map(|a| a.core_balance + a.prepaid)
            .sum();
        db.create_asset(
            AssetObject {
                aid: core,
                symbol: genesis.core_symbol.clone(),
                precision: 5,
                issuer: 0,
                flags: 0,
                max_supply: genesis.core_max_supply,
            },
            supply,
        )?;

        for account in &genesis.accounts {
            let auth = Authority::single_key(account.key);
            db.create_account(account.uid, account.name.clone(), auth.clone(), auth.clone(), auth)?;
            if account.core_balance != 0 {
                db.adjust_balance(account.uid, Asset::new(account.core_balance, core))?;
            }
            db.adjust_prepaid(account.uid, account.prepaid)?;
            db.adjust_csaf(account.uid, account.csaf)?;
        }

        info!(
            accounts = genesis.accounts.len(),
            core_supply = supply,
            "genesis state loaded"
        );
        Ok(db)
    }
}
