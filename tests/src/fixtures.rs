//! Test ledger with one Ed25519 key per account.

use ed25519_dalek::{Signer, SigningKey};
use lc_03_evaluation::{
    ChainParameters, Database, DefaultFeeSchedule, EvaluationError, GenesisAccount, GenesisState,
    LedgerApi, LedgerService, Operation, OperationResult, SignedTransaction, Transaction,
};
use shared_types::{
    AccountUid, Asset, Authority, AuthorityTier, BlockNum, PublicKey, ShareType,
    Signature, Timestamp,
};
use std::collections::BTreeMap;

/// Genesis time of every test ledger.
pub const GENESIS_TIME: Timestamp = 1_600_000_000;

/// Seconds a submitted transaction stays valid.
pub const TRX_LIFETIME: u64 = 60;

/// Deterministic key of `uid`.
pub fn signing_key(uid: AccountUid) -> SigningKey {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&uid.to_le_bytes());
    seed[31] = 0x5A;
    SigningKey::from_bytes(&seed)
}

pub fn public_key(uid: AccountUid) -> PublicKey {
    signing_key(uid).verifying_key().to_bytes()
}

/// Builder input for one genesis account.
#[derive(Debug, Clone, Copy, Default)]
pub struct Funding {
    pub balance: ShareType,
    pub prepaid: ShareType,
    pub csaf: ShareType,
}

impl Funding {
    pub fn balance(balance: ShareType) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }
}

pub struct TestLedger {
    pub service: LedgerService,
    keys: BTreeMap<AccountUid, SigningKey>,
    block: BlockNum,
}

impl TestLedger {
    pub fn builder() -> TestLedgerBuilder {
        TestLedgerBuilder::default()
    }

    pub fn db(&self) -> &Database {
        self.service.database()
    }

    pub fn now(&self) -> Timestamp {
        self.db().head_block_time()
    }

    /// Produce the next block at `time`.
    pub fn advance_to(&mut self, time: Timestamp) {
        self.block += 1;
        self.service
            .advance_head_block(self.block, time)
            .unwrap_or_else(|e| panic!("advance to {time} failed: {e}"));
    }

    pub fn sign(&self, operations: Vec<Operation>, signers: &[AccountUid]) -> SignedTransaction {
        let transaction = Transaction {
            expiration: self.now() + TRX_LIFETIME,
            operations,
        };
        let digest = transaction.digest().expect("digest");
        let signatures = signers
            .iter()
            .map(|uid| {
                let key = &self.keys[uid];
                (
                    key.verifying_key().to_bytes(),
                    Signature(key.sign(&digest).to_bytes()),
                )
            })
            .collect();
        SignedTransaction {
            transaction,
            signatures,
        }
    }

    /// Sign with `signers` and apply.
    pub fn submit(
        &mut self,
        operations: Vec<Operation>,
        signers: &[AccountUid],
    ) -> Result<Vec<OperationResult>, EvaluationError> {
        let trx = self.sign(operations, signers);
        self.service.apply_transaction(&trx)
    }
}

/// Account controlled at every tier by other accounts, no keys.
#[derive(Debug, Clone)]
struct Multisig {
    uid: AccountUid,
    name: String,
    members: Vec<AccountUid>,
    threshold: u32,
    balance: ShareType,
}

pub struct TestLedgerBuilder {
    params: ChainParameters,
    schedule: DefaultFeeSchedule,
    accounts: Vec<(AccountUid, String, Funding)>,
    multisigs: Vec<Multisig>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self {
            params: ChainParameters::default(),
            schedule: DefaultFeeSchedule::free(0),
            accounts: Vec::new(),
            multisigs: Vec::new(),
        }
    }
}

impl TestLedgerBuilder {
    pub fn params(mut self, params: ChainParameters) -> Self {
        self.params = params;
        self
    }

    pub fn fee_schedule(mut self, schedule: DefaultFeeSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn account(mut self, uid: AccountUid, name: &str, funding: Funding) -> Self {
        self.accounts.push((uid, name.to_string(), funding));
        self
    }

    /// Account whose authorities are `members`, weight 1 each.
    pub fn multisig(
        mut self,
        uid: AccountUid,
        name: &str,
        members: &[AccountUid],
        threshold: u32,
        balance: ShareType,
    ) -> Self {
        self.multisigs.push(Multisig {
            uid,
            name: name.to_string(),
            members: members.to_vec(),
            threshold,
            balance,
        });
        self
    }

    pub fn build(self) -> TestLedger {
        let mut genesis = GenesisState {
            initial_timestamp: GENESIS_TIME,
            ..Default::default()
        };
        let mut keys = BTreeMap::new();
        for (uid, name, funding) in self.accounts {
            genesis = genesis.with_account(
                GenesisAccount::new(uid, name, public_key(uid))
                    .with_core_balance(funding.balance)
                    .with_prepaid(funding.prepaid)
                    .with_csaf(funding.csaf),
            );
            keys.insert(uid, signing_key(uid));
        }
        let mut db =
            Database::from_genesis(self.params, self.schedule, &genesis).expect("genesis");
        for m in self.multisigs {
            let authority = m
                .members
                .iter()
                .fold(Authority::default(), |auth, member| {
                    auth.with_account(*member, AuthorityTier::Active, 1)
                })
                .with_threshold(m.threshold);
            db.create_account(m.uid, m.name, authority.clone(), authority.clone(), authority)
                .expect("multisig account");
            db.adjust_balance(m.uid, Asset::core(m.balance))
                .expect("multisig funding");
        }
        TestLedger {
            service: LedgerService::new(db),
            keys,
            block: 0,
        }
    }
}
