//! # Operation Evaluation (LC-03)
//!
//! Evaluates and applies ledger operations: fee preparation and settlement,
//! transfers, multi-party proposals and custom votes.
//!
//! ## Architecture
//!
//! ```text
//! SignedTransaction
//!       │
//!       ▼
//! LedgerService ──► verify_authority (lc-02)
//!       │
//!       ▼
//! apply_operations ──► OperationEvaluator::resolve ──► GenericEvaluator<E>
//!       │                                                  │ prepare_fee / process_fee_options
//!       ▼                                                  ▼
//! Database (lc-01 tables + undo sessions)  ◄──────  E::do_evaluate / E::do_apply
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - ledger objects, operations, proposals, polls, errors
//! - `evaluator/` - generic fee machinery and one evaluator per operation
//! - `ports/` - `LedgerApi` (inbound), `FeeSchedule` (outbound)
//! - `adapters/` - `DefaultFeeSchedule`
//! - `database.rs` - all chain state, undo sessions, authority lookup
//! - `genesis.rs` - initial state
//! - `service.rs` - `LedgerService`, the transaction processor
//!
//! ## Usage
//!
//! ```ignore
//! use lc_03_evaluation::{ChainParameters, Database, DefaultFeeSchedule, GenesisState, LedgerApi, LedgerService};
//!
//! let db = Database::from_genesis(ChainParameters::from_env(), DefaultFeeSchedule::new(0), &genesis)?;
//! let mut ledger = LedgerService::new(db);
//! ledger.advance_head_block(1, block_time)?;
//! let results = ledger.apply_transaction(&signed_trx)?;
//! ```

pub mod adapters;
pub mod config;
pub mod database;
pub mod domain;
pub mod evaluator;
pub mod genesis;
pub mod ports;
pub mod service;

pub use adapters::{DefaultFeeSchedule, FeeParameters};
pub use config::ChainParameters;
pub use database::Database;
pub use domain::{
    AuthorizationStatus, CustomVoteObject, EvaluationError, Fee, FeeOptions, Operation,
    OperationKind, ProposalId, ProposalObject, SignedTransaction, Transaction,
};
pub use evaluator::{
    apply_operations, clear_expired_proposals, push_proposal, FeeState, GenericEvaluator,
    ObjectRef, OperationEvaluator, OperationResult, TransactionContext,
};
pub use genesis::{GenesisAccount, GenesisState};
pub use ports::{FeeSchedule, LedgerApi};
pub use service::LedgerService;
