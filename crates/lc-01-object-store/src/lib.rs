//! # lc-01-object-store
//!
//! Ledger Object Store for Ledger-Core.
//!
//! ## Role in System
//!
//! - **Versioned records**: accounts, statistics, assets, proposals and polls
//!   live in typed [`Table`]s keyed by stable identifiers.
//! - **Copy-modify-write**: `modify` clones the stored record, runs the mutator
//!   on the copy and writes it back. Evaluators never alias stored records.
//! - **Undo sessions**: every create/modify/remove inside a session is
//!   reversible; nested sessions merge into their parent on commit.
//! - **Derived indexes**: a table drives a [`SecondaryIndex`] through insert,
//!   modify and remove hooks, including while undoing.
//!
//! ```text
//!  start_undo_session ──► create / modify / remove ──► commit ──► (merged into parent)
//!                                         │
//!                                         └──────────► undo ──► state as at session start
//! ```

pub mod domain;
pub mod ports;

pub use domain::*;
pub use ports::*;
