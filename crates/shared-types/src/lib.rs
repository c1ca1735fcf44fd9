//! # Shared Types Crate
//!
//! Ledger primitives used by every ledger-core crate: account and asset
//! identifiers, share amounts, timestamps, keys, signatures and the weighted
//! `Authority` model.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers and authority types are defined
//!   here and nowhere else.
//! - **Deterministic**: integer amounts only, ordered collections only
//!   (`BTreeMap`), so every node serializes and iterates identically.

pub mod authority;
pub mod entities;

pub use authority::*;
pub use entities::*;
