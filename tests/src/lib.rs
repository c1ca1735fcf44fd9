//! # Ledger-Core Test Suite
//!
//! Cross-crate scenarios driving the ledger through `LedgerService` with
//! real Ed25519 signatures.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # TestLedger: genesis, keys, signing, block clock
//! └── integration/      # End-to-end scenarios
//!     ├── fee_split.rs
//!     ├── poll_lifecycle.rs
//!     └── proposal_lifecycle.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lc-tests
//! cargo test -p lc-tests integration::poll_lifecycle
//! cargo bench -p lc-tests
//! ```

pub mod fixtures;
pub mod integration;
