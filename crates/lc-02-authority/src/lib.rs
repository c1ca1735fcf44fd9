//! # Authority Verification (LC-02)
//!
//! Decides whether a set of signatures and explicit approvals satisfies the
//! authorities required by a list of operations.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): required-authority collection and the
//!   weighted threshold verifier. Pure, no I/O.
//! - **Ports Layer** (`ports/`): `AuthorityLookup` (account → authority per
//!   tier) and `SignatureOracle` (key + message + signature → valid?).
//! - **Adapters Layer** (`adapters/`): Ed25519 oracle and an in-memory
//!   authority table.
//!
//! ## Tier Semantics
//!
//! | Requirement | Satisfied by |
//! |-------------|--------------|
//! | secondary   | secondary, active or owner |
//! | active      | active or owner |
//! | owner       | owner |
//!
//! Account members of an authority resolve recursively, at most
//! `max_depth` levels deep. A member that would need deeper resolution
//! contributes no weight.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{Ed25519SignatureOracle, InMemoryAuthorities};
pub use domain::entities::{SignedInformation, TierApprovals, VerifyOptions};
pub use domain::errors::AuthorityError;
pub use domain::required::{RequiredAuthorities, RequiresAuthority};
pub use domain::verifier::verify_authority;
pub use ports::outbound::{collect_signed_keys, AuthorityLookup, SignatureOracle};
