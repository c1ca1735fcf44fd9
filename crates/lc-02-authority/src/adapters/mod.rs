//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

pub mod ed25519;
pub mod in_memory;

pub use ed25519::Ed25519SignatureOracle;
pub use in_memory::InMemoryAuthorities;
