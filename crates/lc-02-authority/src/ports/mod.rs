//! # Ports Layer
//!
//! - **Outbound (Driven)**: authority lookups and signature verification this
//!   crate depends on.

pub mod outbound;
