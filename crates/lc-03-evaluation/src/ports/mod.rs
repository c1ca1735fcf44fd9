//! # Ports Layer
//!
//! - **Inbound (Driving)**: `LedgerApi`, what block processing calls.
//! - **Outbound (Driven)**: `FeeSchedule`, the injected fee function.

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerApi;
pub use outbound::FeeSchedule;
