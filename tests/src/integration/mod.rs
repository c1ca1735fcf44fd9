//! # End-to-End Scenarios
//!
//! Each module drives a fresh [`TestLedger`](crate::fixtures::TestLedger)
//! through signed transactions and block advances only.

pub mod fee_split;
pub mod poll_lifecycle;
pub mod proposal_lifecycle;
