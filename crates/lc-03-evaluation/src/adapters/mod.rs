//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.

pub mod fee_schedule;

pub use fee_schedule::{DefaultFeeSchedule, FeeParameters, HUNDRED_PERCENT};
