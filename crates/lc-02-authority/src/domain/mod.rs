//! # Domain Layer
//!
//! Pure authority logic with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod required;
pub mod verifier;
