//! # Ports Layer
//!
//! Traits implemented by stored objects, by derived indexes, and by anything
//! that participates in undo sessions.

pub mod object;

pub use object::*;
