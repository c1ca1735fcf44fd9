//! # Domain Layer
//!
//! Ledger objects, the operation catalog and derived indexes. No evaluation
//! logic lives here.

pub mod approval_index;
pub mod custom_vote;
pub mod errors;
pub mod objects;
pub mod operations;
pub mod proposal;

pub use approval_index::RequiredApprovalIndex;
pub use custom_vote::{BallotObject, CustomVoteKey, CustomVoteObject};
pub use errors::EvaluationError;
pub use objects::*;
pub use operations::*;
pub use proposal::{AuthorizationStatus, ProposalId, ProposalObject};
