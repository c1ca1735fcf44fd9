//! # Custom Vote Evaluators
//!
//! Poll creation and ballot casting. Both are gated on the 0.4 hardfork
//! time.
//!
//! ## Cast Admission
//!
//! A ballot is admitted when all of these hold at head block time `now`:
//!
//! - the poll `(creator, vid)` exists and `now <= expired_time`
//! - `minimum_selected_items <= |selection| <= maximum_selected_items`
//! - the voter's votes from core balance reach `required_amount`
//! - the largest selected index names an existing option
//! - the voter has not cast a ballot on this poll before
//!
//! An admitted ballot adds the voter's stake to every selected option.

use super::{Evaluator, FeeState, ObjectRef, OperationResult, TransactionContext};
use crate::database::Database;
use crate::domain::{
    BallotObject, CustomVoteCastOperation, CustomVoteCreateOperation, CustomVoteObject,
    EvaluationError, OperationKind,
};
use shared_types::ShareType;
use tracing::debug;

fn require_hardfork(db: &Database) -> Result<(), EvaluationError> {
    let now = db.head_block_time();
    if !db.enabled_hardfork() {
        return Err(EvaluationError::HardforkNotActive {
            now,
            activation: db.params().hardfork_04_time,
        });
    }
    Ok(())
}

// =============================================================================
// CREATE
// =============================================================================

#[derive(Debug, Default)]
pub struct CustomVoteCreateEvaluator;

impl Evaluator for CustomVoteCreateEvaluator {
    type Op = CustomVoteCreateOperation;

    fn do_evaluate(
        &mut self,
        op: &CustomVoteCreateOperation,
        _fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let db = &*ctx.db;
        require_hardfork(db)?;

        let stats = db.account_statistics(op.creator)?;
        let Some(expected) = stats.last_custom_vote_sequence.checked_add(1) else {
            return Err(EvaluationError::invalid(
                OperationKind::CustomVoteCreate,
                "custom vote sequence exhausted",
            ));
        };
        if op.vid != expected {
            return Err(EvaluationError::VoteSequenceMismatch {
                creator: op.creator,
                expected,
                provided: op.vid,
            });
        }

        db.asset(op.asset_id)?;

        let now = db.head_block_time();
        let end = now.saturating_add(db.params().custom_vote_effective_time);
        if op.expired_time <= now || op.expired_time >= end {
            return Err(EvaluationError::VoteExpirationOutOfRange {
                expiration: op.expired_time,
                start: now,
                end,
            });
        }
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &CustomVoteCreateOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        let key = ctx.db.custom_votes.create(CustomVoteObject {
            creator: op.creator,
            vid: op.vid,
            title: op.title.clone(),
            description: op.description.clone(),
            expired_time: op.expired_time,
            asset_id: op.asset_id,
            required_amount: op.required_amount,
            minimum_selected_items: op.minimum_selected_items,
            maximum_selected_items: op.maximum_selected_items,
            options: op.options.clone(),
            vote_result: vec![0; op.options.len()],
        })?;
        ctx.db
            .statistics
            .modify(&op.creator, |s| s.last_custom_vote_sequence += 1)?;

        debug!(creator = op.creator, vid = op.vid, options = op.options.len(), "custom vote created");
        Ok(OperationResult::ObjectCreated(ObjectRef::CustomVote(key)))
    }
}

// =============================================================================
// CAST
// =============================================================================

#[derive(Debug, Default)]
pub struct CustomVoteCastEvaluator {
    /// Voter stake captured at evaluation.
    weight: ShareType,
}

impl Evaluator for CustomVoteCastEvaluator {
    type Op = CustomVoteCastOperation;

    fn do_evaluate(
        &mut self,
        op: &CustomVoteCastOperation,
        _fee: &FeeState,
        ctx: &TransactionContext<'_>,
    ) -> Result<(), EvaluationError> {
        let db = &*ctx.db;
        require_hardfork(db)?;
        let stats = db.account_statistics(op.voter)?;

        let poll = db
            .find_custom_vote(op.creator, op.vid)
            .ok_or(EvaluationError::CustomVoteNotFound {
                creator: op.creator,
                vid: op.vid,
            })?;

        let now = db.head_block_time();
        if !poll.is_open(now) {
            return Err(EvaluationError::CustomVoteExpired {
                creator: op.creator,
                vid: op.vid,
                expired_time: poll.expired_time,
                now,
            });
        }

        if !poll.accepts_selection_count(op.selection.len()) {
            return Err(EvaluationError::SelectionCountOutOfRange {
                count: op.selection.len(),
                min: poll.minimum_selected_items,
                max: poll.maximum_selected_items,
            });
        }

        let votes = stats.votes_from_core_balance();
        if votes < poll.required_amount {
            return Err(EvaluationError::InsufficientStake {
                asset: poll.asset_id,
                available: votes,
                required: poll.required_amount,
            });
        }

        if let Some(&last) = op.selection.last() {
            if usize::from(last) >= poll.options.len() {
                return Err(EvaluationError::OptionOutOfRange {
                    index: last,
                    options: poll.options.len(),
                });
            }
        }

        if db.has_voted(op.creator, op.vid, op.voter) {
            return Err(EvaluationError::AlreadyVoted {
                voter: op.voter,
                creator: op.creator,
                vid: op.vid,
            });
        }

        self.weight = votes;
        Ok(())
    }

    fn do_apply(
        &mut self,
        op: &CustomVoteCastOperation,
        ctx: &mut TransactionContext<'_>,
    ) -> Result<OperationResult, EvaluationError> {
        // Evaluation runs before any apply, so a second cast by the same voter
        // in one bundle is only visible here.
        if ctx.db.has_voted(op.creator, op.vid, op.voter) {
            return Err(EvaluationError::AlreadyVoted {
                voter: op.voter,
                creator: op.creator,
                vid: op.vid,
            });
        }
        let weight = self.weight;
        ctx.db.custom_votes.modify(&(op.creator, op.vid), |poll| {
            for index in &op.selection {
                if let Some(tally) = poll.vote_result.get_mut(usize::from(*index)) {
                    *tally += weight;
                }
            }
        })?;
        ctx.db.ballots.create(BallotObject {
            creator: op.creator,
            vid: op.vid,
            voter: op.voter,
            selection: op.selection.clone(),
            weight,
        })?;

        debug!(voter = op.voter, creator = op.creator, vid = op.vid, weight, "ballot cast");
        Ok(OperationResult::Void)
    }
}
