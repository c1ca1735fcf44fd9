//! # Poll Lifecycle
//!
//! Create a poll, admit and reject ballots around its bounds, then let it
//! expire.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Funding, TestLedger};
    use lc_03_evaluation::{
        domain::{CustomVoteCastOperation, CustomVoteCreateOperation},
        EvaluationError, Fee, ObjectRef, Operation, OperationResult,
    };
    use shared_types::{AccountUid, Timestamp};

    const CREATOR: AccountUid = 10;
    const VOTER: AccountUid = 20;
    const SMALL_HOLDER: AccountUid = 30;

    fn ledger() -> TestLedger {
        ledger_telemetry::init_test_logging();
        TestLedger::builder()
            .account(CREATOR, "creator", Funding::balance(0))
            .account(VOTER, "voter", Funding::balance(150))
            .account(SMALL_HOLDER, "small", Funding::balance(99))
            .build()
    }

    fn create_poll(vid: u32, expired_time: Timestamp) -> Operation {
        Operation::CustomVoteCreate(CustomVoteCreateOperation {
            fee: Fee::flat(0),
            creator: CREATOR,
            vid,
            title: "release name".into(),
            description: "pick one or two".into(),
            expired_time,
            asset_id: 0,
            required_amount: 100,
            minimum_selected_items: 1,
            maximum_selected_items: 2,
            options: vec!["x".into(), "y".into(), "z".into()],
        })
    }

    fn cast(voter: AccountUid, selection: &[u8]) -> Operation {
        Operation::CustomVoteCast(CustomVoteCastOperation {
            fee: Fee::flat(0),
            voter,
            creator: CREATOR,
            vid: 1,
            selection: selection.iter().copied().collect(),
        })
    }

    #[test]
    fn test_poll_lifecycle() {
        let mut ledger = ledger();
        let expiry = ledger.now() + 3600;
        assert_eq!(
            ledger.db().account_statistics(CREATOR).unwrap().last_custom_vote_sequence,
            0
        );

        let results = ledger.submit(vec![create_poll(1, expiry)], &[CREATOR]).unwrap();
        assert_eq!(
            results,
            vec![OperationResult::ObjectCreated(ObjectRef::CustomVote((CREATOR, 1)))]
        );

        ledger.submit(vec![cast(VOTER, &[0, 2])], &[VOTER]).unwrap();
        let poll = ledger.db().find_custom_vote(CREATOR, 1).unwrap();
        assert_eq!(poll.vote_result, vec![150, 0, 150]);

        // Three selections exceed the maximum of two.
        assert_eq!(
            ledger.submit(vec![cast(SMALL_HOLDER, &[0, 1, 2])], &[SMALL_HOLDER]).unwrap_err(),
            EvaluationError::SelectionCountOutOfRange {
                count: 3,
                min: 1,
                max: 2
            }
        );

        // Option 5 does not exist.
        assert_eq!(
            ledger.submit(vec![cast(VOTER, &[5])], &[VOTER]).unwrap_err(),
            EvaluationError::OptionOutOfRange {
                index: 5,
                options: 3
            }
        );

        assert!(matches!(
            ledger.submit(vec![cast(SMALL_HOLDER, &[1])], &[SMALL_HOLDER]),
            Err(EvaluationError::InsufficientStake {
                available: 99,
                required: 100,
                ..
            })
        ));

        ledger.advance_to(expiry + 1);
        assert!(matches!(
            ledger.submit(vec![cast(VOTER, &[1])], &[VOTER]),
            Err(EvaluationError::CustomVoteExpired { .. })
        ));
        assert_eq!(
            ledger.db().find_custom_vote(CREATOR, 1).unwrap().vote_result,
            vec![150, 0, 150]
        );
    }

    #[test]
    fn test_out_of_range_option_rejected() {
        let mut ledger = ledger();
        let expiry = ledger.now() + 3600;
        ledger.submit(vec![create_poll(1, expiry)], &[CREATOR]).unwrap();

        assert_eq!(
            ledger.submit(vec![cast(VOTER, &[5])], &[VOTER]).unwrap_err(),
            EvaluationError::OptionOutOfRange {
                index: 5,
                options: 3
            }
        );
        assert!(!ledger.db().has_voted(CREATOR, 1, VOTER));
    }

    #[test]
    fn test_ballot_at_expiry_instant_admitted() {
        let mut ledger = ledger();
        let expiry = ledger.now() + 3600;
        ledger.submit(vec![create_poll(1, expiry)], &[CREATOR]).unwrap();

        ledger.advance_to(expiry);
        ledger.submit(vec![cast(VOTER, &[1])], &[VOTER]).unwrap();
        assert_eq!(
            ledger.db().find_custom_vote(CREATOR, 1).unwrap().vote_result,
            vec![0, 150, 0]
        );
    }

    #[test]
    fn test_vid_sequence_across_transactions() {
        let mut ledger = ledger();
        let expiry = ledger.now() + 3600;

        assert!(matches!(
            ledger.submit(vec![create_poll(2, expiry)], &[CREATOR]),
            Err(EvaluationError::VoteSequenceMismatch { expected: 1, provided: 2, .. })
        ));
        // Every operation is evaluated before any is applied, so vid 2 is
        // checked against the counter before vid 1 bumps it.
        assert!(ledger
            .submit(vec![create_poll(1, expiry), create_poll(2, expiry)], &[CREATOR])
            .is_err());
        assert!(ledger.db().find_custom_vote(CREATOR, 1).is_none());

        ledger.submit(vec![create_poll(1, expiry)], &[CREATOR]).unwrap();
        ledger.submit(vec![create_poll(2, expiry)], &[CREATOR]).unwrap();
        assert_eq!(
            ledger.db().account_statistics(CREATOR).unwrap().last_custom_vote_sequence,
            2
        );
    }

    #[test]
    fn test_cast_needs_voter_signature() {
        let mut ledger = ledger();
        let expiry = ledger.now() + 3600;
        ledger.submit(vec![create_poll(1, expiry)], &[CREATOR]).unwrap();

        assert!(matches!(
            ledger.submit(vec![cast(VOTER, &[0])], &[CREATOR]),
            Err(EvaluationError::Authority(_))
        ));
    }
}
