//! # Proposal Lifecycle
//!
//! A two-of-two treasury spends through a proposal: creation, partial and
//! full approval, failed execution and expiry settlement.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Funding, TestLedger};
    use lc_03_evaluation::{
        domain::{
            ProposalCreateOperation, ProposalDeleteOperation, ProposalUpdateOperation,
            TransferOperation,
        },
        AuthorizationStatus, EvaluationError, Fee, LedgerApi, ObjectRef, Operation,
        OperationResult, ProposalId,
    };
    use shared_types::{AccountUid, Asset, Timestamp};

    const ALICE: AccountUid = 1;
    const BOB: AccountUid = 2;
    const CAROL: AccountUid = 3;
    const TREASURY: AccountUid = 100;

    fn ledger(treasury_balance: i64) -> TestLedger {
        ledger_telemetry::init_test_logging();
        TestLedger::builder()
            .account(ALICE, "alice", Funding::balance(1_000))
            .account(BOB, "bob", Funding::balance(1_000))
            .account(CAROL, "carol", Funding::default())
            .multisig(TREASURY, "treasury", &[ALICE, BOB], 2, treasury_balance)
            .build()
    }

    fn spend(from: AccountUid, amount: i64) -> Operation {
        Operation::Transfer(TransferOperation {
            fee: Fee::flat(0),
            from,
            to: CAROL,
            amount: Asset::core(amount),
            memo: Some("grant".into()),
        })
    }

    fn propose(ledger: &mut TestLedger, ops: Vec<Operation>, expiration_time: Timestamp) -> ProposalId {
        let results = ledger
            .submit(
                vec![Operation::ProposalCreate(ProposalCreateOperation {
                    fee: Fee::flat(0),
                    fee_paying_account: ALICE,
                    expiration_time,
                    proposed_ops: ops,
                })],
                &[ALICE],
            )
            .unwrap();
        match results.as_slice() {
            [OperationResult::ObjectCreated(ObjectRef::Proposal(id))] => *id,
            other => panic!("unexpected results {other:?}"),
        }
    }

    fn approve(ledger: &mut TestLedger, id: ProposalId, uid: AccountUid) -> Result<(), EvaluationError> {
        let mut op = ProposalUpdateOperation {
            fee_paying_account: uid,
            proposal: id,
            ..Default::default()
        };
        op.active_approvals_to_add.insert(uid);
        ledger.submit(vec![Operation::ProposalUpdate(op)], &[uid]).map(|_| ())
    }

    fn pending_for(ledger: &TestLedger, uid: AccountUid) -> Vec<ProposalId> {
        ledger.db().proposals().index().proposals_for(uid).collect()
    }

    #[test]
    fn test_treasury_spend_executes_on_second_approval() {
        let mut ledger = ledger(1_000);
        let expiry = ledger.now() + 3600;
        let id = propose(&mut ledger, vec![spend(TREASURY, 300)], expiry);

        let proposal = ledger.db().proposal(id).unwrap();
        assert!(proposal.required.active.contains(&TREASURY));
        assert_eq!(pending_for(&ledger, TREASURY), vec![id]);
        assert!(matches!(
            ledger.service.proposal_status(id).unwrap(),
            AuthorizationStatus::Pending(_)
        ));

        approve(&mut ledger, id, ALICE).unwrap();
        assert_eq!(pending_for(&ledger, ALICE), vec![id]);
        assert_eq!(ledger.db().balance(CAROL, 0), 0);

        approve(&mut ledger, id, BOB).unwrap();
        assert!(ledger.db().proposal(id).is_err());
        assert_eq!(ledger.db().balance(CAROL, 0), 300);
        assert_eq!(ledger.db().balance(TREASURY, 0), 700);
        assert!(ledger.db().proposals().index().is_empty());
    }

    #[test]
    fn test_treasury_spend_signed_by_both_members() {
        let mut ledger = ledger(1_000);
        // Member signatures satisfy the weighted authority without a proposal.
        assert!(ledger.submit(vec![spend(TREASURY, 10)], &[ALICE]).is_err());
        ledger.submit(vec![spend(TREASURY, 10)], &[ALICE, BOB]).unwrap();
        assert_eq!(ledger.db().balance(CAROL, 0), 10);
    }

    #[test]
    fn test_underfunded_proposal_settles_at_expiry() {
        let mut ledger = ledger(100);
        let expiry = ledger.now() + 3600;
        let id = propose(&mut ledger, vec![spend(TREASURY, 300)], expiry);

        approve(&mut ledger, id, ALICE).unwrap();
        approve(&mut ledger, id, BOB).unwrap();
        // Authorized, but the spend failed; the proposal waits.
        assert!(ledger.service.proposal_status(id).unwrap().is_authorized());
        assert_eq!(ledger.db().balance(CAROL, 0), 0);

        ledger
            .submit(
                vec![Operation::Transfer(TransferOperation {
                    fee: Fee::flat(0),
                    from: ALICE,
                    to: TREASURY,
                    amount: Asset::core(500),
                    memo: None,
                })],
                &[ALICE],
            )
            .unwrap();

        ledger.advance_to(expiry);
        assert!(ledger.db().proposal(id).is_err());
        assert_eq!(ledger.db().balance(CAROL, 0), 300);
        assert_eq!(ledger.db().balance(TREASURY, 0), 300);
    }

    #[test]
    fn test_unapproved_proposal_dropped_at_expiry() {
        let mut ledger = ledger(1_000);
        let expiry = ledger.now() + 3600;
        let id = propose(&mut ledger, vec![spend(TREASURY, 300)], expiry);
        approve(&mut ledger, id, ALICE).unwrap();

        ledger.advance_to(expiry - 1);
        assert!(ledger.db().proposal(id).is_ok());

        ledger.advance_to(expiry);
        assert!(ledger.db().proposal(id).is_err());
        assert_eq!(ledger.db().balance(TREASURY, 0), 1_000);
        assert!(pending_for(&ledger, ALICE).is_empty());
    }

    #[test]
    fn test_duplicate_approval_rejected() {
        let mut ledger = ledger(1_000);
        let expiry = ledger.now() + 3600;
        let id = propose(&mut ledger, vec![spend(TREASURY, 300)], expiry);
        approve(&mut ledger, id, ALICE).unwrap();

        assert!(matches!(
            approve(&mut ledger, id, ALICE),
            Err(EvaluationError::DuplicateApproval { uid: ALICE, .. })
        ));
    }

    #[test]
    fn test_required_approver_withdraws_proposal() {
        let mut ledger = ledger(1_000);
        let expiry = ledger.now() + 3600;
        let id = propose(&mut ledger, vec![spend(ALICE, 5)], expiry);

        let delete = |payer| {
            Operation::ProposalDelete(ProposalDeleteOperation {
                fee: Fee::flat(0),
                fee_paying_account: payer,
                using_owner_authority: false,
                proposal: id,
            })
        };
        assert!(matches!(
            ledger.submit(vec![delete(BOB)], &[BOB]),
            Err(EvaluationError::NotRequiredApprover { uid: BOB, .. })
        ));
        ledger.submit(vec![delete(ALICE)], &[ALICE]).unwrap();
        assert!(ledger.db().proposals().is_empty());
    }
}
