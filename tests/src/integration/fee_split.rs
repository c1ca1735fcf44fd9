//! # Fee Split
//!
//! Fees drawn from the ordinary balance, prepaid and csaf pools through
//! signed transactions.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Funding, TestLedger};
    use lc_03_evaluation::{
        domain::TransferOperation, DefaultFeeSchedule, EvaluationError, Fee, FeeParameters,
        Operation, OperationKind,
    };
    use shared_types::{AccountUid, Asset};

    const PAYER: AccountUid = 1;
    const PAYEE: AccountUid = 2;

    fn ledger(min_real_fee: u64) -> TestLedger {
        ledger_telemetry::init_test_logging();
        let schedule = DefaultFeeSchedule::free(0).with_parameters(
            OperationKind::Transfer,
            FeeParameters {
                fee: 40,
                min_real_fee,
                ..Default::default()
            },
        );
        TestLedger::builder()
            .fee_schedule(schedule)
            .account(
                PAYER,
                "payer",
                Funding {
                    balance: 5,
                    prepaid: 50,
                    csaf: 30,
                },
            )
            .account(PAYEE, "payee", Funding::default())
            .build()
    }

    fn transfer(fee: Fee) -> Operation {
        Operation::Transfer(TransferOperation {
            fee,
            from: PAYER,
            to: PAYEE,
            amount: Asset::core(1),
            memo: None,
        })
    }

    #[test]
    fn test_prepaid_covers_fee() {
        let mut ledger = ledger(0);
        let supply = ledger.db().asset_dynamic_data(0).unwrap().current_supply;

        ledger.submit(vec![transfer(Fee::split(0, 40, 0))], &[PAYER]).unwrap();

        let stats = ledger.db().account_statistics(PAYER).unwrap();
        assert_eq!(stats.prepaid, 10);
        assert_eq!(stats.csaf, 30);
        assert_eq!(ledger.db().balance(PAYER, 0), 4);
        assert_eq!(ledger.db().balance(PAYEE, 0), 1);
        assert_eq!(
            ledger.db().asset_dynamic_data(0).unwrap().current_supply,
            supply - 40
        );
    }

    #[test]
    fn test_prepaid_overdraw_rejected_atomically() {
        let mut ledger = ledger(0);

        assert_eq!(
            ledger.submit(vec![transfer(Fee::split(0, 60, 0))], &[PAYER]).unwrap_err(),
            EvaluationError::InsufficientPrepaid {
                uid: PAYER,
                available: 50,
                required: 60
            }
        );

        let stats = ledger.db().account_statistics(PAYER).unwrap();
        assert_eq!(stats.prepaid, 50);
        assert_eq!(ledger.db().balance(PAYEE, 0), 0);
    }

    #[test]
    fn test_three_way_split() {
        let mut ledger = ledger(0);
        ledger.submit(vec![transfer(Fee::split(2, 20, 18))], &[PAYER]).unwrap();

        let stats = ledger.db().account_statistics(PAYER).unwrap();
        assert_eq!(stats.prepaid, 30);
        assert_eq!(stats.csaf, 12);
        assert_eq!(stats.core_balance, 2);
    }

    #[test]
    fn test_real_fee_floor() {
        let mut ledger = ledger(10);
        assert_eq!(
            ledger.submit(vec![transfer(Fee::split(0, 5, 35))], &[PAYER]).unwrap_err(),
            EvaluationError::InsufficientRealFee {
                paid: 5,
                required: 10
            }
        );
        ledger.submit(vec![transfer(Fee::split(0, 10, 30))], &[PAYER]).unwrap();
        assert_eq!(ledger.db().account_statistics(PAYER).unwrap().csaf, 0);
    }

    #[test]
    fn test_non_core_and_short_fees() {
        let mut ledger = ledger(0);

        let mut foreign = Fee::split(0, 40, 0);
        foreign.total.asset_id = 3;
        if let Some(options) = foreign.options.as_mut() {
            options.from_prepaid = Some(Asset::new(40, 3));
        }
        assert_eq!(
            ledger.submit(vec![transfer(foreign)], &[PAYER]).unwrap_err(),
            EvaluationError::NonCoreFeeAsset { asset: 3, core: 0 }
        );

        assert_eq!(
            ledger.submit(vec![transfer(Fee::split(0, 39, 0))], &[PAYER]).unwrap_err(),
            EvaluationError::InsufficientFee {
                paid: 39,
                required: 40
            }
        );

        assert!(matches!(
            ledger.submit(vec![transfer(Fee::flat(40))], &[PAYER]),
            Err(EvaluationError::InsufficientBalance { .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// Whatever the split, the fee leaves the pools in full and only
            /// the balance and prepaid parts leave the supply.
            #[test]
            fn prop_split_conserves_supply(prepaid in 0i64..=40, csaf in 0i64..=30) {
                let from_balance = 40 - prepaid - csaf;
                prop_assume!((0..=4).contains(&from_balance));

                let mut ledger = ledger(0);
                let before = ledger.db().account_statistics(PAYER).unwrap().clone();
                let supply = ledger.db().asset_dynamic_data(0).unwrap().current_supply;

                ledger
                    .submit(vec![transfer(Fee::split(from_balance, prepaid, csaf))], &[PAYER])
                    .unwrap();

                let after = ledger.db().account_statistics(PAYER).unwrap();
                prop_assert_eq!(after.prepaid, before.prepaid - prepaid);
                prop_assert_eq!(after.csaf, before.csaf - csaf);
                prop_assert_eq!(after.core_balance, before.core_balance - from_balance - 1);
                prop_assert_eq!(
                    ledger.db().asset_dynamic_data(0).unwrap().current_supply,
                    supply - from_balance - prepaid
                );
            }
        }
    }
}
