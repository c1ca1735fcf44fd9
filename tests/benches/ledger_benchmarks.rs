//! # Ledger-Core Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | authority | Weighted-threshold resolution through nested accounts |
//! | transaction | Full `apply_transaction`: signatures, authority, fee, apply |
//! | proposal | Approval update that triggers proposal execution |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lc_02_authority::{verify_authority, InMemoryAuthorities, TierApprovals, VerifyOptions};
use lc_03_evaluation::{
    domain::{ProposalCreateOperation, ProposalUpdateOperation, TransferOperation},
    Fee, ObjectRef, Operation, OperationResult,
};
use lc_tests::fixtures::{public_key, Funding, TestLedger};
use shared_types::{AccountUid, Asset, Authority, AuthorityTier, PublicKey, Signature};
use std::collections::BTreeMap;
use std::time::Duration;

fn transfer(from: AccountUid, to: AccountUid, amount: i64) -> Operation {
    Operation::Transfer(TransferOperation {
        fee: Fee::flat(0),
        from,
        to,
        amount: Asset::core(amount),
        memo: None,
    })
}

// =============================================================================
// AUTHORITY
// =============================================================================

/// `width` key holders under one account, itself the sole member of the
/// spending account. Threshold is a simple majority.
fn committee(width: u64) -> (InMemoryAuthorities, BTreeMap<PublicKey, Signature>) {
    let mut lookup = InMemoryAuthorities::new();
    let mut committee = Authority::default();
    let mut signatures = BTreeMap::new();
    for uid in 1..=width {
        lookup.insert_single_key(uid, public_key(uid));
        committee = committee.with_account(uid, AuthorityTier::Active, 1);
        if uid <= width / 2 + 1 {
            signatures.insert(public_key(uid), Signature::PLACEHOLDER);
        }
    }
    let committee = committee.with_threshold((width / 2 + 1) as u32);
    lookup.insert(1_000, committee.clone(), committee.clone(), committee);

    let spender = Authority::default()
        .with_account(1_000, AuthorityTier::Active, 1)
        .with_threshold(1);
    lookup.insert(2_000, spender.clone(), spender.clone(), spender);
    (lookup, signatures)
}

fn bench_verify_authority(c: &mut Criterion) {
    let mut group = c.benchmark_group("authority");
    for width in [3u64, 11, 51] {
        let (lookup, signatures) = committee(width);
        let ops = vec![transfer(2_000, 1, 1)];
        let options = VerifyOptions::for_transaction(true, 2);

        group.throughput(Throughput::Elements(signatures.len() as u64));
        group.bench_with_input(BenchmarkId::new("nested_majority", width), &width, |b, _| {
            b.iter(|| {
                black_box(verify_authority(
                    &ops,
                    &signatures,
                    &lookup,
                    &TierApprovals::default(),
                    options,
                ))
            })
        });
    }
    group.finish();
}

// =============================================================================
// TRANSACTION
// =============================================================================

fn bench_apply_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction");
    group.measurement_time(Duration::from_secs(5));

    let mut ledger = TestLedger::builder()
        .account(1, "sender", Funding::balance(1_000_000_000_000))
        .account(2, "receiver", Funding::default())
        .build();
    let trx = ledger.sign(vec![transfer(1, 2, 1)], &[1]);

    group.bench_function("signed_transfer", |b| {
        b.iter(|| black_box(ledger.service.apply_transaction(&trx)))
    });
    group.finish();
}

// =============================================================================
// PROPOSAL
// =============================================================================

fn bench_proposal_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("proposal");
    group.bench_function("approve_and_execute", |b| {
        b.iter_batched(
            || {
                let mut ledger = TestLedger::builder()
                    .account(1, "alice", Funding::balance(1_000))
                    .account(2, "bob", Funding::balance(1_000))
                    .multisig(100, "treasury", &[1, 2], 2, 1_000)
                    .build();
                let expiration_time = ledger.now() + 3600;
                let created = ledger
                    .submit(
                        vec![Operation::ProposalCreate(ProposalCreateOperation {
                            fee: Fee::flat(0),
                            fee_paying_account: 1,
                            expiration_time,
                            proposed_ops: vec![transfer(100, 1, 10)],
                        })],
                        &[1],
                    )
                    .unwrap();
                let proposal = match created.as_slice() {
                    [OperationResult::ObjectCreated(ObjectRef::Proposal(id))] => *id,
                    other => panic!("unexpected results {other:?}"),
                };
                let mut approve = ProposalUpdateOperation {
                    fee_paying_account: 1,
                    proposal,
                    ..Default::default()
                };
                approve.active_approvals_to_add.extend([1, 2]);
                let trx = ledger.sign(vec![Operation::ProposalUpdate(approve)], &[1, 2]);
                (ledger, trx)
            },
            |(mut ledger, trx)| black_box(ledger.service.apply_transaction(&trx)),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_verify_authority,
    bench_apply_transfer,
    bench_proposal_execution
);
criterion_main!(benches);
