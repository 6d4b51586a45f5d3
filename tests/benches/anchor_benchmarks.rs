//! # Anchor-Chain Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | ac-02 Temporal Sealer | seal hash | < 10us |
//! | ac-02 Temporal Sealer | verify 1k chain | < 10ms |
//! | ac-05 Audit Log | entry hash with 21 votes | < 100us |
//! | ac-06 Consensus | tally + decide, 21 votes | < 50us |
//! | ac-06 Consensus | full round, 21 in-process validators | < 5ms |

use std::time::Duration;

use ac_01_validator_pool::Validator;
use ac_02_temporal_sealer::{compute_seal_hash, seal_at, verify_chain};
use ac_05_audit_log::compute_entry_hash;
use ac_06_consensus::{decide, ConsensusApi, ConsensusMode, RoundParams, Tally};
use ac_tests::fixtures::{default_params, keypair, network, scripts, Script};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shared_types::{
    AnchorProposal, Assessment, ConsensusDecision, DecisionOutcome, SealedAnchor, Vote,
};

fn votes_and_validators() -> (Vec<Vote>, Vec<Validator>) {
    let validators: Vec<Validator> = (0..21)
        .map(|i| Validator::new(format!("v{i}"), format!("g{}", i % 7), keypair(i).public_key()))
        .collect();
    let votes = validators
        .iter()
        .enumerate()
        .map(|(i, v)| Vote {
            validator_id: v.id.clone(),
            anchor_id: "A".into(),
            assessment: match i % 3 {
                0 | 1 => Assessment::Accept,
                _ => Assessment::Reject,
            },
            confidence: 0.8,
            cast_at: 1_000,
        })
        .collect();
    (votes, validators)
}

fn chain(len: usize) -> Vec<SealedAnchor> {
    let mut chain: Vec<SealedAnchor> = Vec::with_capacity(len);
    for i in 0..len {
        let proposal = AnchorProposal::new(format!("a{i}"), "owner", [i as u8; 32], 0);
        let previous = chain.last().map(|s| s.seal_hash);
        chain.push(seal_at(&proposal, previous, 1_000 + i as u64));
    }
    chain
}

fn bench_sealer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ac-02-temporal-sealer");

    group.bench_function("seal_hash", |b| {
        b.iter(|| compute_seal_hash(black_box(&[7u8; 32]), Some(&[9u8; 32]), black_box(1_000)))
    });

    for len in [100usize, 1_000] {
        let sealed = chain(len);
        group.bench_with_input(BenchmarkId::new("verify_chain", len), &sealed, |b, sealed| {
            b.iter(|| verify_chain(black_box(sealed)).is_ok())
        });
    }

    group.finish();
}

fn bench_audit(c: &mut Criterion) {
    let (votes, _) = votes_and_validators();
    let decision = ConsensusDecision {
        round_id: uuid::Uuid::nil(),
        anchor_id: "A".into(),
        ratio_achieved: 14.0 / 21.0,
        threshold_used: 0.67,
        responded_count: 21,
        total_validators: 21,
        outcome: DecisionOutcome::Rejected,
        reason: None,
        decided_at: 1_000,
    };

    c.bench_function("ac-05-audit-log/entry_hash_21_votes", |b| {
        b.iter(|| compute_entry_hash(7, black_box(&decision), black_box(&votes), 1_000, Some(&[1u8; 32])))
    });
}

fn bench_tally(c: &mut Criterion) {
    let (votes, validators) = votes_and_validators();
    let params = RoundParams::new(0.67, 11, 5_000);

    c.bench_function("ac-06-consensus/tally_and_decide", |b| {
        b.iter(|| {
            let tally = Tally::from_votes(black_box(&votes), black_box(&validators));
            decide(&tally, &params, ConsensusMode::Count, 1, false)
        })
    });
}

fn bench_round(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("ac-06-consensus");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("full_round_21_validators", |b| {
        let net = network(scripts(&[(15, Script::Accept), (6, Script::Reject)]));
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            // Fresh anchor and payload each time so no round hits the boundary guard.
            let mut payload = [0u8; 32];
            payload[..8].copy_from_slice(&n.to_be_bytes());
            let proposal = AnchorProposal::new(format!("bench-{n}"), "bench", payload, 0);
            runtime
                .block_on(net.consensus.propose(proposal, default_params()))
                .expect("round decides")
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sealer, bench_audit, bench_tally, bench_round);
criterion_main!(benches);
