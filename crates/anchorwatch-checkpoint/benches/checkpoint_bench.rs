//! Benchmarks for checkpoint commit and chain verification.

use anchorwatch_checkpoint::{verify_chain, Baseline, CheckpointLog, MemoryCheckpointSink};
use anchorwatch_core::models::{CycleCounts, CycleSummary};
use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};

fn summary(cycle: u64) -> CycleSummary {
    let now = Utc::now();
    CycleSummary {
        cycle,
        started_at: now,
        finished_at: now,
        counts: CycleCounts {
            anchors_evaluated: 100,
            ..Default::default()
        },
    }
}

fn bench_commit(c: &mut Criterion) {
    c.bench_function("checkpoint_commit", |b| {
        let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::new())).unwrap();
        let mut cycle = 0;
        b.iter(|| {
            cycle += 1;
            log.commit(summary(cycle)).unwrap()
        });
    });
}

fn bench_verify_1k(c: &mut Criterion) {
    let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::new())).unwrap();
    for cycle in 1..=1_000 {
        log.commit(summary(cycle)).unwrap();
    }
    let records = log.read_all().unwrap();
    c.bench_function("verify_chain_1k", |b| {
        b.iter(|| verify_chain(&records, &Baseline::genesis()).unwrap());
    });
}

criterion_group!(benches, bench_commit, bench_verify_1k);
criterion_main!(benches);
