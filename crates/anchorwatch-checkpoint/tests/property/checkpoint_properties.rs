use anchorwatch_checkpoint::{verify_chain, Baseline, CheckpointLog, MemoryCheckpointSink};
use anchorwatch_core::models::{CycleCounts, CycleSummary};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn summary(cycle: u64, coherent: u64) -> CycleSummary {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(cycle as i64);
    CycleSummary {
        cycle,
        started_at: at,
        finished_at: at,
        counts: CycleCounts {
            coherent,
            ..Default::default()
        },
    }
}

proptest! {
    #[test]
    fn any_single_mutation_breaks_the_suffix(
        counts in prop::collection::vec(0u64..1_000, 2..20),
        pick in any::<prop::sample::Index>(),
        bump in 1u64..1_000,
    ) {
        let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::new())).unwrap();
        for (i, c) in counts.iter().enumerate() {
            log.commit(summary(i as u64 + 1, *c)).unwrap();
        }
        let mut records = log.read_all().unwrap();
        prop_assert!(verify_chain(&records, &Baseline::genesis()).unwrap().is_intact());

        let idx = pick.index(records.len());
        records[idx].summary.counts.coherent += bump;
        let report = verify_chain(&records, &Baseline::genesis()).unwrap();

        let broken: Vec<u64> = report.broken.iter().map(|b| b.sequence).collect();
        let expected: Vec<u64> = (idx as u64 + 1..=records.len() as u64).collect();
        prop_assert_eq!(broken, expected);
    }

    #[test]
    fn sequences_are_contiguous_from_one(n in 1u64..30) {
        let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::new())).unwrap();
        for cycle in 1..=n {
            log.commit(summary(cycle, 0)).unwrap();
        }
        let seqs: Vec<u64> = log.read_all().unwrap().iter().map(|r| r.sequence).collect();
        prop_assert_eq!(seqs, (1..=n).collect::<Vec<_>>());
    }
}
