//! Checkpoint chain integration tests: tamper detection, gaps, JSONL
//! persistence, and operator reconciliation.

use anchorwatch_checkpoint::{
    verify_chain, Baseline, BreakKind, CheckpointLog, JsonlCheckpointSink, MemoryCheckpointSink,
};
use anchorwatch_core::constants::GENESIS_HASH;
use anchorwatch_core::errors::CheckpointError;
use anchorwatch_core::models::{Checkpoint, CycleCounts, CycleSummary};
use chrono::{Duration, TimeZone, Utc};

fn summary(cycle: u64) -> CycleSummary {
    let started = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(cycle as i64);
    CycleSummary {
        cycle,
        started_at: started,
        finished_at: started + Duration::milliseconds(250),
        counts: CycleCounts {
            anchors_evaluated: cycle * 3,
            coherent: cycle,
            ..Default::default()
        },
    }
}

fn committed(n: u64) -> Vec<Checkpoint> {
    let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::new())).unwrap();
    for cycle in 1..=n {
        log.commit(summary(cycle)).unwrap();
    }
    log.read_all().unwrap()
}

#[test]
fn fresh_chain_starts_at_genesis_and_verifies() {
    let records = committed(10);
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].sequence, 1);
    assert_eq!(records[0].previous_hash, GENESIS_HASH);
    for pair in records.windows(2) {
        assert_eq!(pair[1].previous_hash, pair[0].hash);
        assert_eq!(pair[1].sequence, pair[0].sequence + 1);
    }
    assert!(records.iter().all(|r| r.timestamp == r.summary.finished_at));

    let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::from_records(records))).unwrap();
    let report = log.verify().unwrap();
    assert!(report.is_intact());
    assert_eq!(report.checked, 10);
    assert!(!log.is_compromised());
}

#[test]
fn altering_one_summary_breaks_it_and_every_later_checkpoint() {
    let mut records = committed(10);
    records[4].summary.counts.critical = 99;

    let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::from_records(records))).unwrap();
    let report = log.verify().unwrap();

    assert!(!report.is_intact());
    let broken: Vec<u64> = report.broken.iter().map(|b| b.sequence).collect();
    assert_eq!(broken, vec![5, 6, 7, 8, 9, 10]);
    assert_eq!(report.first_broken(), Some(5));
    assert_eq!(report.broken[0].kinds, vec![BreakKind::HashMismatch]);
    assert!(report.broken[1].kinds.contains(&BreakKind::LinkMismatch));
    assert!(log.is_compromised());
}

#[test]
fn removed_checkpoint_is_reported_as_gap() {
    let mut records = committed(6);
    records.remove(2);

    let report = verify_chain(&records, &Baseline::genesis()).unwrap();
    assert_eq!(report.gaps, vec![(3, 4)]);
    assert_eq!(report.first_broken(), Some(4));
    assert!(!report.is_intact());
}

#[test]
fn timestamp_must_match_summary() {
    let mut records = committed(3);
    records[1].timestamp = records[1].timestamp + Duration::seconds(5);

    let report = verify_chain(&records, &Baseline::genesis()).unwrap();
    assert_eq!(report.broken.len(), 1);
    assert_eq!(report.broken[0].sequence, 2);
    assert_eq!(report.broken[0].kinds, vec![BreakKind::TimestampMismatch]);
}

#[test]
fn reconcile_clears_compromise_and_trusts_current_head() {
    let mut records = committed(4);
    records[1].summary.counts.safe = 7;

    let mut log = CheckpointLog::open(Box::new(MemoryCheckpointSink::from_records(records))).unwrap();
    assert!(!log.verify().unwrap().is_intact());
    assert!(log.is_compromised());

    let baseline = log.reconcile("ops@example").unwrap();
    assert_eq!(baseline.sequence, 4);
    assert!(!log.is_compromised());

    log.commit(summary(5)).unwrap();
    let report = log.verify().unwrap();
    assert!(report.is_intact());
    assert_eq!(report.checked, 1);
}

#[test]
fn jsonl_sink_persists_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.jsonl");

    let first_head = {
        let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
        log.commit(summary(1)).unwrap();
        log.commit(summary(2)).unwrap()
    };

    let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.head_hash(), first_head);
    log.commit(summary(3)).unwrap();

    let report = log.verify().unwrap();
    assert!(report.is_intact());
    assert_eq!(report.checked, 3);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn jsonl_tampering_on_disk_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.jsonl");
    {
        let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
        for cycle in 1..=3 {
            log.commit(summary(cycle)).unwrap();
        }
    }
    let text = std::fs::read_to_string(&path).unwrap();
    let tampered = text.replacen("\"anchors_evaluated\":6", "\"anchors_evaluated\":0", 1);
    assert_ne!(text, tampered);
    std::fs::write(&path, tampered).unwrap();

    let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
    let report = log.verify().unwrap();
    assert_eq!(report.first_broken(), Some(2));
    assert!(log.is_compromised());
}

#[test]
fn removing_newest_checkpoints_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.jsonl");
    let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
    for cycle in 1..=3 {
        log.commit(summary(cycle)).unwrap();
    }
    let text = std::fs::read_to_string(&path).unwrap();
    let kept: Vec<&str> = text.lines().take(2).collect();
    std::fs::write(&path, kept.join("\n") + "\n").unwrap();

    let report = log.verify().unwrap();
    assert!(!report.is_intact());
    assert!(report.broken.is_empty());
    assert!(report.gaps.is_empty());
    let tail = report.tail.as_ref().unwrap();
    assert_eq!(tail.expected_sequence, 3);
    assert_eq!(tail.found_sequence, 2);
    assert_eq!(report.first_broken(), Some(3));
    assert!(log.is_compromised());
}

#[test]
fn emptied_checkpoint_file_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.jsonl");
    let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
    for cycle in 1..=3 {
        log.commit(summary(cycle)).unwrap();
    }
    std::fs::write(&path, "").unwrap();

    let report = log.verify().unwrap();
    assert_eq!(report.checked, 0);
    assert!(!report.is_intact());
    let tail = report.tail.as_ref().unwrap();
    assert_eq!(tail.found_sequence, 0);
    assert_eq!(tail.found_hash, GENESIS_HASH);
    assert_eq!(report.first_broken(), Some(1));

    // Reconciling trusts what storage now holds.
    log.reconcile("ops@example").unwrap();
    assert!(log.verify().unwrap().is_intact());
}

#[test]
fn corrupt_jsonl_line_is_reported_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.jsonl");
    {
        let mut log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap();
        log.commit(summary(1)).unwrap();
    }
    let mut text = std::fs::read_to_string(&path).unwrap();
    text.push_str("\n{not json\n");
    std::fs::write(&path, text).unwrap();

    let err = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(&path))).unwrap_err();
    assert!(matches!(err, CheckpointError::CorruptRecord { line: 3, .. }));
}

#[test]
fn missing_jsonl_file_is_an_empty_chain() {
    let dir = tempfile::tempdir().unwrap();
    let log = CheckpointLog::open(Box::new(JsonlCheckpointSink::new(dir.path().join("none.jsonl")))).unwrap();
    assert!(log.is_empty());
    assert_eq!(log.head_hash(), GENESIS_HASH);
}
