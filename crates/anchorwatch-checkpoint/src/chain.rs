//! Hashing and verification, independent of storage.

use anchorwatch_core::constants::GENESIS_HASH;
use anchorwatch_core::errors::CheckpointError;
use anchorwatch_core::models::{Checkpoint, CycleSummary};
use serde::{Deserialize, Serialize};

/// `blake3(previous_hash_hex ‖ serde_json(summary))` as lowercase hex.
pub fn chain_hash(previous_hash: &str, summary: &CycleSummary) -> Result<String, CheckpointError> {
    let body = serde_json::to_vec(summary).map_err(|e| CheckpointError::Serialization {
        reason: e.to_string(),
    })?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(&body);
    Ok(hasher.finalize().to_hex().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// Stored hash differs from the recomputation.
    HashMismatch,
    /// Stored previous hash differs from the recomputed predecessor.
    LinkMismatch,
    /// Record timestamp disagrees with the summary it carries.
    TimestampMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBreak {
    pub sequence: u64,
    pub kinds: Vec<BreakKind>,
}

/// The stored chain ends before the head this log committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailMismatch {
    /// Sequence and hash of the last checkpoint committed through this log.
    pub expected_sequence: u64,
    pub expected_hash: String,
    /// Last sequence found in storage (the baseline if none remain).
    pub found_sequence: u64,
    pub found_hash: String,
}

/// Trusted starting point. Genesis unless an operator reconciled the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    /// Last trusted sequence (0 for genesis).
    pub sequence: u64,
    pub hash: String,
}

impl Baseline {
    pub fn genesis() -> Self {
        Self {
            sequence: 0,
            hash: GENESIS_HASH.to_string(),
        }
    }
}

/// Result of recomputing a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    /// Records checked (those after the baseline).
    pub checked: u64,
    /// Every record whose hash or linkage disagrees, in chain order.
    pub broken: Vec<ChainBreak>,
    /// `(expected, found)` sequence numbers where records are missing or
    /// out of order.
    pub gaps: Vec<(u64, u64)>,
    /// Set when records after the last stored one were removed or the
    /// stored head was replaced.
    #[serde(default)]
    pub tail: Option<TailMismatch>,
}

impl ChainReport {
    pub fn is_intact(&self) -> bool {
        self.broken.is_empty() && self.gaps.is_empty() && self.tail.is_none()
    }

    pub fn first_broken(&self) -> Option<u64> {
        let broken = self.broken.first().map(|b| b.sequence);
        let gap = self.gaps.first().map(|(_, found)| *found);
        let tail = self.tail.as_ref().map(|t| t.found_sequence.min(t.expected_sequence) + 1);
        [broken, gap, tail].into_iter().flatten().min()
    }
}

/// Recompute every hash after `baseline` from the baseline hash forward.
///
/// The predecessor of each record is the *recomputed* hash of the previous
/// one, so a single altered summary breaks that record and every later one.
pub fn verify_chain(
    records: &[Checkpoint],
    baseline: &Baseline,
) -> Result<ChainReport, CheckpointError> {
    let mut report = ChainReport {
        checked: 0,
        broken: Vec::new(),
        gaps: Vec::new(),
        tail: None,
    };
    let mut expected_prev = baseline.hash.clone();
    let mut expected_seq = baseline.sequence + 1;

    for record in records.iter().filter(|r| r.sequence > baseline.sequence) {
        report.checked += 1;
        if record.sequence != expected_seq {
            report.gaps.push((expected_seq, record.sequence));
        }

        let mut kinds = Vec::new();
        if record.previous_hash != expected_prev {
            kinds.push(BreakKind::LinkMismatch);
        }
        let recomputed = chain_hash(&expected_prev, &record.summary)?;
        if recomputed != record.hash {
            kinds.push(BreakKind::HashMismatch);
        }
        if record.timestamp != record.summary.finished_at {
            kinds.push(BreakKind::TimestampMismatch);
        }
        if !kinds.is_empty() {
            report.broken.push(ChainBreak {
                sequence: record.sequence,
                kinds,
            });
        }

        expected_prev = recomputed;
        expected_seq = record.sequence + 1;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::models::CycleCounts;
    use chrono::Utc;

    fn summary(cycle: u64) -> CycleSummary {
        let now = Utc::now();
        CycleSummary {
            cycle,
            started_at: now,
            finished_at: now,
            counts: CycleCounts::default(),
        }
    }

    #[test]
    fn hash_is_deterministic_and_linked() {
        let s = summary(1);
        let a = chain_hash(GENESIS_HASH, &s).unwrap();
        let b = chain_hash(GENESIS_HASH, &s).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, chain_hash(&a, &s).unwrap());
    }

    #[test]
    fn empty_chain_is_intact() {
        let report = verify_chain(&[], &Baseline::genesis()).unwrap();
        assert!(report.is_intact());
        assert_eq!(report.checked, 0);
        assert_eq!(report.first_broken(), None);
    }
}
