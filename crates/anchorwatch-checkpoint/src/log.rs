//! [`CheckpointLog`]: owns the chain head and the compromised flag.

use anchorwatch_core::errors::CheckpointError;
use anchorwatch_core::models::{Checkpoint, CycleSummary};
use anchorwatch_core::traits::ICheckpointSink;

use crate::chain::{chain_hash, verify_chain, Baseline, ChainReport, TailMismatch};

pub struct CheckpointLog {
    sink: Box<dyn ICheckpointSink>,
    head_hash: String,
    last_sequence: u64,
    baseline: Baseline,
    compromised: Option<ChainReport>,
}

impl std::fmt::Debug for CheckpointLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointLog")
            .field("head_hash", &self.head_hash)
            .field("last_sequence", &self.last_sequence)
            .field("baseline", &self.baseline)
            .field("compromised", &self.compromised.is_some())
            .finish()
    }
}

impl CheckpointLog {
    /// Open a log over a sink, continuing from whatever it already holds.
    /// Existing records are not trusted until [`CheckpointLog::verify`] runs.
    pub fn open(sink: Box<dyn ICheckpointSink>) -> Result<Self, CheckpointError> {
        let existing = sink.read_all()?;
        let genesis = Baseline::genesis();
        let (head_hash, last_sequence) = match existing.last() {
            Some(last) => (last.hash.clone(), last.sequence),
            None => (genesis.hash.clone(), 0),
        };
        Ok(Self {
            sink,
            head_hash,
            last_sequence,
            baseline: genesis,
            compromised: None,
        })
    }

    /// Append a checkpoint for `summary` and return its hash.
    pub fn commit(&mut self, summary: CycleSummary) -> Result<String, CheckpointError> {
        let hash = chain_hash(&self.head_hash, &summary)?;
        let checkpoint = Checkpoint {
            sequence: self.last_sequence + 1,
            timestamp: summary.finished_at,
            summary,
            previous_hash: self.head_hash.clone(),
            hash: hash.clone(),
        };
        self.sink.append(&checkpoint)?;
        self.last_sequence = checkpoint.sequence;
        self.head_hash = hash.clone();
        tracing::debug!(
            sequence = checkpoint.sequence,
            hash = %hash,
            "checkpoint committed"
        );
        Ok(hash)
    }

    /// Recompute the chain from the trusted baseline and check that storage
    /// still ends at the head this log knows. A broken chain marks the log
    /// compromised.
    pub fn verify(&mut self) -> Result<ChainReport, CheckpointError> {
        let records = self.sink.read_all()?;
        let mut report = verify_chain(&records, &self.baseline)?;
        let (found_sequence, found_hash) = match records.last() {
            Some(last) if last.sequence > self.baseline.sequence => {
                (last.sequence, last.hash.clone())
            }
            _ => (self.baseline.sequence, self.baseline.hash.clone()),
        };
        if found_sequence != self.last_sequence || found_hash != self.head_hash {
            report.tail = Some(TailMismatch {
                expected_sequence: self.last_sequence,
                expected_hash: self.head_hash.clone(),
                found_sequence,
                found_hash,
            });
        }
        if report.is_intact() {
            return Ok(report);
        }
        tracing::debug!(
            first_broken = report.first_broken(),
            broken = report.broken.len(),
            gaps = report.gaps.len(),
            tail = report.tail.is_some(),
            "checkpoint chain broken, log marked compromised"
        );
        self.compromised = Some(report.clone());
        Ok(report)
    }

    pub fn is_compromised(&self) -> bool {
        self.compromised.is_some()
    }

    pub fn compromised_report(&self) -> Option<&ChainReport> {
        self.compromised.as_ref()
    }

    /// Operator acknowledgement of a compromised log. The current head
    /// becomes the new trusted baseline; later verification starts there.
    pub fn reconcile(&mut self, operator: &str) -> Result<Baseline, CheckpointError> {
        let records = self.sink.read_all()?;
        let baseline = match records.last() {
            Some(last) => Baseline {
                sequence: last.sequence,
                hash: last.hash.clone(),
            },
            None => Baseline::genesis(),
        };
        tracing::warn!(
            event = "checkpoint_reconciled",
            operator,
            baseline_sequence = baseline.sequence,
            "checkpoint log reconciled by operator"
        );
        self.head_hash = baseline.hash.clone();
        self.last_sequence = baseline.sequence;
        self.baseline = baseline.clone();
        self.compromised = None;
        Ok(baseline)
    }

    pub fn head_hash(&self) -> &str {
        &self.head_hash
    }

    pub fn len(&self) -> u64 {
        self.last_sequence
    }

    pub fn is_empty(&self) -> bool {
        self.last_sequence == 0
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Every stored record, for audit.
    pub fn read_all(&self) -> Result<Vec<Checkpoint>, CheckpointError> {
        self.sink.read_all()
    }
}
