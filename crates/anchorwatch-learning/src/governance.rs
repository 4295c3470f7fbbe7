//! [`ProposalLog`]: the policy governance boundary.
//!
//! Accepts proposals and records them for human review. There is no method
//! here, or anywhere else, that applies a proposal to live policy.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anchorwatch_core::errors::GovernanceError;
use anchorwatch_core::models::{
    PolicyTarget, ProposalEvidence, ProposalRecord, ProposalStatus, ProposedChange,
};
use anchorwatch_core::traits::IPolicyGovernance;
use chrono::Utc;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ProposalLog {
    records: Vec<ProposalRecord>,
    /// Optional append-only JSONL journal for reviewers.
    journal: Option<PathBuf>,
}

impl ProposalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(path: impl AsRef<Path>) -> Self {
        Self {
            records: Vec::new(),
            journal: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn append_journal(&self, record: &ProposalRecord) -> Result<(), GovernanceError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let line = serde_json::to_string(record).map_err(|e| GovernanceError::Persistence {
            reason: e.to_string(),
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| GovernanceError::Persistence {
                reason: format!("{}: {e}", path.display()),
            })?;
        writeln!(file, "{line}").map_err(|e| GovernanceError::Persistence {
            reason: format!("{}: {e}", path.display()),
        })
    }
}

fn validate(evidence: &ProposalEvidence) -> Result<(), GovernanceError> {
    if evidence.samples == 0 {
        return Err(GovernanceError::EmptyEvidence);
    }
    if !evidence.rolling_average.is_finite() {
        return Err(GovernanceError::NonFiniteEvidence {
            field: "rolling_average".to_string(),
        });
    }
    Ok(())
}

impl IPolicyGovernance for ProposalLog {
    fn propose_change(
        &mut self,
        target: PolicyTarget,
        change: ProposedChange,
        evidence: ProposalEvidence,
    ) -> Result<ProposalRecord, GovernanceError> {
        validate(&evidence)?;
        let record = ProposalRecord {
            id: Uuid::new_v4(),
            target,
            change,
            evidence,
            proposed_at: Utc::now(),
            status: ProposalStatus::PendingReview,
        };
        self.append_journal(&record)?;
        self.records.push(record.clone());
        Ok(record)
    }

    fn proposals(&self) -> Vec<ProposalRecord> {
        self.records.clone()
    }
}
