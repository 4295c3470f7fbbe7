//! Proposed policy changes. These are records for human review; nothing in
//! the system applies them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repair::RepairType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PolicyTarget {
    RepairType(RepairType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposedChange {
    /// The repair type is not improving state; review its definition.
    ReviewRepairType {
        repair_type: RepairType,
        rolling_average: f64,
        threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalEvidence {
    pub samples: usize,
    pub rolling_average: f64,
    pub window: usize,
    pub repair_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    PendingReview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: Uuid,
    pub target: PolicyTarget,
    pub change: ProposedChange,
    pub evidence: ProposalEvidence,
    pub proposed_at: DateTime<Utc>,
    pub status: ProposalStatus,
}
