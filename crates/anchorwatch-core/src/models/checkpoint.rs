use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-cycle tallies. Field order is part of the hashed serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleCounts {
    pub anchors_evaluated: u64,
    pub coherent: u64,
    pub incoherent: u64,
    pub safe: u64,
    pub warning: u64,
    pub critical: u64,
    pub indeterminate: u64,
    pub telemetry_requests: u64,
    pub repairs_staged: u64,
    pub repairs_authorized: u64,
    pub repairs_executed: u64,
    pub repairs_rejected: u64,
    pub authority_pending: u64,
    pub proposals: u64,
    pub collaborator_failures: u64,
}

/// Summary of one completed cycle; the content of a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counts: CycleCounts,
}

/// One link of the append-only checkpoint chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// 1-based position in the chain.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub summary: CycleSummary,
    pub previous_hash: String,
    pub hash: String,
}
