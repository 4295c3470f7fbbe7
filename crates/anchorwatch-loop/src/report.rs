//! What each cycle publishes to subscribers.

use std::time::Duration;

use anchorwatch_checkpoint::ChainReport;
use anchorwatch_core::models::{
    CycleCounts, KpiValue, ProposalRecord, RefusalReason, TelemetryRequest,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Every admitted anchor was evaluated and the cycle was checkpointed.
    Completed { checkpoint_hash: Option<String> },
    /// Nothing was evaluated; the loop sleeps `backoff` and retries.
    Refused {
        reason: RefusalReason,
        backoff: Duration,
    },
}

/// Immutable result of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Cycle number; a refused attempt carries the number it would have had.
    pub cycle: u64,
    pub outcome: CycleOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counts: CycleCounts,
    pub telemetry_requests: Vec<TelemetryRequest>,
    pub proposals: Vec<ProposalRecord>,
    pub kpis: Vec<KpiValue>,
    /// Sleep before the next cycle.
    pub next_delay: Duration,
}

impl CycleReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Completed { .. })
    }

    pub fn refusal(&self) -> Option<&RefusalReason> {
        match &self.outcome {
            CycleOutcome::Refused { reason, .. } => Some(reason),
            CycleOutcome::Completed { .. } => None,
        }
    }
}

/// Published on the loop's broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopEvent {
    Cycle(CycleReport),
    IntegrityFailure(ChainReport),
    Stopped { cycles: u64 },
}
