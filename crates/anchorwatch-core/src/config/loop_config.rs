use serde::{Deserialize, Serialize};

use super::defaults;

/// Pressure loop scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Interval between cycle starts (milliseconds).
    pub tick_ms: u64,
    /// Maximum anchors requested per cycle.
    pub batch_size: usize,
    /// Anchors evaluated concurrently within a cycle.
    pub max_concurrency: usize,
    /// Minimum sleep after a cycle that requested more telemetry.
    pub indeterminate_backoff_ms: u64,
    /// First backoff after a collaborator outage; doubles per failure.
    pub collaborator_backoff_base_ms: u64,
    pub collaborator_backoff_max_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::DEFAULT_TICK_MS,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            max_concurrency: defaults::DEFAULT_MAX_CONCURRENCY,
            indeterminate_backoff_ms: defaults::DEFAULT_INDETERMINATE_BACKOFF_MS,
            collaborator_backoff_base_ms: defaults::DEFAULT_COLLABORATOR_BACKOFF_BASE_MS,
            collaborator_backoff_max_ms: defaults::DEFAULT_COLLABORATOR_BACKOFF_MAX_MS,
        }
    }
}
