use serde::{Deserialize, Serialize};

use super::defaults;

/// Checkpoint log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// JSONL file for the checkpoint sink. In-memory only when absent.
    pub path: Option<String>,
    /// Re-verify the whole chain every N committed cycles. 0 disables.
    pub verify_every_cycles: u64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: None,
            verify_every_cycles: defaults::DEFAULT_VERIFY_EVERY_CYCLES,
        }
    }
}
