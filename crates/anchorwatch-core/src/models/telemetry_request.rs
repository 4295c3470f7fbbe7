use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::anchor::AnchorId;

/// Ask the collector for inputs that would raise confidence for an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRequest {
    pub anchor_id: AnchorId,
    pub cycle: u64,
    pub missing_inputs: Vec<String>,
    pub requested_at: DateTime<Utc>,
}
