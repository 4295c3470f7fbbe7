use serde::{Deserialize, Serialize};

use super::defaults;

/// Confidence floor and ERI banding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Below this confidence the ERI is displayed as indeterminate.
    pub floor: f64,
    /// Scores at or above this are `warning`.
    pub warning_threshold: f64,
    /// Scores at or above this are `critical`.
    pub critical_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            floor: defaults::DEFAULT_CONFIDENCE_FLOOR,
            warning_threshold: defaults::DEFAULT_WARNING_THRESHOLD,
            critical_threshold: defaults::DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}
