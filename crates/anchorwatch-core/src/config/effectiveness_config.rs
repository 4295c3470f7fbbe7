use serde::{Deserialize, Serialize};

use super::defaults;

/// Repair effectiveness tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectivenessConfig {
    /// Outcomes retained per repair type for the rolling average.
    pub window: usize,
    /// Rolling average below which a policy proposal is emitted.
    pub threshold: f64,
    /// Outcomes required before the average is trusted.
    pub min_samples: usize,
}

impl Default for EffectivenessConfig {
    fn default() -> Self {
        Self {
            window: defaults::DEFAULT_EFFECTIVENESS_WINDOW,
            threshold: defaults::DEFAULT_EFFECTIVENESS_THRESHOLD,
            min_samples: defaults::DEFAULT_EFFECTIVENESS_MIN_SAMPLES,
        }
    }
}
