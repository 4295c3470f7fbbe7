use serde::{Deserialize, Serialize};

use super::defaults;

/// Pressure budget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Verification units allowed per rolling window.
    pub units_per_window: u64,
    /// Rolling window length (milliseconds).
    pub window_ms: u64,
    /// Units charged for evaluating one anchor.
    pub units_per_anchor: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            units_per_window: defaults::DEFAULT_UNITS_PER_WINDOW,
            window_ms: defaults::DEFAULT_BUDGET_WINDOW_MS,
            units_per_anchor: defaults::DEFAULT_UNITS_PER_ANCHOR,
        }
    }
}
