use serde::{Deserialize, Serialize};

use super::defaults;

/// Observability subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// Cycles retained per KPI for rolling values.
    pub kpi_window: usize,
    /// Capacity of the cycle event broadcast channel.
    pub event_channel_capacity: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: defaults::DEFAULT_JSON_LOGS,
            kpi_window: defaults::DEFAULT_KPI_WINDOW,
            event_channel_capacity: defaults::DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}
