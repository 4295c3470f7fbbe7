use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sensor registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Built-in sensors to leave out of the registry, by id.
    pub disabled: BTreeSet<String>,
}
