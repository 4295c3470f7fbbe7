use std::fmt;

use serde::{Deserialize, Serialize};

use super::anchor::AnchorId;
use super::comparison::Divergence;
use super::repair::RepairType;

/// What a sensor looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorCategory {
    /// Divergence between declared intent and observed reality.
    Drift,
    /// Preconditions that would make an anchor exploitable.
    Exposure,
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drift => f.write_str("drift"),
            Self::Exposure => f.write_str("exposure"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Contribution of a detected finding to the raw ERI score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Low => 0.1,
            Self::Medium => 0.3,
            Self::High => 0.6,
            Self::Critical => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    /// Inputs were present and nothing was wrong.
    Clear,
    /// The sensor found the condition it looks for.
    Detected,
    /// Required inputs were missing; no verdict.
    Inconclusive,
}

/// Structured output of one sensor for one anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub sensor_id: String,
    pub anchor_id: AnchorId,
    pub category: SensorCategory,
    pub severity: Severity,
    pub status: FindingStatus,
    pub confidence: f64,
    pub missing_inputs: Vec<String>,
    pub divergences: Vec<Divergence>,
    /// Copied from the sensor declaration.
    pub may_auto_stage: bool,
    pub repair_type: Option<RepairType>,
    pub summary: String,
}

impl Finding {
    pub fn is_detected(&self) -> bool {
        self.status == FindingStatus::Detected
    }

    /// Whether this finding may lead the loop to stage a repair.
    pub fn stages_repair(&self) -> bool {
        self.is_detected() && self.may_auto_stage && self.repair_type.is_some()
    }
}
