use serde::{Deserialize, Serialize};

use super::anchor::AnchorId;

/// Exposure-Readiness Index before confidence gating. Never displayed
/// directly; see the confidence crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEri {
    pub anchor_id: AnchorId,
    /// Bounded risk score in [0, 1].
    pub score: f64,
    /// Confidence in the score, in [0, 1].
    pub confidence: f64,
    /// Inputs whose absence lowered confidence.
    pub missing_inputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EriBand {
    Safe,
    Warning,
    Critical,
}
