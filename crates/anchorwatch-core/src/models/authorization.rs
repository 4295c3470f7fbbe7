use serde::{Deserialize, Serialize};

use super::attestation::RawAttestation;

/// Answer from the authority decision source for one repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuthorizationDecision {
    /// No decision yet. Treated exactly like a denial for this cycle.
    Pending,
    Granted { authority: String },
    Denied { authority: String, reason: String },
}

impl AuthorizationDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// Result of handing a repair to the execution backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Telemetry captured after the change, when the backend provides it.
    pub post_state: Option<RawAttestation>,
    pub detail: Option<String>,
}
