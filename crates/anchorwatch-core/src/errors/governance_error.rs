use super::error_code::{self, AnchorwatchErrorCode};

/// Policy governance errors. A proposal is refused when its evidence cannot
/// be reviewed meaningfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernanceError {
    #[error("proposal evidence has no samples")]
    EmptyEvidence,

    #[error("proposal evidence field {field} is not a finite number")]
    NonFiniteEvidence { field: String },

    #[error("failed to persist proposal: {reason}")]
    Persistence { reason: String },
}

impl AnchorwatchErrorCode for GovernanceError {
    fn error_code(&self) -> &'static str {
        error_code::GOVERNANCE_ERROR
    }
}
