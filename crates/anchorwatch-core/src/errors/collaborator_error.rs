use super::error_code::{self, AnchorwatchErrorCode};
use crate::models::Collaborator;

/// Failures talking to an external collaborator. Always retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: Collaborator,
        reason: String,
    },

    #[error("{collaborator} timed out")]
    Timeout { collaborator: Collaborator },

    #[error("{collaborator} returned an invalid response: {reason}")]
    InvalidResponse {
        collaborator: Collaborator,
        reason: String,
    },
}

impl CollaboratorError {
    /// Shorthand for the common unavailable case.
    pub fn unavailable(collaborator: Collaborator, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            reason: reason.into(),
        }
    }

    /// The collaborator that failed.
    pub fn collaborator(&self) -> Collaborator {
        match self {
            Self::Unavailable { collaborator, .. }
            | Self::Timeout { collaborator }
            | Self::InvalidResponse { collaborator, .. } => *collaborator,
        }
    }
}

impl AnchorwatchErrorCode for CollaboratorError {
    fn error_code(&self) -> &'static str {
        error_code::COLLABORATOR_UNAVAILABLE
    }
}
