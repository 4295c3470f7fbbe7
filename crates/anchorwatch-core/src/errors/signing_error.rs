use super::error_code::{self, AnchorwatchErrorCode};

/// Signing service errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("signing service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid signing key: {reason}")]
    InvalidKey { reason: String },

    #[error("malformed signature: {reason}")]
    MalformedSignature { reason: String },
}

impl AnchorwatchErrorCode for SigningError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::COLLABORATOR_UNAVAILABLE,
            _ => error_code::SIGNING_ERROR,
        }
    }
}
