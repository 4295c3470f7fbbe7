use super::error_code::{self, AnchorwatchErrorCode};

/// Checkpoint log and sink errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to serialize checkpoint summary: {reason}")]
    Serialization { reason: String },

    #[error("checkpoint sink I/O error at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corrupt checkpoint record at line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    #[error("checkpoint chain integrity failure at sequence {sequence}: {reason}")]
    Integrity { sequence: u64, reason: String },
}

impl AnchorwatchErrorCode for CheckpointError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Serialization { .. } => error_code::SERIALIZATION_ERROR,
            Self::Integrity { .. } => error_code::INTEGRITY_ERROR,
            _ => error_code::CHECKPOINT_ERROR,
        }
    }
}
