use uuid::Uuid;

use super::error_code::{self, AnchorwatchErrorCode};
use super::SigningError;
use crate::models::{AnchorId, RepairStatus};

/// Repair state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("repair {repair_id}: transition {from} -> {to} is not allowed")]
    InvalidTransition {
        repair_id: Uuid,
        from: RepairStatus,
        to: RepairStatus,
    },

    #[error("anchor {anchor_id} already has open repair {open_repair}")]
    AnchorBusy { anchor_id: AnchorId, open_repair: Uuid },

    #[error("repair not found: {0}")]
    NotFound(Uuid),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("failed to serialize repair preimage: {reason}")]
    Serialization { reason: String },
}

impl AnchorwatchErrorCode for RepairError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Signing(e) => e.error_code(),
            Self::Serialization { .. } => error_code::SERIALIZATION_ERROR,
            _ => error_code::REPAIR_ERROR,
        }
    }
}
