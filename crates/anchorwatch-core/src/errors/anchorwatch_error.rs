//! Top-level error aggregating every subsystem error via `From` conversions.

use super::error_code::{self, AnchorwatchErrorCode};
use super::{
    BudgetError, CheckpointError, CollaboratorError, ConfigError, GovernanceError, RepairError,
    SensorError, SigningError,
};

#[derive(Debug, thiserror::Error)]
pub enum AnchorwatchError {
    #[error("budget error: {0}")]
    Budget(#[from] BudgetError),

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("repair error: {0}")]
    Repair(#[from] RepairError),

    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("verification loop cancelled")]
    Cancelled,
}

pub type AnchorwatchResult<T> = Result<T, AnchorwatchError>;

impl AnchorwatchErrorCode for AnchorwatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Budget(e) => e.error_code(),
            Self::Sensor(e) => e.error_code(),
            Self::Repair(e) => e.error_code(),
            Self::Signing(e) => e.error_code(),
            Self::Governance(e) => e.error_code(),
            Self::Checkpoint(e) => e.error_code(),
            Self::Collaborator(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::SerializationError(_) => error_code::SERIALIZATION_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
