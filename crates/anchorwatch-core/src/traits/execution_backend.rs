use crate::errors::CollaboratorError;
use crate::models::{ExecutionResult, Repair};

/// Applies authorized repairs to anchors.
pub trait IExecutionBackend: Send + Sync {
    fn apply(&self, repair: &Repair) -> Result<ExecutionResult, CollaboratorError>;
}
