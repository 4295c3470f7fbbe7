use crate::errors::CheckpointError;
use crate::models::Checkpoint;

/// Append-only destination for checkpoint records, readable for audit.
pub trait ICheckpointSink: Send {
    fn append(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Every record in append order.
    fn read_all(&self) -> Result<Vec<Checkpoint>, CheckpointError>;
}
