use crate::errors::CollaboratorError;
use crate::models::Anchor;

/// Registry of anchors. Read-only from this subsystem's point of view.
pub trait IAnchorSource: Send + Sync {
    /// Up to `batch_size` anchors whose consent flag is currently true.
    fn list_consented_anchors(&self, batch_size: usize) -> Result<Vec<Anchor>, CollaboratorError>;
}
