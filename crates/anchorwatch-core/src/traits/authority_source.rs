use uuid::Uuid;

use crate::errors::CollaboratorError;
use crate::models::AuthorizationDecision;

/// External authority that decides whether a staged repair may run.
/// Polled every cycle; never assumed.
pub trait IAuthoritySource: Send + Sync {
    fn get_authorization(&self, repair_id: Uuid) -> Result<AuthorizationDecision, CollaboratorError>;
}
