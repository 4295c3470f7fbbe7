use crate::errors::SigningError;
use crate::models::Signature;

/// Signing service for attestations and repair artifacts.
pub trait ISigner: Send + Sync {
    fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError>;

    /// `Ok(false)` on mismatch; `Err` only when verification could not run.
    fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SigningError>;
}
