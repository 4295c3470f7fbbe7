use crate::models::{ConsentTier, MinimizedTelemetry, RawAttestation};

/// Data minimization. Implementations must be pure and total.
pub trait IMinimizer: Send + Sync {
    /// Strip every field not allowed for `tier`. Never fails.
    fn minimize(&self, raw: &RawAttestation, tier: ConsentTier) -> MinimizedTelemetry;
}
