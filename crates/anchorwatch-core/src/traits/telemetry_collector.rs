use crate::errors::CollaboratorError;
use crate::models::{Anchor, RawAttestation, TelemetryRequest};

/// Transport for raw anchor telemetry.
pub trait ITelemetryCollector: Send + Sync {
    fn collect(&self, anchor: &Anchor) -> Result<RawAttestation, CollaboratorError>;

    /// Ask for additional inputs before the next cycle samples the anchor.
    fn request_telemetry(&self, request: &TelemetryRequest) -> Result<(), CollaboratorError>;
}
