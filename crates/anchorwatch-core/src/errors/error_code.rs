//! Stable error codes for structured reporting.

/// Every Anchorwatch error maps to a stable, machine-readable code.
pub trait AnchorwatchErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const BUDGET_ERROR: &str = "BUDGET_ERROR";
pub const SENSOR_ERROR: &str = "SENSOR_ERROR";
pub const REPAIR_ERROR: &str = "REPAIR_ERROR";
pub const SIGNING_ERROR: &str = "SIGNING_ERROR";
pub const GOVERNANCE_ERROR: &str = "GOVERNANCE_ERROR";
pub const CHECKPOINT_ERROR: &str = "CHECKPOINT_ERROR";
pub const INTEGRITY_ERROR: &str = "INTEGRITY_ERROR";
pub const COLLABORATOR_UNAVAILABLE: &str = "COLLABORATOR_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const CANCELLED: &str = "CANCELLED";
