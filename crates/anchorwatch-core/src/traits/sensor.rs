use crate::models::{Anchor, Finding, RepairType, SensorCategory, Severity, TelemetryFields};

/// What a sensor sees: the anchor and its minimized reality, if any.
#[derive(Debug, Clone, Copy)]
pub struct SensorInput<'a> {
    pub anchor: &'a Anchor,
    pub reality: Option<&'a TelemetryFields>,
}

/// A non-destructive check. `evaluate` must be a pure function of its input.
pub trait ISensor: Send + Sync {
    fn id(&self) -> &str;
    fn category(&self) -> SensorCategory;
    fn severity(&self) -> Severity;

    /// Whether a detection may lead to a staged repair. Only drift sensors
    /// may return true; no sensor ever executes anything.
    fn may_auto_stage(&self) -> bool;

    fn repair_type(&self) -> Option<RepairType>;

    fn evaluate(&self, input: &SensorInput<'_>) -> Finding;
}
