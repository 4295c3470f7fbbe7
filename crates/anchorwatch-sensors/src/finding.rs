use anchorwatch_core::models::{Finding, FindingStatus};
use anchorwatch_core::traits::{ISensor, SensorInput};

/// Finding pre-filled from the sensor's declaration.
pub(crate) fn base_finding(
    sensor: &dyn ISensor,
    input: &SensorInput<'_>,
    status: FindingStatus,
    confidence: f64,
) -> Finding {
    Finding {
        sensor_id: sensor.id().to_string(),
        anchor_id: input.anchor.id.clone(),
        category: sensor.category(),
        severity: sensor.severity(),
        status,
        confidence,
        missing_inputs: Vec::new(),
        divergences: Vec::new(),
        may_auto_stage: sensor.may_auto_stage(),
        repair_type: sensor.repair_type(),
        summary: String::new(),
    }
}

/// Required inputs absent: no verdict, zero confidence.
pub(crate) fn inconclusive(
    sensor: &dyn ISensor,
    input: &SensorInput<'_>,
    missing: Vec<String>,
) -> Finding {
    let mut f = base_finding(sensor, input, FindingStatus::Inconclusive, 0.0);
    f.summary = format!("missing inputs: {}", missing.join(", "));
    f.missing_inputs = missing;
    f
}
