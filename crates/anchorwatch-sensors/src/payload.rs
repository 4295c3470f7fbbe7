//! Repair payloads derived from findings.

use anchorwatch_core::models::{Finding, PolicySnapshot, TelemetryFields};

/// The declared intent for every top-level field a finding diverged on.
///
/// Divergence keys may address nested entries (`config/log_level`); the
/// payload restores the whole top-level field. Fields intent does not declare
/// are skipped.
pub fn repair_payload(finding: &Finding, policy: &PolicySnapshot) -> TelemetryFields {
    let mut payload = TelemetryFields::new();
    for divergence in &finding.divergences {
        let top = divergence
            .key
            .split('/')
            .next()
            .unwrap_or(divergence.key.as_str());
        if let Some(intent) = policy.intent.get(top) {
            payload.insert(top.to_string(), intent.clone());
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigDriftSensor;
    use anchorwatch_core::models::ConsentTier;
    use anchorwatch_core::traits::{ISensor, SensorInput};
    use serde_json::json;
    use test_fixtures::{anchor, fields};

    #[test]
    fn payload_restores_top_level_intent() {
        let a = anchor(
            "a",
            ConsentTier::Standard,
            json!({"config": {"log_level": "info"}, "os_family": "linux"}),
        );
        let reality = fields(json!({"config": {"log_level": "debug"}}));
        let finding = ConfigDriftSensor.evaluate(&SensorInput {
            anchor: &a,
            reality: Some(&reality),
        });
        assert_eq!(
            repair_payload(&finding, &a.policy),
            fields(json!({"config": {"log_level": "info"}}))
        );
    }
}
