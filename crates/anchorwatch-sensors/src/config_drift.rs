//! Configuration drift: declared config keys whose observed value differs.

use anchorwatch_core::constants::fields;
use anchorwatch_core::models::{
    Divergence, DivergenceKind, Finding, FindingStatus, RepairType, SensorCategory, Severity,
};
use anchorwatch_core::traits::{ISensor, SensorInput};
use serde_json::Value;

use crate::finding::{base_finding, inconclusive};

pub const SENSOR_ID: &str = "config_drift";

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigDriftSensor;

impl ISensor for ConfigDriftSensor {
    fn id(&self) -> &str {
        SENSOR_ID
    }

    fn category(&self) -> SensorCategory {
        SensorCategory::Drift
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn may_auto_stage(&self) -> bool {
        true
    }

    fn repair_type(&self) -> Option<RepairType> {
        Some(RepairType::ConfigRestore)
    }

    fn evaluate(&self, input: &SensorInput<'_>) -> Finding {
        let Some(Value::Object(intended)) = input.anchor.policy.intent.get(fields::CONFIG) else {
            let mut f = base_finding(self, input, FindingStatus::Clear, 1.0);
            f.summary = "no config declared".to_string();
            return f;
        };
        let Some(Value::Object(observed)) = input.reality.and_then(|r| r.get(fields::CONFIG))
        else {
            return inconclusive(self, input, vec![fields::CONFIG.to_string()]);
        };

        let divergences: Vec<Divergence> = intended
            .iter()
            .filter_map(|(key, expected)| match observed.get(key) {
                Some(actual) if actual == expected => None,
                actual => Some(Divergence {
                    key: format!("{}/{key}", fields::CONFIG),
                    kind: if actual.is_some() {
                        DivergenceKind::OutOfEnvelope
                    } else {
                        DivergenceKind::Missing
                    },
                    expected: Some(expected.clone()),
                    observed: actual.cloned(),
                }),
            })
            .collect();

        let status = if divergences.is_empty() {
            FindingStatus::Clear
        } else {
            FindingStatus::Detected
        };
        let mut f = base_finding(self, input, status, 1.0);
        f.summary = if divergences.is_empty() {
            "config matches intent".to_string()
        } else {
            format!("{} config key(s) drifted", divergences.len())
        };
        f.divergences = divergences;
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::models::ConsentTier;
    use serde_json::json;
    use test_fixtures::{anchor, fields as f};

    #[test]
    fn changed_and_removed_keys_are_drift() {
        let a = anchor(
            "a",
            ConsentTier::Standard,
            json!({"config": {"log_level": "info", "audit": true, "backup": "nightly"}}),
        );
        let reality = f(json!({"config": {"log_level": "debug", "audit": true, "new": 1}}));
        let finding = ConfigDriftSensor.evaluate(&SensorInput {
            anchor: &a,
            reality: Some(&reality),
        });
        assert!(finding.is_detected());
        let keys: Vec<&str> = finding.divergences.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["config/backup", "config/log_level"]);
        assert_eq!(finding.divergences[0].kind, DivergenceKind::Missing);
    }

    #[test]
    fn non_object_config_is_inconclusive() {
        let a = anchor("a", ConsentTier::Standard, json!({"config": {"x": 1}}));
        let reality = f(json!({"config": "x=1"}));
        let finding = ConfigDriftSensor.evaluate(&SensorInput {
            anchor: &a,
            reality: Some(&reality),
        });
        assert_eq!(finding.status, FindingStatus::Inconclusive);
        assert_eq!(finding.confidence, 0.0);
    }
}
