//! Permission drift: grants observed on the anchor that intent never declared.

use anchorwatch_core::constants::fields;
use anchorwatch_core::models::{
    Divergence, DivergenceKind, Finding, FindingStatus, RepairType, SensorCategory, Severity,
};
use anchorwatch_core::traits::{ISensor, SensorInput};
use serde_json::Value;

use crate::finding::{base_finding, inconclusive};
use crate::values::grant_set;

pub const SENSOR_ID: &str = "permission_drift";

#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionDriftSensor;

impl ISensor for PermissionDriftSensor {
    fn id(&self) -> &str {
        SENSOR_ID
    }

    fn category(&self) -> SensorCategory {
        SensorCategory::Drift
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn may_auto_stage(&self) -> bool {
        true
    }

    fn repair_type(&self) -> Option<RepairType> {
        Some(RepairType::PermissionRevoke)
    }

    fn evaluate(&self, input: &SensorInput<'_>) -> Finding {
        let Some(intended) = input.anchor.policy.intent.get(fields::PERMISSIONS) else {
            let mut f = base_finding(self, input, FindingStatus::Clear, 1.0);
            f.summary = "no permissions declared".to_string();
            return f;
        };
        let Some(observed) = input.reality.and_then(|r| r.get(fields::PERMISSIONS)) else {
            return inconclusive(self, input, vec![fields::PERMISSIONS.to_string()]);
        };
        let (Some(intended), Some(observed)) = (grant_set(intended), grant_set(observed)) else {
            return inconclusive(self, input, vec![fields::PERMISSIONS.to_string()]);
        };

        let escalations: Vec<&String> = observed.difference(&intended).collect();
        let absent: Vec<&String> = intended.difference(&observed).collect();

        let status = if escalations.is_empty() {
            FindingStatus::Clear
        } else {
            FindingStatus::Detected
        };
        let mut f = base_finding(self, input, status, 1.0);
        f.divergences = escalations
            .iter()
            .map(|g| Divergence {
                key: format!("{}/{g}", fields::PERMISSIONS),
                kind: DivergenceKind::OutOfEnvelope,
                expected: None,
                observed: Some(Value::String((*g).clone())),
            })
            .chain(absent.iter().map(|g| Divergence {
                key: format!("{}/{g}", fields::PERMISSIONS),
                kind: DivergenceKind::WithinEnvelope,
                expected: Some(Value::String((*g).clone())),
                observed: None,
            }))
            .collect();
        f.summary = match (escalations.len(), absent.len()) {
            (0, 0) => "permissions match intent".to_string(),
            (0, n) => format!("{n} declared grant(s) not in use"),
            (e, _) => format!("{e} undeclared grant(s)"),
        };
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::models::ConsentTier;
    use serde_json::json;
    use test_fixtures::{anchor, fields as f};

    fn run(intent: Value, reality: Option<Value>) -> Finding {
        let a = anchor("a", ConsentTier::Standard, intent);
        let reality = reality.map(f);
        PermissionDriftSensor.evaluate(&SensorInput {
            anchor: &a,
            reality: reality.as_ref(),
        })
    }

    #[test]
    fn undeclared_grant_is_detected() {
        let finding = run(
            json!({"permissions": {"deploy": ["read"]}}),
            Some(json!({"permissions": {"deploy": ["read", "admin"]}})),
        );
        assert!(finding.is_detected());
        assert!(finding.stages_repair());
        assert_eq!(finding.divergences[0].key, "permissions/deploy/admin");
    }

    #[test]
    fn unused_grant_is_not_an_escalation() {
        let finding = run(
            json!({"permissions": ["read", "write"]}),
            Some(json!({"permissions": ["read"]})),
        );
        assert_eq!(finding.status, FindingStatus::Clear);
        assert_eq!(finding.divergences.len(), 1);
        assert_eq!(finding.divergences[0].kind, DivergenceKind::WithinEnvelope);
    }

    #[test]
    fn missing_reality_is_inconclusive() {
        let finding = run(json!({"permissions": ["read"]}), Some(json!({"other": 1})));
        assert_eq!(finding.status, FindingStatus::Inconclusive);
        assert_eq!(finding.confidence, 0.0);
        assert_eq!(finding.missing_inputs, vec!["permissions".to_string()]);
    }

    #[test]
    fn malformed_listing_is_inconclusive() {
        let finding = run(
            json!({"permissions": ["read"]}),
            Some(json!({"permissions": "root"})),
        );
        assert_eq!(finding.status, FindingStatus::Inconclusive);
    }
}
