//! Exposure preconditions: conditions that would make an anchor exploitable.
//! Findings here are signals for review only and never stage repairs.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anchorwatch_core::constants::fields;
use anchorwatch_core::models::{
    Divergence, DivergenceKind, Finding, FindingStatus, RepairType, SensorCategory, Severity,
};
use anchorwatch_core::traits::{ISensor, SensorInput};
use serde_json::Value;

use crate::finding::{base_finding, inconclusive};
use crate::values::{canonical, compare_levels};

pub const SENSOR_ID: &str = "exposure_precondition";

#[derive(Debug, Default, Clone, Copy)]
pub struct ExposurePreconditionSensor;

/// Outcome of one precondition check.
enum Check {
    Pass,
    Exposed(Divergence),
    Missing(&'static str),
}

fn open_ports(allowed: &Value, reality: Option<&Value>) -> Check {
    let Some(Value::Array(open)) = reality else {
        return Check::Missing(fields::OPEN_PORTS);
    };
    let allowed: BTreeSet<String> = match allowed {
        Value::Array(items) => items.iter().map(canonical).collect(),
        _ => BTreeSet::new(),
    };
    let unexpected: Vec<Value> = open
        .iter()
        .filter(|p| !allowed.contains(&canonical(p)))
        .cloned()
        .collect();
    if unexpected.is_empty() {
        Check::Pass
    } else {
        Check::Exposed(Divergence {
            key: fields::OPEN_PORTS.to_string(),
            kind: DivergenceKind::OutOfEnvelope,
            expected: Some(Value::Array(allowed.into_iter().map(Value::String).collect())),
            observed: Some(Value::Array(unexpected)),
        })
    }
}

fn tls(required: &Value, reality: Option<&Value>) -> Check {
    if required != &Value::Bool(true) {
        return Check::Pass;
    }
    match reality {
        Some(Value::Bool(true)) => Check::Pass,
        Some(observed) => Check::Exposed(Divergence {
            key: fields::TLS_ENABLED.to_string(),
            kind: DivergenceKind::OutOfEnvelope,
            expected: Some(Value::Bool(true)),
            observed: Some(observed.clone()),
        }),
        None => Check::Missing(fields::TLS_ENABLED),
    }
}

fn patch_level(minimum: &Value, reality: Option<&Value>) -> Check {
    let Some(observed) = reality else {
        return Check::Missing(fields::PATCH_LEVEL);
    };
    match compare_levels(observed, minimum) {
        Some(Ordering::Greater | Ordering::Equal) => Check::Pass,
        // Incomparable levels count as below minimum.
        _ => Check::Exposed(Divergence {
            key: fields::PATCH_LEVEL.to_string(),
            kind: DivergenceKind::OutOfEnvelope,
            expected: Some(minimum.clone()),
            observed: Some(observed.clone()),
        }),
    }
}

impl ISensor for ExposurePreconditionSensor {
    fn id(&self) -> &str {
        SENSOR_ID
    }

    fn category(&self) -> SensorCategory {
        SensorCategory::Exposure
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn may_auto_stage(&self) -> bool {
        false
    }

    fn repair_type(&self) -> Option<RepairType> {
        None
    }

    fn evaluate(&self, input: &SensorInput<'_>) -> Finding {
        let intent = &input.anchor.policy.intent;
        let observed = |key: &str| input.reality.and_then(|r| r.get(key));

        let mut checks = Vec::new();
        if let Some(allowed) = intent.get(fields::ALLOWED_PORTS) {
            checks.push(open_ports(allowed, observed(fields::OPEN_PORTS)));
        }
        if let Some(required) = intent.get(fields::TLS_REQUIRED) {
            checks.push(tls(required, observed(fields::TLS_ENABLED)));
        }
        if let Some(minimum) = intent.get(fields::MIN_PATCH_LEVEL) {
            checks.push(patch_level(minimum, observed(fields::PATCH_LEVEL)));
        }

        if checks.is_empty() {
            let mut f = base_finding(self, input, FindingStatus::Clear, 1.0);
            f.summary = "no exposure preconditions declared".to_string();
            return f;
        }

        let total = checks.len();
        let mut exposed = Vec::new();
        let mut missing = Vec::new();
        for check in checks {
            match check {
                Check::Pass => {}
                Check::Exposed(d) => exposed.push(d),
                Check::Missing(key) => missing.push(key.to_string()),
            }
        }

        if exposed.is_empty() && !missing.is_empty() {
            return inconclusive(self, input, missing);
        }

        let confidence = (total - missing.len()) as f64 / total as f64;
        let status = if exposed.is_empty() {
            FindingStatus::Clear
        } else {
            FindingStatus::Detected
        };
        let mut f = base_finding(self, input, status, confidence);
        f.summary = if exposed.is_empty() {
            "no exposure preconditions met".to_string()
        } else {
            let keys: Vec<&str> = exposed.iter().map(|d| d.key.as_str()).collect();
            format!("exposed via {}", keys.join(", "))
        };
        f.divergences = exposed;
        f.missing_inputs = missing;
        f
    }
}
