//! Three-way match of intent, reality and projection.

use anchorwatch_core::models::{
    AnchorId, Comparison, Divergence, DivergenceKind, Finding, FindingStatus, PolicySnapshot,
    RepairType, SensorCategory, Severity, TelemetryFields, Tolerance,
};
use anchorwatch_core::traits::{ISensor, SensorInput};

use crate::finding::{base_finding, inconclusive};
use crate::values::within_tolerance;

pub const SENSOR_ID: &str = "three_way_match";

/// Compare an anchor's observable intent against reality through the
/// policy's tolerance envelope.
///
/// Missing reality is incoherent with confidence 0. Otherwise confidence is
/// the share of non-ignored intent keys that reality reports.
pub fn compare(
    anchor_id: &AnchorId,
    policy: &PolicySnapshot,
    reality: Option<&TelemetryFields>,
) -> Comparison {
    let intent = policy.observable_intent();
    let projection = policy.projection();

    let Some(reality) = reality else {
        return Comparison::reality_unavailable(anchor_id.clone(), intent, projection);
    };

    let mut divergences = Vec::new();
    let mut checked = 0usize;
    let mut observed_keys = 0usize;

    for (key, expected) in &intent {
        let tolerance = policy.tolerance_for(key);
        if *tolerance == Tolerance::Ignore {
            continue;
        }
        checked += 1;
        match reality.get(key) {
            None => divergences.push(Divergence {
                key: key.clone(),
                kind: DivergenceKind::Missing,
                expected: Some(expected.clone()),
                observed: None,
            }),
            Some(observed) => {
                observed_keys += 1;
                if observed == expected {
                    continue;
                }
                let kind = if within_tolerance(tolerance, expected, observed) {
                    DivergenceKind::WithinEnvelope
                } else {
                    DivergenceKind::OutOfEnvelope
                };
                divergences.push(Divergence {
                    key: key.clone(),
                    kind,
                    expected: Some(expected.clone()),
                    observed: Some(observed.clone()),
                });
            }
        }
    }

    let coherent = divergences.iter().all(|d| !d.kind.breaks_coherence());
    let confidence = if checked == 0 {
        1.0
    } else {
        observed_keys as f64 / checked as f64
    };

    Comparison {
        anchor_id: anchor_id.clone(),
        intent,
        reality: Some(reality.clone()),
        projection,
        coherent,
        confidence,
        divergences,
    }
}

/// Drift sensor wrapping [`compare`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreeWayMatchSensor;

impl ISensor for ThreeWayMatchSensor {
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
        Some(RepairType::PolicyReassert)
    }

    fn evaluate(&self, input: &SensorInput<'_>) -> Finding {
        let comparison = compare(&input.anchor.id, &input.anchor.policy, input.reality);
        if comparison.reality.is_none() {
            return inconclusive(self, input, vec!["reality".to_string()]);
        }

        let status = if comparison.coherent {
            FindingStatus::Clear
        } else {
            FindingStatus::Detected
        };
        let mut finding = base_finding(self, input, status, comparison.confidence);
        finding.missing_inputs = comparison
            .divergences
            .iter()
            .filter(|d| d.kind == DivergenceKind::Missing)
            .map(|d| d.key.clone())
            .collect();
        finding.summary = if comparison.coherent {
            "reality within projection".to_string()
        } else {
            format!("incoherent: {}", comparison.incoherent_keys().join(", "))
        };
        finding.divergences = comparison.divergences;
        finding
    }
}
