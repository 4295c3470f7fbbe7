//! Per-anchor pipeline run concurrently inside a cycle:
//! collect, minimize, sign, sense, score, gate. Pure apart from the
//! collaborator calls; nothing here mutates cross-cycle state.

use std::sync::Arc;

use anchorwatch_confidence::{DisplayableEri, EriScorer, IConfidenceGate};
use anchorwatch_core::models::{Anchor, Attestation, Collaborator, Comparison, Finding};
use anchorwatch_core::traits::{ISigner, ITelemetryCollector, SensorInput};
use anchorwatch_privacy::AllowListMinimizer;
use anchorwatch_sensors::{compare, SensorRegistry};

/// Shared, read-only inputs of the per-anchor pipeline.
pub(crate) struct Evaluator {
    pub collector: Arc<dyn ITelemetryCollector>,
    pub signer: Arc<dyn ISigner>,
    pub minimizer: AllowListMinimizer,
    pub sensors: SensorRegistry,
    pub scorer: EriScorer,
    pub gate: Arc<dyn IConfidenceGate>,
}

/// A collaborator call that failed for one anchor.
#[derive(Debug, Clone)]
pub(crate) struct AnchorFailure {
    pub collaborator: Collaborator,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub(crate) struct AnchorEvaluation {
    pub anchor: Anchor,
    /// Signed attestation, absent when reality was unavailable.
    pub attestation: Option<Attestation>,
    pub comparison: Comparison,
    pub findings: Vec<Finding>,
    pub eri: DisplayableEri,
    pub failures: Vec<AnchorFailure>,
    /// Collaborators that answered for this anchor.
    pub answered: Vec<Collaborator>,
    pub malformed: bool,
}

impl Evaluator {
    pub fn evaluate(&self, anchor: Anchor, cycle: u64) -> AnchorEvaluation {
        let mut failures = Vec::new();
        let mut answered = Vec::new();
        let mut malformed = false;

        let attestation = match self.collector.collect(&anchor) {
            Ok(raw) if raw.anchor_id != anchor.id => {
                failures.push(AnchorFailure {
                    collaborator: Collaborator::TelemetryCollector,
                    reason: format!("attestation for {} returned for {}", raw.anchor_id, anchor.id),
                });
                None
            }
            Ok(raw) => {
                answered.push(Collaborator::TelemetryCollector);
                let (attestation, minimized) =
                    self.minimizer.attest(&raw, anchor.consent.tier, cycle);
                malformed = minimized.malformed;
                if malformed {
                    tracing::debug!(anchor_id = %anchor.id, "malformed telemetry payload");
                    None
                } else {
                    self.sign(attestation, &mut failures, &mut answered)
                }
            }
            Err(e) => {
                failures.push(AnchorFailure {
                    collaborator: e.collaborator(),
                    reason: e.to_string(),
                });
                None
            }
        };

        self.assess(anchor, attestation, failures, answered, malformed)
    }

    /// Result for an anchor whose evaluation never finished: reality is
    /// unavailable and the collection counts as failed.
    pub fn aborted(&self, anchor: Anchor, reason: String) -> AnchorEvaluation {
        let failure = AnchorFailure {
            collaborator: Collaborator::TelemetryCollector,
            reason,
        };
        self.assess(anchor, None, vec![failure], Vec::new(), false)
    }

    fn assess(
        &self,
        anchor: Anchor,
        attestation: Option<Attestation>,
        failures: Vec<AnchorFailure>,
        answered: Vec<Collaborator>,
        malformed: bool,
    ) -> AnchorEvaluation {
        let reality = attestation.as_ref().map(|a| &a.fields);
        let input = SensorInput {
            anchor: &anchor,
            reality,
        };
        let findings = self.sensors.evaluate_all(&input);
        let comparison = compare(&anchor.id, &anchor.policy, reality);
        let raw_eri = self.scorer.score_against(&comparison, &findings);
        let eri = self.gate.calculate_displayable(&raw_eri);

        AnchorEvaluation {
            anchor,
            attestation,
            comparison,
            findings,
            eri,
            failures,
            answered,
            malformed,
        }
    }

    /// Unsigned attestations are never trusted as reality.
    fn sign(
        &self,
        attestation: Attestation,
        failures: &mut Vec<AnchorFailure>,
        answered: &mut Vec<Collaborator>,
    ) -> Option<Attestation> {
        match self.signer.sign(&attestation.signing_payload()) {
            Ok(signature) => {
                answered.push(Collaborator::SigningService);
                Some(attestation.with_signature(signature))
            }
            Err(e) => {
                failures.push(AnchorFailure {
                    collaborator: Collaborator::SigningService,
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}
