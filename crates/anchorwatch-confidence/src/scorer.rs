use std::collections::BTreeSet;

use anchorwatch_core::models::{AnchorId, Comparison, Finding, FindingStatus, RawEri};

/// Combines the findings for one anchor into a [`RawEri`].
///
/// Score is the noisy-or of the severity weights of detected findings, so it
/// stays in [0, 1] and grows with every independent detection. Confidence is
/// the mean sensor confidence; inconclusive sensors pull it down.
#[derive(Debug, Clone, Copy, Default)]
pub struct EriScorer;

impl EriScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, anchor_id: &AnchorId, findings: &[Finding]) -> RawEri {
        if findings.is_empty() {
            return RawEri {
                anchor_id: anchor_id.clone(),
                score: 0.0,
                confidence: 0.0,
                missing_inputs: vec!["findings".to_string()],
            };
        }

        let survival: f64 = findings
            .iter()
            .filter(|f| f.status == FindingStatus::Detected)
            .map(|f| 1.0 - f.severity.weight())
            .product();

        let confidence = findings
            .iter()
            .map(|f| f.confidence.clamp(0.0, 1.0))
            .sum::<f64>()
            / findings.len() as f64;

        let missing: BTreeSet<String> = findings
            .iter()
            .flat_map(|f| f.missing_inputs.iter().cloned())
            .collect();

        RawEri {
            anchor_id: anchor_id.clone(),
            score: (1.0 - survival).clamp(0.0, 1.0),
            confidence,
            missing_inputs: missing.into_iter().collect(),
        }
    }

    /// Score `findings` with confidence capped by the three-way comparison.
    ///
    /// Sensors with nothing declared report clear at full confidence; they
    /// cannot vouch for an anchor whose reality was never observed.
    pub fn score_against(&self, comparison: &Comparison, findings: &[Finding]) -> RawEri {
        let mut eri = self.score(&comparison.anchor_id, findings);
        eri.confidence = eri.confidence.min(comparison.confidence.clamp(0.0, 1.0));
        if comparison.reality.is_none() && !eri.missing_inputs.iter().any(|m| m == "reality") {
            eri.missing_inputs.push("reality".to_string());
            eri.missing_inputs.sort();
        }
        eri
    }
}
