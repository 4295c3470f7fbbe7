//! Three-way comparison of intent, reality and projection for one anchor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::anchor::{AnchorId, TelemetryFields, Tolerance};

/// How a single field diverges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    /// Intent declares the field but reality does not report it.
    Missing,
    /// Reality falls outside the tolerance envelope.
    OutOfEnvelope,
    /// Reality differs from intent but the envelope accepts it.
    WithinEnvelope,
    /// No reality snapshot was available at all.
    RealityUnavailable,
}

impl DivergenceKind {
    /// Whether this divergence makes a comparison incoherent.
    pub fn breaks_coherence(self) -> bool {
        !matches!(self, Self::WithinEnvelope)
    }
}

/// Divergence descriptor for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    pub key: String,
    pub kind: DivergenceKind,
    pub expected: Option<Value>,
    pub observed: Option<Value>,
}

/// Per-anchor, per-cycle comparison. Not persisted beyond the cycle except
/// in aggregate (and as the pre-state of a staged repair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub anchor_id: AnchorId,
    pub intent: TelemetryFields,
    pub reality: Option<TelemetryFields>,
    pub projection: BTreeMap<String, Tolerance>,
    pub coherent: bool,
    /// Fraction of intent the reality snapshot could speak to, in [0, 1].
    pub confidence: f64,
    pub divergences: Vec<Divergence>,
}

impl Comparison {
    /// Comparison for an anchor whose reality could not be observed.
    /// Absence of evidence is never coherence.
    pub fn reality_unavailable(
        anchor_id: AnchorId,
        intent: TelemetryFields,
        projection: BTreeMap<String, Tolerance>,
    ) -> Self {
        Self {
            anchor_id,
            intent,
            reality: None,
            projection,
            coherent: false,
            confidence: 0.0,
            divergences: vec![Divergence {
                key: "*".to_string(),
                kind: DivergenceKind::RealityUnavailable,
                expected: None,
                observed: None,
            }],
        }
    }

    /// Share of intent keys that are incoherent. 1.0 when reality is missing.
    pub fn divergence_ratio(&self) -> f64 {
        if self.reality.is_none() {
            return 1.0;
        }
        if self.intent.is_empty() {
            return 0.0;
        }
        let incoherent = self
            .divergences
            .iter()
            .filter(|d| d.kind.breaks_coherence())
            .count();
        (incoherent as f64 / self.intent.len() as f64).min(1.0)
    }

    /// Keys that break coherence, in key order.
    pub fn incoherent_keys(&self) -> Vec<&str> {
        self.divergences
            .iter()
            .filter(|d| d.kind.breaks_coherence() && d.key != "*")
            .map(|d| d.key.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reality_is_fully_divergent() {
        let c = Comparison::reality_unavailable("a".into(), TelemetryFields::new(), BTreeMap::new());
        assert!(!c.coherent);
        assert_eq!(c.confidence, 0.0);
        assert_eq!(c.divergence_ratio(), 1.0);
        assert!(c.incoherent_keys().is_empty());
    }
}
