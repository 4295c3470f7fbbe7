use anchorwatch_core::config::ConfidenceConfig;
use anchorwatch_core::models::{EriBand, RawEri};

use crate::displayable::{DisplayableEri, EriDisplay};

/// Confidence gate seam, injectable into the loop.
pub trait IConfidenceGate: Send + Sync {
    fn calculate_displayable(&self, raw: &RawEri) -> DisplayableEri;
}

/// Forces `indeterminate` whenever confidence is below the floor; otherwise
/// buckets the score into safe / warning / critical.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceFloorEnforcer {
    config: ConfidenceConfig,
}

impl ConfidenceFloorEnforcer {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn floor(&self) -> f64 {
        self.config.floor
    }

    pub fn band_for(&self, score: f64) -> EriBand {
        if score >= self.config.critical_threshold {
            EriBand::Critical
        } else if score >= self.config.warning_threshold {
            EriBand::Warning
        } else {
            EriBand::Safe
        }
    }

    /// NaN fails every comparison, so `!(c >= floor)` also catches it.
    fn below_floor(&self, confidence: f64) -> bool {
        !(confidence >= self.config.floor)
    }
}

impl IConfidenceGate for ConfidenceFloorEnforcer {
    fn calculate_displayable(&self, raw: &RawEri) -> DisplayableEri {
        let confidence = if raw.confidence.is_finite() {
            raw.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut missing = raw.missing_inputs.clone();
        missing.sort();
        missing.dedup();

        let display = if self.below_floor(raw.confidence) || !raw.score.is_finite() {
            EriDisplay::Indeterminate
        } else {
            let value = raw.score.clamp(0.0, 1.0);
            EriDisplay::Scored {
                value,
                band: self.band_for(value),
            }
        };

        DisplayableEri::new(raw.anchor_id.clone(), display, confidence, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::models::AnchorId;

    fn raw(score: f64, confidence: f64) -> RawEri {
        RawEri {
            anchor_id: AnchorId::new("a"),
            score,
            confidence,
            missing_inputs: vec!["permissions".into(), "config".into()],
        }
    }

    #[test]
    fn high_score_low_confidence_is_indeterminate() {
        let gate = ConfidenceFloorEnforcer::default();
        let out = gate.calculate_displayable(&raw(0.9, 0.5));
        assert!(out.is_indeterminate());
        assert_eq!(out.value(), None);
        assert_eq!(out.missing_inputs(), ["config", "permissions"]);
        assert_eq!(out.confidence(), 0.5);
    }

    #[test]
    fn at_floor_is_scored() {
        let gate = ConfidenceFloorEnforcer::default();
        let out = gate.calculate_displayable(&raw(0.9, 0.7));
        assert_eq!(
            out.display(),
            EriDisplay::Scored {
                value: 0.9,
                band: EriBand::Critical
            }
        );
    }

    #[test]
    fn bands_follow_thresholds() {
        let gate = ConfidenceFloorEnforcer::default();
        assert_eq!(gate.band_for(0.0), EriBand::Safe);
        assert_eq!(gate.band_for(0.39), EriBand::Safe);
        assert_eq!(gate.band_for(0.4), EriBand::Warning);
        assert_eq!(gate.band_for(0.69), EriBand::Warning);
        assert_eq!(gate.band_for(0.7), EriBand::Critical);
    }

    #[test]
    fn nan_inputs_are_indeterminate() {
        let gate = ConfidenceFloorEnforcer::default();
        assert!(gate.calculate_displayable(&raw(0.5, f64::NAN)).is_indeterminate());
        assert!(gate.calculate_displayable(&raw(f64::NAN, 1.0)).is_indeterminate());
        assert_eq!(gate.calculate_displayable(&raw(0.5, f64::NAN)).confidence(), 0.0);
    }

    #[test]
    fn out_of_range_score_is_clamped() {
        let gate = ConfidenceFloorEnforcer::default();
        assert_eq!(gate.calculate_displayable(&raw(1.7, 1.0)).value(), Some(1.0));
    }

    #[test]
    fn indeterminate_serializes_without_a_number() {
        let gate = ConfidenceFloorEnforcer::default();
        let json = serde_json::to_value(gate.calculate_displayable(&raw(0.9, 0.1))).unwrap();
        assert_eq!(json["display"]["kind"], "indeterminate");
        assert!(json["display"].get("value").is_none());
    }
}
