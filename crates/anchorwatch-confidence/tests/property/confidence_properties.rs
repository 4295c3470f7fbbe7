use anchorwatch_confidence::{ConfidenceFloorEnforcer, EriDisplay, IConfidenceGate};
use anchorwatch_core::config::ConfidenceConfig;
use anchorwatch_core::models::{AnchorId, RawEri};
use proptest::prelude::*;

fn raw(score: f64, confidence: f64) -> RawEri {
    RawEri {
        anchor_id: AnchorId::new("prop"),
        score,
        confidence,
        missing_inputs: Vec::new(),
    }
}

// ── Below the floor the display is always indeterminate ───────────────────

proptest! {
    #[test]
    fn below_floor_is_always_indeterminate(
        floor in 0.01f64..=1.0,
        fraction in 0.0f64..1.0,
        score in any::<f64>(),
    ) {
        let gate = ConfidenceFloorEnforcer::new(ConfidenceConfig {
            floor,
            ..ConfidenceConfig::default()
        });
        let out = gate.calculate_displayable(&raw(score, floor * fraction));
        prop_assert_eq!(out.display(), EriDisplay::Indeterminate);
        prop_assert!(out.value().is_none());
    }
}

// ── At or above the floor a finite score is shown, clamped to [0, 1] ──────

proptest! {
    #[test]
    fn above_floor_shows_bounded_score(
        confidence in 0.7f64..=1.0,
        score in -2.0f64..3.0,
    ) {
        let gate = ConfidenceFloorEnforcer::default();
        let out = gate.calculate_displayable(&raw(score, confidence));
        let value = out.value().unwrap();
        prop_assert!((0.0..=1.0).contains(&value));
        prop_assert_eq!(out.band(), Some(gate.band_for(value)));
    }
}
