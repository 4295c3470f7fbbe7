use anchorwatch_core::models::{ConsentTier, FindingStatus};
use anchorwatch_core::traits::SensorInput;
use anchorwatch_sensors::{compare, SensorRegistry};
use anchorwatch_core::config::SensorConfig;
use proptest::prelude::*;
use serde_json::{Map, Value};
use test_fixtures::anchor;

fn object_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]", 0i64..4, 0..6).prop_map(|m| {
        Value::Object(
            m.into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect::<Map<_, _>>(),
        )
    })
}

// ── Absence of evidence is never coherence ────────────────────────────────

proptest! {
    #[test]
    fn missing_reality_never_coherent(intent in object_strategy()) {
        let a = anchor("p", ConsentTier::Standard, intent);
        let c = compare(&a.id, &a.policy, None);
        prop_assert!(!c.coherent);
        prop_assert_eq!(c.confidence, 0.0);
    }
}

// ── Comparison against itself is coherent with full confidence ────────────

proptest! {
    #[test]
    fn identical_reality_is_coherent(intent in object_strategy()) {
        let a = anchor("p", ConsentTier::Standard, intent);
        let reality = a.policy.intent.clone();
        let c = compare(&a.id, &a.policy, Some(&reality));
        prop_assert!(c.coherent);
        prop_assert_eq!(c.confidence, 1.0);
        prop_assert_eq!(c.divergence_ratio(), 0.0);
    }
}

// ── Sensors are total and bounded on arbitrary reality ────────────────────

proptest! {
    #[test]
    fn findings_are_bounded(intent in object_strategy(), reality in object_strategy()) {
        let registry = SensorRegistry::with_builtins(&SensorConfig::default()).unwrap();
        let a = anchor("p", ConsentTier::Extended, intent);
        let reality = test_fixtures::fields(reality);
        let findings = registry.evaluate_all(&SensorInput { anchor: &a, reality: Some(&reality) });
        prop_assert_eq!(findings.len(), registry.len());
        for f in findings {
            prop_assert!((0.0..=1.0).contains(&f.confidence));
            if f.status == FindingStatus::Inconclusive {
                prop_assert_eq!(f.confidence, 0.0);
                prop_assert!(!f.missing_inputs.is_empty());
            }
        }
    }
}
