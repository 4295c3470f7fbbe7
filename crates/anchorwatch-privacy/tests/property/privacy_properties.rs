use anchorwatch_core::models::{AnchorId, ConsentTier, RawAttestation};
use anchorwatch_core::traits::IMinimizer;
use anchorwatch_privacy::AllowListMinimizer;
use chrono::Utc;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn tier_strategy() -> impl Strategy<Value = ConsentTier> {
    prop_oneof![
        Just(ConsentTier::Minimal),
        Just(ConsentTier::Standard),
        Just(ConsentTier::Extended),
    ]
}

/// Keys drawn from a mix of declared and undeclared field names.
fn payload_strategy() -> impl Strategy<Value = Value> {
    let key = prop_oneof![
        Just("agent_version".to_string()),
        Just("patch_level".to_string()),
        Just("config".to_string()),
        Just("permissions".to_string()),
        Just("open_ports".to_string()),
        "[a-z_]{1,12}",
    ];
    prop::collection::btree_map(key, any::<i64>(), 0..12).prop_map(|m| {
        Value::Object(
            m.into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect::<Map<_, _>>(),
        )
    })
}

fn raw(payload: Value) -> RawAttestation {
    RawAttestation {
        anchor_id: AnchorId::new("prop-anchor"),
        collected_at: Utc::now(),
        payload,
    }
}

// ── Output fields are always a subset of the tier allow-list ──────────────

proptest! {
    #[test]
    fn output_is_subset_of_allow_list(
        payload in payload_strategy(),
        tier in tier_strategy(),
    ) {
        let m = AllowListMinimizer::default();
        let out = m.minimize(&raw(payload.clone()), tier);
        let allow = m.config().allow_list(tier);
        for key in out.fields.keys() {
            prop_assert!(allow.contains(key), "{} leaked at tier {}", key, tier);
        }
        let input_len = payload.as_object().map(|o| o.len()).unwrap_or(0);
        prop_assert_eq!(out.fields.len() + out.dropped.len(), input_len);
    }
}

// ── Minimization is idempotent ────────────────────────────────────────────

proptest! {
    #[test]
    fn minimization_is_idempotent(
        payload in payload_strategy(),
        tier in tier_strategy(),
    ) {
        let m = AllowListMinimizer::default();
        let (attestation, first) = m.attest(&raw(payload), tier, 1);
        let second = m.minimize(&attestation.to_raw(), tier);
        prop_assert_eq!(&first.fields, &second.fields);
        prop_assert!(second.dropped.is_empty());
    }
}

// ── Arbitrary JSON never panics ───────────────────────────────────────────

proptest! {
    #[test]
    fn scalar_payloads_are_flagged_malformed(n in any::<i64>(), s in ".{0,20}") {
        let m = AllowListMinimizer::default();
        prop_assert!(m.minimize(&raw(Value::from(n)), ConsentTier::Extended).malformed);
        prop_assert!(m.minimize(&raw(Value::from(s)), ConsentTier::Minimal).malformed);
    }
}
