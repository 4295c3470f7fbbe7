//! Terse constructors for anchors, policies and telemetry.

use anchorwatch_core::models::{Anchor, Consent, ConsentTier, PolicySnapshot, TelemetryFields};
use serde_json::Value;

/// Field map from a JSON object literal.
///
/// # Panics
/// Panics if `value` is not an object.
pub fn fields(value: Value) -> TelemetryFields {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        other => panic!("fields() expects a JSON object, got {other}"),
    }
}

/// Policy snapshot `v1` with the given intent and exact tolerances.
pub fn policy(intent: Value) -> PolicySnapshot {
    PolicySnapshot {
        version: "v1".to_string(),
        intent: fields(intent),
        tolerances: Default::default(),
    }
}

/// A consenting anchor.
pub fn anchor(id: &str, tier: ConsentTier, intent: Value) -> Anchor {
    Anchor::new(
        id,
        Consent {
            collection: true,
            tier,
        },
        policy(intent),
    )
}

/// An anchor whose owner has withdrawn consent.
pub fn unconsented(id: &str, tier: ConsentTier, intent: Value) -> Anchor {
    let mut a = anchor(id, tier, intent);
    a.consent.collection = false;
    a
}
