use anchorwatch_core::models::{Anchor, ConsentTier};
use anchorwatch_core::traits::{IAnchorSource, IAuthoritySource, ITelemetryCollector};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use test_fixtures::*;
use uuid::Uuid;

#[derive(Deserialize)]
struct Fleet {
    anchors: Vec<Anchor>,
    telemetry: BTreeMap<String, Value>,
}

#[test]
fn fleet_fixture_parses() {
    let fleet: Fleet = load_fixture("fleet.json");
    assert_eq!(fleet.anchors.len(), 3);
    assert_eq!(fleet.telemetry.len(), 3);
    assert!(!fleet.anchors[2].is_collectable());
}

#[test]
fn anchor_source_skips_unconsented_and_rotates() {
    let source = StaticAnchorSource::new(vec![
        anchor("a", ConsentTier::Minimal, json!({})),
        unconsented("b", ConsentTier::Minimal, json!({})),
        anchor("c", ConsentTier::Minimal, json!({})),
    ]);
    let first = source.list_consented_anchors(1).unwrap();
    let second = source.list_consented_anchors(1).unwrap();
    assert_eq!(first[0].id.as_str(), "a");
    assert_eq!(second[0].id.as_str(), "c");
    assert_eq!(source.list_consented_anchors(10).unwrap().len(), 2);
}

#[test]
fn anchor_source_scripted_outage() {
    let source = StaticAnchorSource::new(vec![anchor("a", ConsentTier::Minimal, json!({}))]);
    source.fail_next(1);
    assert!(source.list_consented_anchors(1).is_err());
    assert!(source.list_consented_anchors(1).is_ok());
}

#[test]
fn collector_without_payload_is_unavailable() {
    let collector = ScriptedCollector::new().with_payload("a", json!({"x": 1}));
    let a = anchor("a", ConsentTier::Minimal, json!({}));
    let b = anchor("b", ConsentTier::Minimal, json!({}));
    assert!(collector.collect(&a).is_ok());
    assert!(collector.collect(&b).is_err());
}

#[test]
fn authority_defaults_to_pending() {
    let authority = ScriptedAuthority::pending();
    let decision = authority.get_authorization(Uuid::new_v4()).unwrap();
    assert!(!decision.is_granted());
    assert_eq!(authority.polls(), 1);
}
