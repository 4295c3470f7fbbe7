use std::collections::BTreeMap;

use anchorwatch_core::models::{
    AnchorId, Comparison, Divergence, DivergenceKind, RejectionReason, Repair, RepairDraft,
    RepairStatus, RepairType, Signature, TelemetryFields,
};
use chrono::Utc;
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Step {
    Authorize,
    Execute,
    Reject,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Authorize), Just(Step::Execute), Just(Step::Reject)]
}

fn kind() -> impl Strategy<Value = DivergenceKind> {
    prop_oneof![
        Just(DivergenceKind::Missing),
        Just(DivergenceKind::OutOfEnvelope),
        Just(DivergenceKind::WithinEnvelope),
    ]
}

fn staged() -> Repair {
    let draft = RepairDraft::new(
        AnchorId::new("srv-1"),
        RepairType::ConfigRestore,
        TelemetryFields::new(),
        1,
        "config_drift",
    );
    Repair::stage(draft, Signature::from_hex("00"), Utc::now())
}

proptest! {
    #[test]
    fn executed_always_follows_authorization(steps in prop::collection::vec(step(), 0..12)) {
        let mut repair = staged();
        for step in steps {
            let before = repair.status();
            let result = match step {
                Step::Authorize => repair.authorize("change-board", Utc::now()),
                Step::Execute => repair.mark_executed(Utc::now()),
                Step::Reject => repair.reject(RejectionReason::Expired, Utc::now()),
            };
            // Terminal states never move; refused steps leave the state alone.
            if before.is_terminal() || result.is_err() {
                prop_assert_eq!(repair.status(), before);
            }
        }
        if repair.status() == RepairStatus::Executed {
            prop_assert!(repair.authorized_before_execution());
        }
        for t in repair.history() {
            prop_assert!(t.from.can_transition_to(t.to));
        }
    }

    #[test]
    fn divergence_ratio_stays_in_unit_interval(
        intent_keys in 0usize..8,
        kinds in prop::collection::vec(kind(), 0..12),
    ) {
        let intent: TelemetryFields = (0..intent_keys)
            .map(|i| (format!("k{i}"), json!(i)))
            .collect();
        let divergences = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Divergence {
                key: format!("k{i}"),
                kind,
                expected: None,
                observed: None,
            })
            .collect();
        let comparison = Comparison {
            anchor_id: AnchorId::new("srv-1"),
            intent: intent.clone(),
            reality: Some(intent),
            projection: BTreeMap::new(),
            coherent: false,
            confidence: 1.0,
            divergences,
        };
        let ratio = comparison.divergence_ratio();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }
}
