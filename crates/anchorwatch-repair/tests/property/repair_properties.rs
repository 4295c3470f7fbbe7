use std::collections::BTreeMap;

use anchorwatch_core::models::{
    AnchorId, AuthorizationDecision, Comparison, RejectionReason, RepairDraft, RepairStatus,
    RepairType, TelemetryFields,
};
use anchorwatch_repair::{KeyedHashSigner, RepairLedger};
use chrono::Utc;
use proptest::prelude::*;
use test_fixtures::{RecordingBackend, ScriptedAuthority};

#[derive(Debug, Clone)]
enum Op {
    Stage(u8),
    Poll(u8, u8),
    Execute(u8, bool),
    Reject(u8),
    Expire(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Stage),
        (0u8..4, 0u8..3).prop_map(|(a, d)| Op::Poll(a, d)),
        (0u8..4, any::<bool>()).prop_map(|(a, k)| Op::Execute(a, k)),
        (0u8..4).prop_map(Op::Reject),
        (0u64..30).prop_map(Op::Expire),
    ]
}

// ── No repair reaches EXECUTED without STAGED → AUTHORIZED first ──────────

proptest! {
    #[test]
    fn executed_only_after_authorization(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let signer = KeyedHashSigner::derive("property");
        let wrong = KeyedHashSigner::derive("wrong");
        let backend = RecordingBackend::new();
        let granting = ScriptedAuthority::granting("ops");
        let pending = ScriptedAuthority::pending();
        let denying = ScriptedAuthority::pending();
        denying.set_default(AuthorizationDecision::Denied {
            authority: "ops".into(),
            reason: "no".into(),
        });
        let mut ledger = RepairLedger::new(5);
        let anchor = |n: u8| AnchorId::new(format!("anchor-{n}"));

        for (cycle, op) in ops.into_iter().enumerate() {
            let now = Utc::now();
            match op {
                Op::Stage(a) => {
                    let draft = RepairDraft::new(
                        anchor(a),
                        RepairType::PolicyReassert,
                        TelemetryFields::new(),
                        cycle as u64,
                        "three_way_match",
                    );
                    let pre = Comparison::reality_unavailable(anchor(a), TelemetryFields::new(), BTreeMap::new());
                    let _ = ledger.stage(draft, pre, &signer, now);
                }
                Op::Poll(a, d) => {
                    if let Some(id) = ledger.open_for(&anchor(a)) {
                        let authority = match d { 0 => &granting, 1 => &pending, _ => &denying };
                        let _ = ledger.poll_authority(id, authority, now);
                    }
                }
                Op::Execute(a, right_key) => {
                    if let Some(id) = ledger.open_for(&anchor(a)) {
                        let key = if right_key { &signer } else { &wrong };
                        let _ = ledger.execute(id, key, &backend, now);
                    }
                }
                Op::Reject(a) => {
                    if let Some(id) = ledger.open_for(&anchor(a)) {
                        let _ = ledger.reject(id, RejectionReason::Expired, now);
                    }
                }
                Op::Expire(c) => {
                    ledger.expire(c, now);
                }
            }

            for repair in ledger.repairs() {
                if repair.status() == RepairStatus::Executed {
                    prop_assert!(repair.authorized_before_execution());
                }
                for t in repair.history() {
                    prop_assert!(t.from.can_transition_to(t.to));
                    prop_assert!(!(t.from == RepairStatus::Staged && t.to == RepairStatus::Executed));
                }
            }
            // At most one open repair per anchor.
            for a in 0u8..4 {
                let open = ledger
                    .repairs()
                    .filter(|r| r.anchor_id == anchor(a) && r.status().is_open())
                    .count();
                prop_assert!(open <= 1);
            }
        }

        for applied in backend.applied() {
            prop_assert_eq!(applied.status(), RepairStatus::Authorized);
        }
    }
}
