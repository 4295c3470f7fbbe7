use std::sync::atomic::{AtomicUsize, Ordering};

use anchorwatch_core::config::EffectivenessConfig;
use anchorwatch_core::errors::GovernanceError;
use anchorwatch_core::models::{
    PolicyTarget, ProposalEvidence, ProposalRecord, ProposedChange, RepairType,
};
use anchorwatch_core::traits::IPolicyGovernance;
use anchorwatch_learning::{EffectivenessTracker, ProposalLog};
use uuid::Uuid;

/// Governance double that counts calls.
#[derive(Default)]
struct CountingGovernance {
    inner: ProposalLog,
    calls: AtomicUsize,
}

impl IPolicyGovernance for CountingGovernance {
    fn propose_change(
        &mut self,
        target: PolicyTarget,
        change: ProposedChange,
        evidence: ProposalEvidence,
    ) -> Result<ProposalRecord, GovernanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.propose_change(target, change, evidence)
    }

    fn proposals(&self) -> Vec<ProposalRecord> {
        self.inner.proposals()
    }
}

#[test]
fn identical_no_improvement_outcomes_propose_exactly_once() {
    let mut tracker = EffectivenessTracker::default();
    let mut governance = CountingGovernance::default();

    for _ in 0..50 {
        tracker
            .record_outcome(Uuid::new_v4(), RepairType::ConfigRestore, 0.0, &mut governance)
            .unwrap();
    }

    assert_eq!(governance.calls.load(Ordering::SeqCst), 1);
    let proposals = governance.proposals();
    assert_eq!(proposals.len(), 1);
    assert_eq!(
        proposals[0].target,
        PolicyTarget::RepairType(RepairType::ConfigRestore)
    );
    assert_eq!(proposals[0].evidence.samples, 5);
    assert!(tracker.rolling_average(RepairType::ConfigRestore).unwrap() < 0.5);
}

#[test]
fn no_proposal_before_min_samples() {
    let mut tracker = EffectivenessTracker::default();
    let mut governance = ProposalLog::new();
    for _ in 0..4 {
        let outcome = tracker
            .record_outcome(Uuid::new_v4(), RepairType::PermissionRevoke, 0.0, &mut governance)
            .unwrap();
        assert!(outcome.proposal.is_none());
    }
    assert!(governance.is_empty());
}

#[test]
fn recovery_rearms_the_latch() {
    let config = EffectivenessConfig {
        window: 4,
        threshold: 0.5,
        min_samples: 2,
    };
    let mut tracker = EffectivenessTracker::new(config);
    let mut governance = ProposalLog::new();
    let mut record = |score: f64, gov: &mut ProposalLog| {
        tracker
            .record_outcome(Uuid::new_v4(), RepairType::PolicyReassert, score, gov)
            .unwrap()
    };

    record(0.0, &mut governance);
    assert!(record(0.0, &mut governance).proposal.is_some());
    // Recover: window fills with successes.
    for _ in 0..4 {
        record(1.0, &mut governance);
    }
    // Degrade again: average drops below threshold once more.
    for _ in 0..3 {
        record(0.0, &mut governance);
    }
    assert_eq!(governance.len(), 2);
}

#[test]
fn types_are_tracked_independently() {
    let mut tracker = EffectivenessTracker::default();
    let mut governance = ProposalLog::new();
    for _ in 0..5 {
        tracker
            .record_outcome(Uuid::new_v4(), RepairType::ConfigRestore, 0.0, &mut governance)
            .unwrap();
        tracker
            .record_outcome(Uuid::new_v4(), RepairType::PermissionRevoke, 1.0, &mut governance)
            .unwrap();
    }
    assert!(tracker.is_latched(RepairType::ConfigRestore));
    assert!(!tracker.is_latched(RepairType::PermissionRevoke));
    assert_eq!(governance.len(), 1);
    assert_eq!(tracker.overall_average(), Some(0.5));
}

#[test]
fn journal_appends_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proposals.jsonl");
    let mut log = ProposalLog::with_journal(&path);
    let mut tracker = EffectivenessTracker::default();
    for _ in 0..5 {
        tracker
            .record_outcome(Uuid::new_v4(), RepairType::ConfigRestore, 0.0, &mut log)
            .unwrap();
    }
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    let parsed: ProposalRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(parsed.evidence.samples, 5);
}
