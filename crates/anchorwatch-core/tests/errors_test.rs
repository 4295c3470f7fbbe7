use anchorwatch_core::errors::*;
use anchorwatch_core::models::{Collaborator, RefusalReason, RejectionReason};

#[test]
fn subsystem_errors_convert_into_top_level() {
    let err: AnchorwatchError = BudgetError::WouldExceed {
        requested: 10,
        remaining: 2,
    }
    .into();
    assert_eq!(err.error_code(), "BUDGET_ERROR");

    let err: AnchorwatchError =
        CollaboratorError::unavailable(Collaborator::AnchorSource, "connection refused").into();
    assert_eq!(err.error_code(), "COLLABORATOR_UNAVAILABLE");
    assert!(err.to_string().contains("anchor_source"));
}

#[test]
fn integrity_errors_have_their_own_code() {
    let err = CheckpointError::Integrity {
        sequence: 4,
        reason: "hash mismatch".into(),
    };
    assert_eq!(err.error_code(), "INTEGRITY_ERROR");
}

#[test]
fn signing_unavailability_is_a_collaborator_failure() {
    let err = SigningError::Unavailable {
        reason: "hsm offline".into(),
    };
    assert_eq!(err.error_code(), "COLLABORATOR_UNAVAILABLE");
    let err: AnchorwatchError = RepairError::Signing(err).into();
    assert_eq!(err.error_code(), "COLLABORATOR_UNAVAILABLE");
}

#[test]
fn every_refusal_and_rejection_has_a_reason_code() {
    let refusals = [
        RefusalReason::BudgetExhausted,
        RefusalReason::LowConfidence,
        RefusalReason::AuthorityPending,
        RefusalReason::ExecutionDisabled,
        RefusalReason::CollaboratorUnavailable {
            collaborator: Collaborator::ExecutionBackend,
        },
    ];
    for r in &refusals {
        assert!(!r.code().is_empty());
    }

    assert_eq!(RejectionReason::InvalidSignature.code(), "invalid_signature");
    assert_eq!(RejectionReason::Expired.code(), "expired");
}

#[test]
fn refusal_serializes_with_code_tag() {
    let json = serde_json::to_value(RefusalReason::BudgetExhausted).unwrap();
    assert_eq!(json["code"], "budget_exhausted");
}

#[test]
fn governance_error_converts_with_code() {
    let err: AnchorwatchError = GovernanceError::EmptyEvidence.into();
    assert_eq!(err.error_code(), "GOVERNANCE_ERROR");
}
