//! Structured log events for the decisions an operator audits.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use std::fmt::Display;

use anchorwatch_core::models::{Collaborator, RefusalReason, RejectionReason};

/// Log a completed cycle.
pub fn cycle_completed(cycle: u64, evaluated: u64, incoherent: u64, indeterminate: u64, duration_ms: u64) {
    tracing::info!(
        event = "cycle_completed",
        cycle,
        evaluated,
        incoherent,
        indeterminate,
        duration_ms,
        "cycle completed"
    );
}

/// Log a whole-cycle refusal.
pub fn cycle_refused(cycle: u64, reason: &RefusalReason, backoff_ms: u64) {
    tracing::info!(
        event = "refusal",
        scope = "cycle",
        cycle,
        reason = reason.code(),
        detail = %reason,
        backoff_ms,
        "cycle refused"
    );
}

/// Log a per-anchor refusal (low confidence, authority pending, execution disabled).
pub fn anchor_refused(anchor_id: &impl Display, reason: &RefusalReason) {
    tracing::debug!(
        event = "refusal",
        scope = "anchor",
        anchor_id = %anchor_id,
        reason = reason.code(),
        "anchor refused"
    );
}

/// Log a staged repair.
pub fn repair_staged(repair_id: &impl Display, anchor_id: &impl Display, repair_type: &impl Display) {
    tracing::info!(
        event = "repair_staged",
        repair_id = %repair_id,
        anchor_id = %anchor_id,
        repair_type = %repair_type,
        "repair staged, awaiting authorization"
    );
}

/// Log an executed repair.
pub fn repair_executed(repair_id: &impl Display, anchor_id: &impl Display, effectiveness: f64) {
    tracing::info!(
        event = "repair_executed",
        repair_id = %repair_id,
        anchor_id = %anchor_id,
        effectiveness,
        "repair executed"
    );
}

/// Log a repair reaching REJECTED.
pub fn repair_rejected(repair_id: &impl Display, anchor_id: &impl Display, reason: &RejectionReason) {
    tracing::warn!(
        event = "repair_rejected",
        repair_id = %repair_id,
        anchor_id = %anchor_id,
        reason = reason.code(),
        "repair rejected"
    );
}

/// Log a broken checkpoint chain. Deliberately loud.
pub fn integrity_failure(first_broken: Option<u64>, broken: usize, gaps: usize, truncated: bool) {
    tracing::error!(
        event = "integrity_failure",
        first_broken = ?first_broken,
        broken,
        gaps,
        truncated,
        "CHECKPOINT CHAIN INTEGRITY FAILURE: log is compromised until reconciled"
    );
}

/// Log an advisory policy proposal.
pub fn proposal_emitted(proposal_id: &impl Display, repair_type: &impl Display, rolling_average: f64) {
    tracing::warn!(
        event = "proposal_emitted",
        proposal_id = %proposal_id,
        repair_type = %repair_type,
        rolling_average,
        "repair type below effectiveness threshold, policy review proposed"
    );
}

/// Log a request for more telemetry after an indeterminate result.
pub fn telemetry_requested(anchor_id: &impl Display, fields: &[String], confidence: f64) {
    tracing::info!(
        event = "telemetry_requested",
        anchor_id = %anchor_id,
        fields = ?fields,
        confidence,
        "indeterminate result, requesting telemetry"
    );
}

/// Log a collaborator entering degraded mode.
pub fn degradation_triggered(collaborator: Collaborator, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        collaborator = %collaborator,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a collaborator recovering.
pub fn degradation_recovered(collaborator: Collaborator, degraded_ms: i64) {
    tracing::info!(
        event = "degradation_recovered",
        collaborator = %collaborator,
        degraded_ms,
        "collaborator recovered"
    );
}
