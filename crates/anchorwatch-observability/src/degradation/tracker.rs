//! Record every collaborator outage: who failed, how, what the loop did
//! instead, when, and whether it has recovered.

use std::collections::VecDeque;

use anchorwatch_core::constants::MAX_DEGRADATION_HISTORY;
use anchorwatch_core::models::Collaborator;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One observed collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub collaborator: Collaborator,
    pub failure: String,
    /// What the loop did instead, e.g. "refuse cycle" or "reality unavailable".
    pub fallback: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    /// First failure of this outage.
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
    /// Failures folded into this outage, the first included.
    pub occurrences: u64,
    pub last_failure_at: DateTime<Utc>,
}

/// Tracks degradations for health reporting.
///
/// Holds at most one active outage per collaborator; repeated failures
/// while degraded only bump its counter. Recovered outages are kept up to
/// `history_limit`, oldest dropped first.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    active: Vec<TrackedDegradation>,
    recovered: VecDeque<TrackedDegradation>,
    history_limit: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_history_limit(MAX_DEGRADATION_HISTORY)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            active: Vec::new(),
            recovered: VecDeque::new(),
            history_limit,
        }
    }

    /// Record a failure. Only the transition into degraded mode is logged;
    /// repeated failures while already degraded are counted quietly.
    pub fn record(&mut self, event: DegradationEvent) {
        if let Some(tracked) = self
            .active
            .iter_mut()
            .find(|t| t.event.collaborator == event.collaborator)
        {
            tracked.occurrences += 1;
            tracked.last_failure_at = tracked.last_failure_at.max(event.timestamp);
            return;
        }
        crate::tracing_setup::events::degradation_triggered(
            event.collaborator,
            &event.failure,
            &event.fallback,
        );
        self.active.push(TrackedDegradation {
            last_failure_at: event.timestamp,
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
            occurrences: 1,
        });
    }

    /// Mark the active degradation of `collaborator` recovered.
    /// Returns false if it was not degraded.
    pub fn mark_recovered(&mut self, collaborator: Collaborator, at: DateTime<Utc>) -> bool {
        let Some(index) = self
            .active
            .iter()
            .position(|t| t.event.collaborator == collaborator)
        else {
            return false;
        };
        let mut tracked = self.active.remove(index);
        crate::tracing_setup::events::degradation_recovered(
            collaborator,
            (at - tracked.event.timestamp).num_milliseconds(),
        );
        tracked.recovery_status = RecoveryStatus::Recovered;
        tracked.recovered_at = Some(at);
        self.recovered.push_back(tracked);
        while self.recovered.len() > self.history_limit {
            self.recovered.pop_front();
        }
        true
    }

    pub fn is_degraded(&self, collaborator: Collaborator) -> bool {
        self.active.iter().any(|t| t.event.collaborator == collaborator)
    }

    /// Retained recovered outages, oldest first, then the active ones.
    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> {
        self.recovered.iter().chain(self.active.iter())
    }

    pub fn active(&self) -> &[TrackedDegradation] {
        &self.active
    }

    /// Collaborators currently degraded, in first-failure order.
    pub fn active_collaborators(&self) -> Vec<Collaborator> {
        self.active.iter().map(|t| t.event.collaborator).collect()
    }

    /// How long `collaborator` has been continuously degraded, if it is.
    pub fn degraded_duration(&self, collaborator: Collaborator, now: DateTime<Utc>) -> Option<Duration> {
        self.active
            .iter()
            .find(|t| t.event.collaborator == collaborator)
            .map(|t| now - t.event.timestamp)
    }
}
