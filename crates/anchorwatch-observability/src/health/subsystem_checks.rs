//! Per-subsystem health checks: budget, collaborators, checkpoint, confidence.
//! Each returns healthy | degraded | unhealthy.

use anchorwatch_core::models::Collaborator;
use serde::{Deserialize, Serialize};

use super::reporter::HealthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

impl SubsystemHealth {
    fn new(name: &str, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message,
        }
    }
}

/// Collaborators without which no cycle can complete.
const CYCLE_CRITICAL: &[Collaborator] = &[Collaborator::AnchorSource, Collaborator::CheckpointSink];

pub struct SubsystemChecker;

impl SubsystemChecker {
    pub fn check_all(snapshot: &HealthSnapshot) -> Vec<SubsystemHealth> {
        vec![
            Self::check_budget(snapshot),
            Self::check_collaborators(snapshot),
            Self::check_checkpoint(snapshot),
            Self::check_confidence(snapshot),
        ]
    }

    /// Budget: degraded if any windowed cycle was refused, unhealthy if half were.
    fn check_budget(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let rate = snapshot.budget_refusal_rate;
        let (status, message) = if rate >= 0.5 {
            (
                HealthStatus::Unhealthy,
                Some(format!("{:.0}% of recent cycles refused for budget", rate * 100.0)),
            )
        } else if rate > 0.0 {
            (
                HealthStatus::Degraded,
                Some(format!("{:.0}% of recent cycles refused for budget", rate * 100.0)),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        SubsystemHealth::new("budget", status, message)
    }

    /// Collaborators: unhealthy if the anchor source or checkpoint sink is
    /// down, degraded if any other collaborator is.
    fn check_collaborators(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let down = &snapshot.degraded_collaborators;
        if down.is_empty() {
            return SubsystemHealth::new("collaborators", HealthStatus::Healthy, None);
        }
        let names: Vec<&str> = down.iter().map(|c| c.as_str()).collect();
        let status = if down.iter().any(|c| CYCLE_CRITICAL.contains(c)) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };
        SubsystemHealth::new(
            "collaborators",
            status,
            Some(format!("unavailable: {}", names.join(", "))),
        )
    }

    /// Checkpoint: unhealthy while the chain is compromised.
    fn check_checkpoint(snapshot: &HealthSnapshot) -> SubsystemHealth {
        if snapshot.checkpoint_compromised {
            SubsystemHealth::new(
                "checkpoint",
                HealthStatus::Unhealthy,
                Some("checkpoint chain compromised, reconciliation required".into()),
            )
        } else {
            SubsystemHealth::new("checkpoint", HealthStatus::Healthy, None)
        }
    }

    /// Confidence: degraded below the floor, unhealthy when most results
    /// are indeterminate.
    fn check_confidence(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = if snapshot.indeterminate_rate > 0.5 {
            (
                HealthStatus::Unhealthy,
                Some(format!(
                    "{:.0}% of results indeterminate",
                    snapshot.indeterminate_rate * 100.0
                )),
            )
        } else if snapshot.cycles_recorded > 0 && snapshot.average_confidence < snapshot.confidence_floor {
            (
                HealthStatus::Degraded,
                Some(format!(
                    "average confidence {:.2} below floor {:.2}",
                    snapshot.average_confidence, snapshot.confidence_floor
                )),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        SubsystemHealth::new("confidence", status, message)
    }
}
