//! Aggregate health report generation.

use anchorwatch_core::models::{Collaborator, KpiValue};
use serde::{Deserialize, Serialize};

use super::subsystem_checks::{HealthStatus, SubsystemChecker, SubsystemHealth};
use crate::degradation::DegradationTracker;
use crate::kpi::{names, KpiRegistry};

/// Inputs to the subsystem checks.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub cycles_recorded: u64,
    pub budget_refusal_rate: f64,
    pub degraded_collaborators: Vec<Collaborator>,
    pub checkpoint_compromised: bool,
    pub average_confidence: f64,
    pub confidence_floor: f64,
    pub indeterminate_rate: f64,
}

impl HealthSnapshot {
    pub fn capture(kpis: &KpiRegistry, degradations: &DegradationTracker) -> Self {
        let current = |name: &str| kpis.get(name).map(|k| k.current).unwrap_or(0.0);
        let floor = kpis
            .get(names::AVERAGE_CONFIDENCE)
            .map(|k| k.target)
            .unwrap_or(0.0);
        Self {
            cycles_recorded: kpis.cycles_recorded(),
            budget_refusal_rate: kpis.budget_refusal_rate(),
            degraded_collaborators: degradations.active_collaborators(),
            checkpoint_compromised: !kpis.checkpoint_intact(),
            average_confidence: current(names::AVERAGE_CONFIDENCE),
            confidence_floor: floor,
            indeterminate_rate: current(names::INDETERMINATE_RATE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub subsystems: Vec<SubsystemHealth>,
    pub kpis: Vec<KpiValue>,
}

pub struct HealthReporter;

impl HealthReporter {
    /// Build a report from the live registry and tracker.
    pub fn report(kpis: &KpiRegistry, degradations: &DegradationTracker) -> HealthReport {
        let snapshot = HealthSnapshot::capture(kpis, degradations);
        HealthReport {
            kpis: kpis.snapshot(),
            ..Self::build(&snapshot)
        }
    }

    pub fn build(snapshot: &HealthSnapshot) -> HealthReport {
        let subsystems = SubsystemChecker::check_all(snapshot);
        HealthReport {
            overall_status: Self::derive_overall(&subsystems),
            subsystems,
            kpis: Vec::new(),
        }
    }

    /// Worst subsystem status wins.
    fn derive_overall(subsystems: &[SubsystemHealth]) -> HealthStatus {
        subsystems
            .iter()
            .map(|s| s.status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }
}
