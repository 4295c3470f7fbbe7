use std::collections::VecDeque;

use anchorwatch_core::config::defaults;
use anchorwatch_core::models::{KpiDirection, KpiValue, RefusalReason};
use anchorwatch_core::AnchorwatchConfig;
use serde::{Deserialize, Serialize};

use super::names;

/// What one cycle contributed to the KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleSample {
    /// Set when the whole cycle was refused; counts are then zero.
    pub refusal: Option<RefusalReason>,
    pub anchors_evaluated: u64,
    pub incoherent: u64,
    pub indeterminate: u64,
    /// Mean sensor confidence over the cycle's anchors, if any were evaluated.
    pub average_confidence: Option<f64>,
    pub repairs_staged: u64,
    pub repairs_executed: u64,
    pub repairs_rejected: u64,
    /// Mean effectiveness of repairs executed this cycle.
    pub effectiveness: Option<f64>,
}

impl CycleSample {
    pub fn refused(reason: RefusalReason) -> Self {
        Self {
            refusal: Some(reason),
            ..Default::default()
        }
    }
}

/// Target per KPI. On-target means `current >= target` for
/// higher-is-better KPIs and `current <= target` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiTargets {
    pub throughput: f64,
    pub drift_rate: f64,
    pub average_confidence: f64,
    pub indeterminate_rate: f64,
    pub budget_refusals: f64,
    pub repairs_staged: f64,
    pub repairs_executed: f64,
    pub repairs_rejected: f64,
    pub repair_effectiveness: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            throughput: defaults::DEFAULT_TARGET_THROUGHPUT,
            drift_rate: defaults::DEFAULT_TARGET_DRIFT_RATE,
            average_confidence: defaults::DEFAULT_CONFIDENCE_FLOOR,
            indeterminate_rate: defaults::DEFAULT_TARGET_INDETERMINATE_RATE,
            budget_refusals: defaults::DEFAULT_TARGET_BUDGET_REFUSALS,
            repairs_staged: defaults::DEFAULT_TARGET_REPAIRS_STAGED,
            repairs_executed: defaults::DEFAULT_TARGET_REPAIRS_EXECUTED,
            repairs_rejected: defaults::DEFAULT_TARGET_REPAIRS_REJECTED,
            repair_effectiveness: defaults::DEFAULT_EFFECTIVENESS_THRESHOLD,
        }
    }
}

impl KpiTargets {
    /// Confidence and effectiveness targets follow the configured floor and threshold.
    pub fn from_config(config: &AnchorwatchConfig) -> Self {
        Self {
            average_confidence: config.confidence.floor,
            repair_effectiveness: config.effectiveness.threshold,
            ..Self::default()
        }
    }
}

/// Rolling KPI state over the last `window` cycles (completed or refused).
#[derive(Debug, Clone)]
pub struct KpiRegistry {
    window: usize,
    samples: VecDeque<CycleSample>,
    targets: KpiTargets,
    integrity: bool,
    cycles_recorded: u64,
}

impl KpiRegistry {
    pub fn new(window: usize, targets: KpiTargets) -> Self {
        Self {
            window: window.max(1),
            samples: VecDeque::new(),
            targets,
            integrity: true,
            cycles_recorded: 0,
        }
    }

    pub fn from_config(config: &AnchorwatchConfig) -> Self {
        Self::new(config.observability.kpi_window, KpiTargets::from_config(config))
    }

    /// Fold one cycle into the rolling window.
    pub fn record_cycle(&mut self, sample: CycleSample) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.cycles_recorded += 1;
    }

    pub fn set_checkpoint_integrity(&mut self, intact: bool) {
        self.integrity = intact;
    }

    pub fn checkpoint_intact(&self) -> bool {
        self.integrity
    }

    pub fn cycles_recorded(&self) -> u64 {
        self.cycles_recorded
    }

    /// Fraction of windowed cycles refused for budget.
    pub fn budget_refusal_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.budget_refusal_count() / self.samples.len() as f64
    }

    /// Current reading of one KPI by name.
    pub fn get(&self, name: &str) -> Option<KpiValue> {
        use KpiDirection::{HigherIsBetter, LowerIsBetter};
        let t = &self.targets;
        let (current, target, direction) = match name {
            names::THROUGHPUT => (
                self.mean_completed(|s| Some(s.anchors_evaluated as f64)),
                t.throughput,
                HigherIsBetter,
            ),
            names::DRIFT_RATE => (
                self.ratio(|s| s.incoherent),
                t.drift_rate,
                LowerIsBetter,
            ),
            names::AVERAGE_CONFIDENCE => (
                self.mean_completed(|s| s.average_confidence),
                t.average_confidence,
                HigherIsBetter,
            ),
            names::INDETERMINATE_RATE => (
                self.ratio(|s| s.indeterminate),
                t.indeterminate_rate,
                LowerIsBetter,
            ),
            names::BUDGET_REFUSALS => (self.budget_refusal_count(), t.budget_refusals, LowerIsBetter),
            names::REPAIRS_STAGED => (self.sum(|s| s.repairs_staged), t.repairs_staged, LowerIsBetter),
            names::REPAIRS_EXECUTED => (
                self.sum(|s| s.repairs_executed),
                t.repairs_executed,
                HigherIsBetter,
            ),
            names::REPAIRS_REJECTED => (
                self.sum(|s| s.repairs_rejected),
                t.repairs_rejected,
                LowerIsBetter,
            ),
            names::REPAIR_EFFECTIVENESS => (
                self.mean_completed(|s| s.effectiveness),
                t.repair_effectiveness,
                HigherIsBetter,
            ),
            names::CHECKPOINT_INTEGRITY => (
                if self.integrity { 1.0 } else { 0.0 },
                1.0,
                HigherIsBetter,
            ),
            _ => return None,
        };
        let on_target = match direction {
            HigherIsBetter => current >= target,
            LowerIsBetter => current <= target,
        };
        Some(KpiValue {
            name: name.to_string(),
            current,
            target,
            direction,
            on_target,
        })
    }

    /// Every KPI, in [`names::ALL`] order.
    pub fn snapshot(&self) -> Vec<KpiValue> {
        names::ALL.iter().filter_map(|n| self.get(n)).collect()
    }

    fn completed(&self) -> impl Iterator<Item = &CycleSample> {
        self.samples.iter().filter(|s| s.refusal.is_none())
    }

    fn budget_refusal_count(&self) -> f64 {
        self.samples
            .iter()
            .filter(|s| matches!(s.refusal, Some(RefusalReason::BudgetExhausted)))
            .count() as f64
    }

    fn mean_completed(&self, f: impl Fn(&CycleSample) -> Option<f64>) -> f64 {
        let values: Vec<f64> = self.completed().filter_map(f).filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Share of evaluated anchors matching `f`, over the whole window.
    fn ratio(&self, f: impl Fn(&CycleSample) -> u64) -> f64 {
        let evaluated: u64 = self.completed().map(|s| s.anchors_evaluated).sum();
        if evaluated == 0 {
            return 0.0;
        }
        self.completed().map(f).sum::<u64>() as f64 / evaluated as f64
    }

    fn sum(&self, f: impl Fn(&CycleSample) -> u64) -> f64 {
        self.samples.iter().map(f).sum::<u64>() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(evaluated: u64, incoherent: u64, confidence: f64) -> CycleSample {
        CycleSample {
            anchors_evaluated: evaluated,
            incoherent,
            average_confidence: Some(confidence),
            ..Default::default()
        }
    }

    #[test]
    fn empty_registry_reports_every_kpi() {
        let kpis = KpiRegistry::new(10, KpiTargets::default());
        let snapshot = kpis.snapshot();
        assert_eq!(snapshot.len(), names::ALL.len());
        let integrity = kpis.get(names::CHECKPOINT_INTEGRITY).unwrap();
        assert_eq!(integrity.current, 1.0);
        assert!(integrity.on_target);
    }

    #[test]
    fn drift_rate_is_weighted_by_anchors() {
        let mut kpis = KpiRegistry::new(10, KpiTargets::default());
        kpis.record_cycle(cycle(10, 1, 0.9));
        kpis.record_cycle(cycle(30, 3, 0.9));
        let drift = kpis.get(names::DRIFT_RATE).unwrap();
        assert!((drift.current - 0.1).abs() < 1e-12);
        assert!(drift.on_target);
        assert_eq!(kpis.get(names::THROUGHPUT).unwrap().current, 20.0);
    }

    #[test]
    fn window_evicts_oldest_cycle() {
        let mut kpis = KpiRegistry::new(2, KpiTargets::default());
        kpis.record_cycle(cycle(1, 1, 0.1));
        kpis.record_cycle(cycle(1, 0, 0.9));
        kpis.record_cycle(cycle(1, 0, 0.9));
        assert_eq!(kpis.get(names::DRIFT_RATE).unwrap().current, 0.0);
        assert!((kpis.get(names::AVERAGE_CONFIDENCE).unwrap().current - 0.9).abs() < 1e-12);
        assert_eq!(kpis.cycles_recorded(), 3);
    }

    #[test]
    fn refused_cycles_count_without_diluting_throughput() {
        let mut kpis = KpiRegistry::new(10, KpiTargets::default());
        kpis.record_cycle(cycle(4, 0, 0.8));
        kpis.record_cycle(CycleSample::refused(RefusalReason::BudgetExhausted));
        let refusals = kpis.get(names::BUDGET_REFUSALS).unwrap();
        assert_eq!(refusals.current, 1.0);
        assert!(!refusals.on_target);
        assert_eq!(kpis.get(names::THROUGHPUT).unwrap().current, 4.0);
        assert_eq!(kpis.budget_refusal_rate(), 0.5);
    }

    #[test]
    fn integrity_drops_to_zero_when_broken() {
        let mut kpis = KpiRegistry::new(10, KpiTargets::default());
        kpis.set_checkpoint_integrity(false);
        let integrity = kpis.get(names::CHECKPOINT_INTEGRITY).unwrap();
        assert_eq!(integrity.current, 0.0);
        assert!(!integrity.on_target);
    }

    #[test]
    fn unknown_kpi_is_none() {
        let kpis = KpiRegistry::new(10, KpiTargets::default());
        assert!(kpis.get("latency_p99").is_none());
    }
}
