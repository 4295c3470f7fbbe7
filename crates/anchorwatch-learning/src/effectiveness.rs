//! Rolling per-repair-type effectiveness.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use anchorwatch_core::config::EffectivenessConfig;
use anchorwatch_core::errors::GovernanceError;
use anchorwatch_core::models::{
    Comparison, PolicyTarget, ProposalEvidence, ProposalRecord, ProposedChange, RepairType,
};
use anchorwatch_core::traits::IPolicyGovernance;
use uuid::Uuid;

/// Relative reduction in divergence between the pre- and post-repair
/// comparisons, in [0, 1]. A coherent post-state scores 1.0.
pub fn effectiveness_score(pre: &Comparison, post: &Comparison) -> f64 {
    if post.coherent {
        return 1.0;
    }
    let before = pre.divergence_ratio();
    if before <= 0.0 {
        return 0.0;
    }
    ((before - post.divergence_ratio()) / before).clamp(0.0, 1.0)
}

/// What tracking one outcome produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOutcome {
    pub repair_type: RepairType,
    pub score: f64,
    pub rolling_average: f64,
    pub samples: usize,
    pub proposal: Option<ProposalRecord>,
}

#[derive(Debug)]
pub struct EffectivenessTracker {
    config: EffectivenessConfig,
    windows: BTreeMap<RepairType, VecDeque<(Uuid, f64)>>,
    /// Types that already proposed and have not recovered since.
    latched: BTreeSet<RepairType>,
}

impl Default for EffectivenessTracker {
    fn default() -> Self {
        Self::new(EffectivenessConfig::default())
    }
}

impl EffectivenessTracker {
    pub fn new(config: EffectivenessConfig) -> Self {
        Self {
            config,
            windows: BTreeMap::new(),
            latched: BTreeSet::new(),
        }
    }

    /// Score an executed repair and forward a proposal to governance when
    /// its type's rolling average falls below the threshold.
    pub fn track_repair(
        &mut self,
        repair_id: Uuid,
        repair_type: RepairType,
        pre: &Comparison,
        post: &Comparison,
        governance: &mut dyn IPolicyGovernance,
    ) -> Result<TrackOutcome, GovernanceError> {
        let score = effectiveness_score(pre, post);
        self.record_outcome(repair_id, repair_type, score, governance)
    }

    pub fn record_outcome(
        &mut self,
        repair_id: Uuid,
        repair_type: RepairType,
        score: f64,
        governance: &mut dyn IPolicyGovernance,
    ) -> Result<TrackOutcome, GovernanceError> {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let window = self.windows.entry(repair_type).or_default();
        window.push_back((repair_id, score));
        while window.len() > self.config.window {
            window.pop_front();
        }
        let samples = window.len();
        let rolling_average = window.iter().map(|(_, s)| s).sum::<f64>() / samples as f64;
        let repair_ids: Vec<Uuid> = window.iter().map(|(id, _)| *id).collect();

        let mut outcome = TrackOutcome {
            repair_type,
            score,
            rolling_average,
            samples,
            proposal: None,
        };

        if rolling_average >= self.config.threshold {
            if self.latched.remove(&repair_type) {
                tracing::info!(repair_type = %repair_type, rolling_average, "repair type effectiveness recovered");
            }
            return Ok(outcome);
        }
        if samples < self.config.min_samples || self.latched.contains(&repair_type) {
            return Ok(outcome);
        }

        let record = governance.propose_change(
            PolicyTarget::RepairType(repair_type),
            ProposedChange::ReviewRepairType {
                repair_type,
                rolling_average,
                threshold: self.config.threshold,
            },
            ProposalEvidence {
                samples,
                rolling_average,
                window: self.config.window,
                repair_ids,
            },
        )?;
        self.latched.insert(repair_type);
        tracing::debug!(
            proposal_id = %record.id,
            repair_type = %repair_type,
            rolling_average,
            "repair type below effectiveness threshold, policy review proposed"
        );
        outcome.proposal = Some(record);
        Ok(outcome)
    }

    pub fn rolling_average(&self, repair_type: RepairType) -> Option<f64> {
        let window = self.windows.get(&repair_type)?;
        if window.is_empty() {
            return None;
        }
        Some(window.iter().map(|(_, s)| s).sum::<f64>() / window.len() as f64)
    }

    pub fn samples(&self, repair_type: RepairType) -> usize {
        self.windows.get(&repair_type).map_or(0, VecDeque::len)
    }

    /// Mean over every retained outcome of every type.
    pub fn overall_average(&self) -> Option<f64> {
        let (sum, n) = self
            .windows
            .values()
            .flatten()
            .fold((0.0, 0usize), |(sum, n), (_, s)| (sum + s, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    pub fn is_latched(&self, repair_type: RepairType) -> bool {
        self.latched.contains(&repair_type)
    }
}
