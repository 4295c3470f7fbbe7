use anchorwatch_core::config::EffectivenessConfig;
use anchorwatch_core::models::RepairType;
use anchorwatch_core::traits::IPolicyGovernance;
use anchorwatch_learning::{EffectivenessTracker, ProposalLog};
use proptest::prelude::*;
use uuid::Uuid;

// ── Proposals only when the trusted average is below threshold ────────────

proptest! {
    #[test]
    fn proposals_require_low_trusted_average(
        scores in prop::collection::vec(0.0f64..=1.0, 1..100),
        window in 1usize..30,
        threshold in 0.05f64..0.95,
    ) {
        let min_samples = window.min(5);
        let mut tracker = EffectivenessTracker::new(EffectivenessConfig {
            window,
            threshold,
            min_samples,
        });
        let mut log = ProposalLog::new();
        let mut latched = false;

        for score in scores {
            let outcome = tracker
                .record_outcome(Uuid::new_v4(), RepairType::ConfigRestore, score, &mut log)
                .unwrap();
            prop_assert!(outcome.samples <= window);
            prop_assert!((0.0..=1.0).contains(&outcome.rolling_average));
            if let Some(record) = &outcome.proposal {
                prop_assert!(!latched, "proposed twice without recovery");
                prop_assert!(outcome.rolling_average < threshold);
                prop_assert!(outcome.samples >= min_samples);
                prop_assert_eq!(record.evidence.samples, outcome.samples);
                latched = true;
            }
            if outcome.rolling_average >= threshold {
                latched = false;
            }
            prop_assert_eq!(tracker.is_latched(RepairType::ConfigRestore), latched);
        }
        prop_assert!(log.proposals().len() <= 100);
    }
}
