use std::time::Duration;

use anchorwatch_budget::PressureBudget;
use proptest::prelude::*;
use tokio::time::Instant;

// ── Never allows once window usage reaches the budget ─────────────────────

proptest! {
    #[test]
    fn never_allows_once_window_is_full(
        budget in 1u64..200,
        requests in prop::collection::vec(0u64..50, 1..60),
    ) {
        let mut b = PressureBudget::new(budget, Duration::from_secs(60)).unwrap();
        let now = Instant::now();
        let mut recorded = 0u64;
        for units in requests {
            if b.record_work_at(units, now).is_ok() {
                recorded += units;
            }
            prop_assert!(recorded <= budget);
            let admission = b.can_proceed_at(now);
            if recorded >= budget {
                prop_assert!(!admission.is_allowed());
                prop_assert!(admission.backoff().unwrap_or_default() > Duration::ZERO);
            } else {
                prop_assert!(admission.is_allowed());
            }
        }
    }
}

// ── Any window-length interval stays within budget ────────────────────────

proptest! {
    #[test]
    fn sliding_window_sum_never_exceeds_budget(
        budget in 1u64..100,
        window_ms in 10u64..1_000,
        steps in prop::collection::vec((0u64..300, 1u64..40), 1..80),
    ) {
        let window = Duration::from_millis(window_ms);
        let mut b = PressureBudget::new(budget, window).unwrap();
        let start = Instant::now();
        let mut elapsed = Duration::ZERO;
        let mut accepted: Vec<(Duration, u64)> = Vec::new();

        for (delta_ms, units) in steps {
            elapsed += Duration::from_millis(delta_ms);
            if b.record_work_at(units, start + elapsed).is_ok() {
                accepted.push((elapsed, units));
            }
            let in_window: u64 = accepted
                .iter()
                .filter(|(at, _)| *at + window > elapsed)
                .map(|(_, u)| *u)
                .sum();
            prop_assert!(in_window <= budget, "window sum {} > budget {}", in_window, budget);
        }
    }
}
