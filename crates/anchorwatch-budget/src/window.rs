//! [`PressureBudget`]: sliding-window work log.

use std::collections::VecDeque;
use std::time::Duration;

use anchorwatch_core::config::BudgetConfig;
use anchorwatch_core::errors::BudgetError;
use anchorwatch_core::models::{Admission, RefusalReason};
use anchorwatch_core::traits::IAdmissionControl;
use tokio::time::Instant;

/// Token-bucket-like counter over a rolling window.
///
/// Invariant: the units recorded within any window-length interval never
/// exceed `units_per_window`. `record_work` refuses to record past the limit,
/// so the invariant holds regardless of caller behavior.
#[derive(Debug)]
pub struct PressureBudget {
    units_per_window: u64,
    window: Duration,
    entries: VecDeque<(Instant, u64)>,
    used: u64,
    refusals: u64,
}

impl PressureBudget {
    pub fn new(units_per_window: u64, window: Duration) -> Result<Self, BudgetError> {
        if units_per_window == 0 {
            return Err(BudgetError::InvalidConfig {
                reason: "units_per_window must be greater than 0".to_string(),
            });
        }
        if window.is_zero() {
            return Err(BudgetError::InvalidConfig {
                reason: "window must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            units_per_window,
            window,
            entries: VecDeque::new(),
            used: 0,
            refusals: 0,
        })
    }

    pub fn from_config(config: &BudgetConfig) -> Result<Self, BudgetError> {
        Self::new(
            config.units_per_window,
            Duration::from_millis(config.window_ms),
        )
    }

    pub fn units_per_window(&self) -> u64 {
        self.units_per_window
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Units recorded inside the window ending at `now`.
    pub fn used_units_at(&mut self, now: Instant) -> u64 {
        self.evict(now);
        self.used
    }

    pub fn remaining_units_at(&mut self, now: Instant) -> u64 {
        self.evict(now);
        self.units_per_window.saturating_sub(self.used)
    }

    pub fn can_proceed_at(&mut self, now: Instant) -> Admission {
        self.evict(now);
        if self.used < self.units_per_window {
            return Admission::Allowed {
                remaining_units: self.units_per_window - self.used,
            };
        }

        self.refusals += 1;
        let backoff = self.backoff_at(now);
        tracing::debug!(
            event = "budget_refused",
            used = self.used,
            budget = self.units_per_window,
            backoff_ms = backoff.as_millis() as u64,
            "pressure budget exhausted"
        );
        Admission::Refused {
            reason: RefusalReason::BudgetExhausted,
            backoff,
        }
    }

    pub fn record_work_at(&mut self, units: u64, now: Instant) -> Result<(), BudgetError> {
        self.evict(now);
        if units == 0 {
            return Ok(());
        }
        let remaining = self.units_per_window.saturating_sub(self.used);
        if units > remaining {
            return Err(BudgetError::WouldExceed {
                requested: units,
                remaining,
            });
        }
        self.entries.push_back((now, units));
        self.used += units;
        Ok(())
    }

    /// Drop entries that have left the window.
    fn evict(&mut self, now: Instant) {
        while let Some(&(at, units)) = self.entries.front() {
            if at + self.window <= now {
                self.entries.pop_front();
                self.used -= units;
            } else {
                break;
            }
        }
    }

    /// Time until enough recorded work expires for `used` to drop below the
    /// budget. Only meaningful when the window is full.
    fn backoff_at(&self, now: Instant) -> Duration {
        let mut used = self.used;
        for &(at, units) in &self.entries {
            used -= units;
            if used < self.units_per_window {
                let expires = at + self.window;
                return expires
                    .saturating_duration_since(now)
                    .max(Duration::from_millis(1));
            }
        }
        // Unreachable while used >= units_per_window > 0, but never return zero.
        self.window
    }
}

impl IAdmissionControl for PressureBudget {
    fn can_proceed(&mut self) -> Admission {
        self.can_proceed_at(Instant::now())
    }

    fn record_work(&mut self, units: u64) -> Result<(), BudgetError> {
        self.record_work_at(units, Instant::now())
    }

    fn refusals(&self) -> u64 {
        self.refusals
    }
}
