use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::refusal::RefusalReason;

/// Answer of the pressure budget to "may the next cycle proceed?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Admission {
    Allowed { remaining_units: u64 },
    /// A refusal, not an error: the caller sleeps `backoff` and retries.
    Refused {
        reason: RefusalReason,
        backoff: Duration,
    },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    pub fn backoff(&self) -> Option<Duration> {
        match self {
            Self::Refused { backoff, .. } => Some(*backoff),
            Self::Allowed { .. } => None,
        }
    }
}
