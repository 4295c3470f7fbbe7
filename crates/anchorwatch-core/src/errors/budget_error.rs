use super::error_code::{self, AnchorwatchErrorCode};

/// Pressure budget errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetError {
    #[error("recording {requested} units would exceed the window budget ({remaining} remaining)")]
    WouldExceed { requested: u64, remaining: u64 },

    #[error("invalid budget configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl AnchorwatchErrorCode for BudgetError {
    fn error_code(&self) -> &'static str {
        error_code::BUDGET_ERROR
    }
}
