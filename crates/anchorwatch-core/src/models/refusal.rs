//! Reason codes for refusals and rejections. Every non-execution decision
//! is explainable by one of these.

use std::fmt;

use serde::{Deserialize, Serialize};

/// External collaborators the loop depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    AnchorSource,
    TelemetryCollector,
    SigningService,
    AuthoritySource,
    ExecutionBackend,
    CheckpointSink,
}

impl Collaborator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnchorSource => "anchor_source",
            Self::TelemetryCollector => "telemetry_collector",
            Self::SigningService => "signing_service",
            Self::AuthoritySource => "authority_source",
            Self::ExecutionBackend => "execution_backend",
            Self::CheckpointSink => "checkpoint_sink",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expected, non-fatal decision not to proceed. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RefusalReason {
    BudgetExhausted,
    LowConfidence,
    AuthorityPending,
    ExecutionDisabled,
    CollaboratorUnavailable { collaborator: Collaborator },
}

impl RefusalReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BudgetExhausted => "budget_exhausted",
            Self::LowConfidence => "low_confidence",
            Self::AuthorityPending => "authority_pending",
            Self::ExecutionDisabled => "execution_disabled",
            Self::CollaboratorUnavailable { .. } => "collaborator_unavailable",
        }
    }
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollaboratorUnavailable { collaborator } => {
                write!(f, "{} ({})", self.code(), collaborator)
            }
            _ => f.write_str(self.code()),
        }
    }
}

/// Why a repair reached the terminal REJECTED state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    InvalidSignature,
    AuthorityDenied { authority: String, reason: String },
    ExecutionFailed { detail: String },
    Expired,
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::AuthorityDenied { .. } => "authority_denied",
            Self::ExecutionFailed { .. } => "execution_failed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
