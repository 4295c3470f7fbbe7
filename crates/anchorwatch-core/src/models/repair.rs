//! Staged corrective artifacts and their state machine.
//!
//! ```text
//! STAGED ──authorize──▶ AUTHORIZED ──mark_executed──▶ EXECUTED
//!    │                      │
//!    └──────reject──────────┴──────────▶ REJECTED
//! ```
//!
//! Status and history are private: the only way to move a repair is through
//! the transition methods, which refuse every edge not drawn above.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anchor::{AnchorId, TelemetryFields};
use super::refusal::RejectionReason;
use super::signature::Signature;
use crate::errors::RepairError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairType {
    /// Revoke grants that exceed declared permissions.
    PermissionRevoke,
    /// Restore drifted configuration keys.
    ConfigRestore,
    /// Re-assert the full declared policy.
    PolicyReassert,
}

impl RepairType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PermissionRevoke => "permission_revoke",
            Self::ConfigRestore => "config_restore",
            Self::PolicyReassert => "policy_reassert",
        }
    }
}

impl fmt::Display for RepairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Staged,
    Authorized,
    Executed,
    Rejected,
}

impl RepairStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Executed | Self::Rejected)
    }

    /// Open repairs block further staging on the same anchor.
    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(self, to: RepairStatus) -> bool {
        matches!(
            (self, to),
            (Self::Staged, Self::Authorized)
                | (Self::Staged, Self::Rejected)
                | (Self::Authorized, Self::Executed)
                | (Self::Authorized, Self::Rejected)
        )
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Staged => "STAGED",
            Self::Authorized => "AUTHORIZED",
            Self::Executed => "EXECUTED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// One recorded state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairTransition {
    pub from: RepairStatus,
    pub to: RepairStatus,
    pub at: DateTime<Utc>,
    /// Authority identity on authorization, reason code on rejection.
    pub note: Option<String>,
}

/// Everything a repair is before it is signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairDraft {
    pub id: Uuid,
    pub anchor_id: AnchorId,
    pub repair_type: RepairType,
    /// Intent values to restore, keyed by field.
    pub payload: TelemetryFields,
    pub staged_cycle: u64,
    pub source_sensor: String,
}

impl RepairDraft {
    pub fn new(
        anchor_id: AnchorId,
        repair_type: RepairType,
        payload: TelemetryFields,
        staged_cycle: u64,
        source_sensor: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor_id,
            repair_type,
            payload,
            staged_cycle,
            source_sensor: source_sensor.into(),
        }
    }

    /// Canonical bytes covered by the repair signature.
    pub fn preimage(&self) -> Result<Vec<u8>, RepairError> {
        #[derive(Serialize)]
        struct Preimage<'a> {
            id: &'a Uuid,
            anchor_id: &'a AnchorId,
            repair_type: RepairType,
            payload: &'a TelemetryFields,
            staged_cycle: u64,
        }

        serde_json::to_vec(&Preimage {
            id: &self.id,
            anchor_id: &self.anchor_id,
            repair_type: self.repair_type,
            payload: &self.payload,
            staged_cycle: self.staged_cycle,
        })
        .map_err(|e| RepairError::Serialization {
            reason: e.to_string(),
        })
    }
}

/// A signed, staged corrective artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repair {
    pub id: Uuid,
    pub anchor_id: AnchorId,
    pub repair_type: RepairType,
    pub payload: TelemetryFields,
    pub staged_cycle: u64,
    pub source_sensor: String,
    pub staged_at: DateTime<Utc>,
    pub signature: Signature,
    status: RepairStatus,
    history: Vec<RepairTransition>,
    rejection: Option<RejectionReason>,
}

impl Repair {
    /// Create a repair in the STAGED state.
    pub fn stage(draft: RepairDraft, signature: Signature, at: DateTime<Utc>) -> Self {
        Self {
            id: draft.id,
            anchor_id: draft.anchor_id,
            repair_type: draft.repair_type,
            payload: draft.payload,
            staged_cycle: draft.staged_cycle,
            source_sensor: draft.source_sensor,
            staged_at: at,
            signature,
            status: RepairStatus::Staged,
            history: Vec::new(),
            rejection: None,
        }
    }

    pub fn status(&self) -> RepairStatus {
        self.status
    }

    pub fn history(&self) -> &[RepairTransition] {
        &self.history
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        self.rejection.as_ref()
    }

    /// The draft this repair was signed from.
    pub fn draft(&self) -> RepairDraft {
        RepairDraft {
            id: self.id,
            anchor_id: self.anchor_id.clone(),
            repair_type: self.repair_type,
            payload: self.payload.clone(),
            staged_cycle: self.staged_cycle,
            source_sensor: self.source_sensor.clone(),
        }
    }

    /// Canonical bytes covered by [`Repair::signature`].
    pub fn preimage(&self) -> Result<Vec<u8>, RepairError> {
        self.draft().preimage()
    }

    /// STAGED → AUTHORIZED. Callers must hold a granted authority decision.
    pub fn authorize(&mut self, authority: &str, at: DateTime<Utc>) -> Result<(), RepairError> {
        self.transition(RepairStatus::Authorized, at, Some(authority.to_string()))
    }

    /// AUTHORIZED → EXECUTED. Callers must have verified the signature.
    pub fn mark_executed(&mut self, at: DateTime<Utc>) -> Result<(), RepairError> {
        self.transition(RepairStatus::Executed, at, None)
    }

    /// STAGED | AUTHORIZED → REJECTED.
    pub fn reject(&mut self, reason: RejectionReason, at: DateTime<Utc>) -> Result<(), RepairError> {
        self.transition(RepairStatus::Rejected, at, Some(reason.code().to_string()))?;
        self.rejection = Some(reason);
        Ok(())
    }

    /// True iff the transition into EXECUTED was immediately preceded by
    /// STAGED → AUTHORIZED. Vacuously false for repairs never executed.
    pub fn authorized_before_execution(&self) -> bool {
        let exec_idx = self
            .history
            .iter()
            .position(|t| t.to == RepairStatus::Executed);
        match exec_idx {
            Some(i) if i > 0 => {
                let prev = &self.history[i - 1];
                prev.from == RepairStatus::Staged
                    && prev.to == RepairStatus::Authorized
                    && self.history[i].from == RepairStatus::Authorized
            }
            _ => false,
        }
    }

    fn transition(
        &mut self,
        to: RepairStatus,
        at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<(), RepairError> {
        if !self.status.can_transition_to(to) {
            return Err(RepairError::InvalidTransition {
                repair_id: self.id,
                from: self.status,
                to,
            });
        }
        self.history.push(RepairTransition {
            from: self.status,
            to,
            at,
            note,
        });
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged() -> Repair {
        let draft = RepairDraft::new(
            "anchor-1".into(),
            RepairType::ConfigRestore,
            TelemetryFields::new(),
            1,
            "config_drift",
        );
        Repair::stage(draft, Signature::from_hex("00"), Utc::now())
    }

    #[test]
    fn staged_cannot_jump_to_executed() {
        let mut r = staged();
        let err = r.mark_executed(Utc::now()).unwrap_err();
        assert!(matches!(err, RepairError::InvalidTransition { .. }));
        assert_eq!(r.status(), RepairStatus::Staged);
        assert!(r.history().is_empty());
    }

    #[test]
    fn full_happy_path_records_history() {
        let mut r = staged();
        r.authorize("ops-lead", Utc::now()).unwrap();
        r.mark_executed(Utc::now()).unwrap();
        assert_eq!(r.status(), RepairStatus::Executed);
        assert_eq!(r.history().len(), 2);
        assert!(r.authorized_before_execution());
    }

    #[test]
    fn terminal_states_refuse_everything() {
        let mut r = staged();
        r.reject(RejectionReason::Expired, Utc::now()).unwrap();
        assert!(r.authorize("x", Utc::now()).is_err());
        assert!(r.reject(RejectionReason::Expired, Utc::now()).is_err());
        assert_eq!(r.rejection(), Some(&RejectionReason::Expired));
        assert!(!r.authorized_before_execution());
    }

    #[test]
    fn preimage_is_stable_for_same_draft() {
        let r = staged();
        assert_eq!(r.preimage().unwrap(), r.draft().preimage().unwrap());
    }
}
