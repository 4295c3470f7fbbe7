//! [`RepairLedger`]: owns every repair and its pre-state comparison.
//!
//! At most one open (STAGED or AUTHORIZED) repair exists per anchor, which
//! serializes repair attempts per anchor while leaving anchors independent.
//! Terminal repairs move to a bounded history; per-cycle scans only touch
//! open ones.

use std::collections::{BTreeMap, HashMap, VecDeque};

use anchorwatch_core::constants::MAX_REPAIR_HISTORY;

use anchorwatch_core::errors::{CollaboratorError, RepairError, SigningError};
use anchorwatch_core::models::{
    AnchorId, AuthorizationDecision, Collaborator, Comparison, ExecutionResult, RawAttestation,
    RejectionReason, Repair, RepairDraft, RepairStatus, RepairType, Signature,
};
use anchorwatch_core::traits::{IAuthoritySource, IExecutionBackend, ISigner};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of polling the authority for one STAGED repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityOutcome {
    /// No decision. `unreachable` when the authority could not be asked.
    Pending { unreachable: bool },
    Authorized { authority: String },
    Denied { authority: String, reason: String },
}

/// Result of trying to execute one AUTHORIZED repair.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Executed {
        repair_id: Uuid,
        anchor_id: AnchorId,
        repair_type: RepairType,
        pre_state: Comparison,
        post_state: Option<RawAttestation>,
    },
    Rejected {
        repair_id: Uuid,
        reason: RejectionReason,
    },
    /// A collaborator was unavailable; the repair stays AUTHORIZED.
    Deferred {
        repair_id: Uuid,
        collaborator: Collaborator,
    },
}

/// What the signer and backend said about one AUTHORIZED repair, before the
/// ledger records it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionAttempt {
    SignerUnavailable { reason: String },
    InvalidSignature,
    BackendUnavailable { collaborator: Collaborator, reason: String },
    Applied(ExecutionResult),
}

impl ExecutionAttempt {
    /// Verify the repair's signature and apply it only if the signature
    /// holds. Calls collaborators; touches no ledger state.
    pub fn run(
        repair: &Repair,
        signer: &dyn ISigner,
        backend: &dyn IExecutionBackend,
    ) -> Result<Self, RepairError> {
        let verified = match signer.verify(&repair.preimage()?, &repair.signature) {
            Ok(ok) => ok,
            Err(SigningError::Unavailable { reason }) => {
                return Ok(Self::SignerUnavailable { reason });
            }
            Err(_) => false,
        };
        if !verified {
            return Ok(Self::InvalidSignature);
        }
        Ok(match backend.apply(repair) {
            Ok(result) => Self::Applied(result),
            Err(e) => Self::BackendUnavailable {
                collaborator: e.collaborator(),
                reason: e.to_string(),
            },
        })
    }
}

#[derive(Debug)]
pub struct RepairLedger {
    open: BTreeMap<Uuid, Repair>,
    /// Executed and rejected repairs, oldest first.
    closed: VecDeque<Repair>,
    pre_states: HashMap<Uuid, Comparison>,
    open_by_anchor: HashMap<AnchorId, Uuid>,
    staged_ttl_cycles: u64,
    history_limit: usize,
}

impl RepairLedger {
    pub fn new(staged_ttl_cycles: u64) -> Self {
        Self {
            open: BTreeMap::new(),
            closed: VecDeque::new(),
            pre_states: HashMap::new(),
            open_by_anchor: HashMap::new(),
            staged_ttl_cycles,
            history_limit: MAX_REPAIR_HISTORY,
        }
    }

    /// Keep at most `limit` terminal repairs; older ones are dropped.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn get(&self, id: Uuid) -> Option<&Repair> {
        self.open
            .get(&id)
            .or_else(|| self.closed.iter().rev().find(|r| r.id == id))
    }

    /// Open repairs in id order, then retained terminal ones, oldest first.
    pub fn repairs(&self) -> impl Iterator<Item = &Repair> {
        self.open.values().chain(self.closed.iter())
    }

    pub fn open_for(&self, anchor_id: &AnchorId) -> Option<Uuid> {
        self.open_by_anchor.get(anchor_id).copied()
    }

    /// Ids of repairs with the given status. Open statuses come back in id
    /// order, terminal ones oldest first.
    pub fn with_status(&self, status: RepairStatus) -> Vec<Uuid> {
        self.scan(status).map(|r| r.id).collect()
    }

    pub fn count(&self, status: RepairStatus) -> usize {
        self.scan(status).count()
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    fn scan(&self, status: RepairStatus) -> Box<dyn Iterator<Item = &Repair> + '_> {
        if status.is_open() {
            Box::new(self.open.values().filter(move |r| r.status() == status))
        } else {
            Box::new(self.closed.iter().filter(move |r| r.status() == status))
        }
    }

    /// Sign and stage a repair. Refused while the anchor has an open repair.
    pub fn stage(
        &mut self,
        draft: RepairDraft,
        pre_state: Comparison,
        signer: &dyn ISigner,
        at: DateTime<Utc>,
    ) -> Result<Uuid, RepairError> {
        self.ensure_idle(&draft.anchor_id)?;
        let signature = signer.sign(&draft.preimage()?)?;
        self.stage_signed(draft, pre_state, signature, at)
    }

    /// Stage a draft whose preimage was already signed.
    pub fn stage_signed(
        &mut self,
        draft: RepairDraft,
        pre_state: Comparison,
        signature: Signature,
        at: DateTime<Utc>,
    ) -> Result<Uuid, RepairError> {
        self.ensure_idle(&draft.anchor_id)?;
        let repair = Repair::stage(draft, signature, at);
        let id = repair.id;

        tracing::debug!(
            repair_id = %id,
            anchor_id = %repair.anchor_id,
            repair_type = %repair.repair_type,
            "repair staged"
        );
        self.open_by_anchor.insert(repair.anchor_id.clone(), id);
        self.pre_states.insert(id, pre_state);
        self.open.insert(id, repair);
        Ok(id)
    }

    /// Reject every STAGED repair older than the TTL. Returns their ids.
    pub fn expire(&mut self, current_cycle: u64, at: DateTime<Utc>) -> Vec<Uuid> {
        let ttl = self.staged_ttl_cycles;
        let expired: Vec<Uuid> = self
            .open
            .values()
            .filter(|r| {
                r.status() == RepairStatus::Staged
                    && current_cycle.saturating_sub(r.staged_cycle) >= ttl
            })
            .map(|r| r.id)
            .collect();
        expired
            .into_iter()
            .filter(|id| self.reject(*id, RejectionReason::Expired, at).is_ok())
            .collect()
    }

    /// Ask the authority about a STAGED repair. Errors count as pending:
    /// absence of a decision is never a yes.
    pub fn poll_authority(
        &mut self,
        id: Uuid,
        authority: &dyn IAuthoritySource,
        at: DateTime<Utc>,
    ) -> Result<AuthorityOutcome, RepairError> {
        self.ensure_status(id, RepairStatus::Staged, RepairStatus::Authorized)?;
        let answer = authority.get_authorization(id);
        self.record_decision(id, answer, at)
    }

    /// Apply the authority's answer for a STAGED repair.
    pub fn record_decision(
        &mut self,
        id: Uuid,
        answer: Result<AuthorizationDecision, CollaboratorError>,
        at: DateTime<Utc>,
    ) -> Result<AuthorityOutcome, RepairError> {
        self.ensure_status(id, RepairStatus::Staged, RepairStatus::Authorized)?;
        let decision = match answer {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(repair_id = %id, error = %e, "authority unreachable, treating as pending");
                return Ok(AuthorityOutcome::Pending { unreachable: true });
            }
        };

        match decision {
            AuthorizationDecision::Pending => Ok(AuthorityOutcome::Pending { unreachable: false }),
            AuthorizationDecision::Granted { authority } => {
                self.repair_mut(id)?.authorize(&authority, at)?;
                tracing::info!(event = "repair_authorized", repair_id = %id, authority = %authority, "repair authorized");
                Ok(AuthorityOutcome::Authorized { authority })
            }
            AuthorizationDecision::Denied { authority, reason } => {
                self.reject(
                    id,
                    RejectionReason::AuthorityDenied {
                        authority: authority.clone(),
                        reason: reason.clone(),
                    },
                    at,
                )?;
                Ok(AuthorityOutcome::Denied { authority, reason })
            }
        }
    }

    /// Verify the signature of an AUTHORIZED repair and hand it to the
    /// backend. A bad signature rejects the repair with `invalid_signature`.
    pub fn execute(
        &mut self,
        id: Uuid,
        signer: &dyn ISigner,
        backend: &dyn IExecutionBackend,
        at: DateTime<Utc>,
    ) -> Result<ExecutionOutcome, RepairError> {
        self.ensure_status(id, RepairStatus::Authorized, RepairStatus::Executed)?;
        let attempt = ExecutionAttempt::run(self.repair(id)?, signer, backend)?;
        self.settle_execution(id, attempt, at)
    }

    /// Record the outcome of an [`ExecutionAttempt`] on an AUTHORIZED repair.
    pub fn settle_execution(
        &mut self,
        id: Uuid,
        attempt: ExecutionAttempt,
        at: DateTime<Utc>,
    ) -> Result<ExecutionOutcome, RepairError> {
        self.ensure_status(id, RepairStatus::Authorized, RepairStatus::Executed)?;
        let result = match attempt {
            ExecutionAttempt::Applied(result) => result,
            ExecutionAttempt::SignerUnavailable { reason } => {
                tracing::warn!(repair_id = %id, reason = %reason, "signing service unavailable, deferring execution");
                return Ok(ExecutionOutcome::Deferred {
                    repair_id: id,
                    collaborator: Collaborator::SigningService,
                });
            }
            ExecutionAttempt::InvalidSignature => {
                self.reject(id, RejectionReason::InvalidSignature, at)?;
                return Ok(ExecutionOutcome::Rejected {
                    repair_id: id,
                    reason: RejectionReason::InvalidSignature,
                });
            }
            ExecutionAttempt::BackendUnavailable {
                collaborator,
                reason,
            } => {
                tracing::warn!(repair_id = %id, error = %reason, "execution backend unavailable, deferring execution");
                return Ok(ExecutionOutcome::Deferred {
                    repair_id: id,
                    collaborator,
                });
            }
        };

        if !result.success {
            let reason = RejectionReason::ExecutionFailed {
                detail: result.detail.unwrap_or_else(|| "backend reported failure".to_string()),
            };
            self.reject(id, reason.clone(), at)?;
            return Ok(ExecutionOutcome::Rejected {
                repair_id: id,
                reason,
            });
        }

        let pre_state = self
            .pre_states
            .get(&id)
            .cloned()
            .ok_or(RepairError::NotFound(id))?;
        let repair = self.repair_mut(id)?;
        repair.mark_executed(at)?;
        let anchor_id = repair.anchor_id.clone();
        let repair_type = repair.repair_type;
        self.close(id);

        tracing::debug!(repair_id = %id, anchor_id = %anchor_id, "repair executed");
        Ok(ExecutionOutcome::Executed {
            repair_id: id,
            anchor_id,
            repair_type,
            pre_state,
            post_state: result.post_state,
        })
    }

    /// Move a repair to REJECTED and release its anchor.
    pub fn reject(
        &mut self,
        id: Uuid,
        reason: RejectionReason,
        at: DateTime<Utc>,
    ) -> Result<(), RepairError> {
        let status = self.repair(id)?.status();
        if !status.is_open() {
            return Err(RepairError::InvalidTransition {
                repair_id: id,
                from: status,
                to: RepairStatus::Rejected,
            });
        }
        let repair = self.repair_mut(id)?;
        repair.reject(reason.clone(), at)?;
        tracing::debug!(
            repair_id = %id,
            anchor_id = %repair.anchor_id,
            reason = reason.code(),
            "repair rejected"
        );
        self.close(id);
        Ok(())
    }

    /// Move a terminal repair out of the open set into bounded history.
    fn close(&mut self, id: Uuid) {
        let Some(repair) = self.open.remove(&id) else {
            return;
        };
        self.open_by_anchor.remove(&repair.anchor_id);
        self.pre_states.remove(&id);
        self.closed.push_back(repair);
        while self.closed.len() > self.history_limit {
            self.closed.pop_front();
        }
    }

    fn ensure_idle(&self, anchor_id: &AnchorId) -> Result<(), RepairError> {
        match self.open_for(anchor_id) {
            Some(open) => Err(RepairError::AnchorBusy {
                anchor_id: anchor_id.clone(),
                open_repair: open,
            }),
            None => Ok(()),
        }
    }

    fn ensure_status(
        &self,
        id: Uuid,
        expected: RepairStatus,
        to: RepairStatus,
    ) -> Result<(), RepairError> {
        let status = self.repair(id)?.status();
        if status != expected {
            return Err(RepairError::InvalidTransition {
                repair_id: id,
                from: status,
                to,
            });
        }
        Ok(())
    }

    fn repair(&self, id: Uuid) -> Result<&Repair, RepairError> {
        self.get(id).ok_or(RepairError::NotFound(id))
    }

    /// Only open repairs can change.
    fn repair_mut(&mut self, id: Uuid) -> Result<&mut Repair, RepairError> {
        self.open.get_mut(&id).ok_or(RepairError::NotFound(id))
    }
}
