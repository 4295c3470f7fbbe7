//! In-memory collaborators with scriptable failures.
//!
//! Everything uses interior mutability so a single instance can be shared
//! behind an `Arc` with the loop while the test inspects it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use anchorwatch_core::errors::{CollaboratorError, SigningError};
use anchorwatch_core::models::{
    Anchor, AnchorId, AuthorizationDecision, Collaborator, ExecutionResult, RawAttestation,
    Repair, Signature, TelemetryRequest,
};
use anchorwatch_core::traits::{
    IAnchorSource, IAuthoritySource, IExecutionBackend, ISigner, ITelemetryCollector,
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Anchor source over a fixed list. Rotates through consenting anchors so
/// successive batches cover the whole population.
#[derive(Debug, Default)]
pub struct StaticAnchorSource {
    anchors: Mutex<Vec<Anchor>>,
    cursor: AtomicUsize,
    failures_remaining: AtomicU32,
    calls: AtomicU32,
}

impl StaticAnchorSource {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self {
            anchors: Mutex::new(anchors),
            ..Default::default()
        }
    }

    /// Fail the next `n` calls as unavailable.
    pub fn fail_next(&self, n: u32) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn set_anchors(&self, anchors: Vec<Anchor>) {
        *self.anchors.lock().unwrap() = anchors;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IAnchorSource for StaticAnchorSource {
    fn list_consented_anchors(&self, batch_size: usize) -> Result<Vec<Anchor>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CollaboratorError::unavailable(
                Collaborator::AnchorSource,
                "scripted outage",
            ));
        }

        let anchors = self.anchors.lock().unwrap();
        let consented: Vec<&Anchor> = anchors.iter().filter(|a| a.is_collectable()).collect();
        if consented.is_empty() || batch_size == 0 {
            return Ok(Vec::new());
        }
        let take = batch_size.min(consented.len());
        let start = self.cursor.fetch_add(take, Ordering::SeqCst) % consented.len();
        Ok((0..take)
            .map(|i| consented[(start + i) % consented.len()].clone())
            .collect())
    }
}

/// Collector answering from a per-anchor payload table.
#[derive(Debug, Default)]
pub struct ScriptedCollector {
    payloads: Mutex<HashMap<AnchorId, Value>>,
    failing: Mutex<HashSet<AnchorId>>,
    panicking: Mutex<HashSet<AnchorId>>,
    requests: Mutex<Vec<TelemetryRequest>>,
}

impl ScriptedCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, id: &str, payload: Value) -> Self {
        self.set_payload(id, payload);
        self
    }

    pub fn set_payload(&self, id: &str, payload: Value) {
        self.payloads
            .lock()
            .unwrap()
            .insert(AnchorId::new(id), payload);
    }

    pub fn fail_for(&self, id: &str) {
        self.failing.lock().unwrap().insert(AnchorId::new(id));
    }

    /// Make collection for `id` panic, as a buggy transport would.
    pub fn panic_for(&self, id: &str) {
        self.panicking.lock().unwrap().insert(AnchorId::new(id));
    }

    pub fn requests(&self) -> Vec<TelemetryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ITelemetryCollector for ScriptedCollector {
    fn collect(&self, anchor: &Anchor) -> Result<RawAttestation, CollaboratorError> {
        let panics = self.panicking.lock().unwrap().contains(&anchor.id);
        if panics {
            panic!("collector crashed on {}", anchor.id);
        }
        if self.failing.lock().unwrap().contains(&anchor.id) {
            return Err(CollaboratorError::unavailable(
                Collaborator::TelemetryCollector,
                format!("{} unreachable", anchor.id),
            ));
        }
        let payload = self
            .payloads
            .lock()
            .unwrap()
            .get(&anchor.id)
            .cloned()
            .ok_or_else(|| {
                CollaboratorError::unavailable(
                    Collaborator::TelemetryCollector,
                    format!("no telemetry for {}", anchor.id),
                )
            })?;
        Ok(RawAttestation {
            anchor_id: anchor.id.clone(),
            collected_at: Utc::now(),
            payload,
        })
    }

    fn request_telemetry(&self, request: &TelemetryRequest) -> Result<(), CollaboratorError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Authority with a default decision and per-repair overrides.
#[derive(Debug)]
pub struct ScriptedAuthority {
    default: Mutex<AuthorizationDecision>,
    decisions: Mutex<HashMap<Uuid, AuthorizationDecision>>,
    unreachable: AtomicBool,
    polls: AtomicU32,
}

impl Default for ScriptedAuthority {
    fn default() -> Self {
        Self {
            default: Mutex::new(AuthorizationDecision::Pending),
            decisions: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            polls: AtomicU32::new(0),
        }
    }
}

impl ScriptedAuthority {
    /// Never decides.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Grants everything it is asked about.
    pub fn granting(authority: &str) -> Self {
        let a = Self::default();
        a.set_default(AuthorizationDecision::Granted {
            authority: authority.to_string(),
        });
        a
    }

    pub fn set_default(&self, decision: AuthorizationDecision) {
        *self.default.lock().unwrap() = decision;
    }

    pub fn decide(&self, repair_id: Uuid, decision: AuthorizationDecision) {
        self.decisions.lock().unwrap().insert(repair_id, decision);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

impl IAuthoritySource for ScriptedAuthority {
    fn get_authorization(&self, repair_id: Uuid) -> Result<AuthorizationDecision, CollaboratorError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(CollaboratorError::unavailable(
                Collaborator::AuthoritySource,
                "scripted outage",
            ));
        }
        if let Some(decision) = self.decisions.lock().unwrap().get(&repair_id) {
            return Ok(decision.clone());
        }
        Ok(self.default.lock().unwrap().clone())
    }
}

/// Execution backend that records every applied repair and reports a
/// scripted post-state per anchor.
#[derive(Debug)]
pub struct RecordingBackend {
    applied: Mutex<Vec<Repair>>,
    post_states: Mutex<HashMap<AnchorId, Value>>,
    succeed: AtomicBool,
    unreachable: AtomicBool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            post_states: Mutex::new(HashMap::new()),
            succeed: AtomicBool::new(true),
            unreachable: AtomicBool::new(false),
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_post_state(&self, id: &str, payload: Value) {
        self.post_states
            .lock()
            .unwrap()
            .insert(AnchorId::new(id), payload);
    }

    pub fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn applied(&self) -> Vec<Repair> {
        self.applied.lock().unwrap().clone()
    }
}

impl IExecutionBackend for RecordingBackend {
    fn apply(&self, repair: &Repair) -> Result<ExecutionResult, CollaboratorError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(CollaboratorError::unavailable(
                Collaborator::ExecutionBackend,
                "scripted outage",
            ));
        }
        self.applied.lock().unwrap().push(repair.clone());
        let succeed = self.succeed.load(Ordering::SeqCst);
        let post_state = self
            .post_states
            .lock()
            .unwrap()
            .get(&repair.anchor_id)
            .cloned()
            .map(|payload| RawAttestation {
                anchor_id: repair.anchor_id.clone(),
                collected_at: Utc::now(),
                payload,
            });
        Ok(ExecutionResult {
            success: succeed,
            post_state,
            detail: (!succeed).then(|| "scripted failure".to_string()),
        })
    }
}

/// Signer whose backing service is always down.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSigner;

impl ISigner for FailingSigner {
    fn sign(&self, _payload: &[u8]) -> Result<Signature, SigningError> {
        Err(SigningError::Unavailable {
            reason: "signing service offline".to_string(),
        })
    }

    fn verify(&self, _payload: &[u8], _signature: &Signature) -> Result<bool, SigningError> {
        Err(SigningError::Unavailable {
            reason: "signing service offline".to_string(),
        })
    }
}
