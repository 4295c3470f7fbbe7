//! File-backed demo collaborators for `anchorwatchd`.
//!
//! An inventory is a JSON document listing anchors and the telemetry each one
//! currently reports. The dry-run backend applies repair payloads to that
//! telemetry, so a restored field reads back coherent on the next cycle.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anchorwatch_core::errors::{CollaboratorError, ConfigError};
use anchorwatch_core::models::{
    Anchor, AnchorId, AuthorizationDecision, Collaborator, ExecutionResult, RawAttestation, Repair,
    TelemetryRequest,
};
use anchorwatch_core::traits::{
    IAnchorSource, IAuthoritySource, IExecutionBackend, ISigner, ITelemetryCollector,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::collaborators::Collaborators;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub telemetry: BTreeMap<AnchorId, Value>,
    /// When set, every staged repair is granted under this authority name.
    /// Absent means no repair is ever authorized.
    #[serde(default)]
    pub auto_authority: Option<String>,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Wire the inventory into a full collaborator set around `signer`.
    pub fn into_collaborators(self, signer: Arc<dyn ISigner>) -> Collaborators {
        let state = Arc::new(InventoryState {
            anchors: self.anchors,
            telemetry: Mutex::new(self.telemetry),
            cursor: AtomicUsize::new(0),
        });
        Collaborators {
            anchors: Arc::new(InventoryAnchorSource(Arc::clone(&state))),
            collector: Arc::new(InventoryCollector {
                state: Arc::clone(&state),
                requests: AtomicUsize::new(0),
            }),
            signer,
            authority: Arc::new(InventoryAuthority {
                grant_as: self.auto_authority,
            }),
            backend: Arc::new(DryRunBackend(state)),
        }
    }
}

#[derive(Debug)]
struct InventoryState {
    anchors: Vec<Anchor>,
    telemetry: Mutex<BTreeMap<AnchorId, Value>>,
    cursor: AtomicUsize,
}

impl InventoryState {
    fn telemetry(
        &self,
        collaborator: Collaborator,
    ) -> Result<MutexGuard<'_, BTreeMap<AnchorId, Value>>, CollaboratorError> {
        self.telemetry
            .lock()
            .map_err(|_| CollaboratorError::unavailable(collaborator, "inventory lock poisoned"))
    }
}

/// Rotates through consenting anchors so successive batches cover everyone.
#[derive(Debug)]
struct InventoryAnchorSource(Arc<InventoryState>);

impl IAnchorSource for InventoryAnchorSource {
    fn list_consented_anchors(&self, batch_size: usize) -> Result<Vec<Anchor>, CollaboratorError> {
        let consented: Vec<&Anchor> = self.0.anchors.iter().filter(|a| a.is_collectable()).collect();
        if consented.is_empty() || batch_size == 0 {
            return Ok(Vec::new());
        }
        let take = batch_size.min(consented.len());
        let start = self.0.cursor.fetch_add(take, Ordering::Relaxed) % consented.len();
        Ok((0..take)
            .map(|i| consented[(start + i) % consented.len()].clone())
            .collect())
    }
}

#[derive(Debug)]
struct InventoryCollector {
    state: Arc<InventoryState>,
    requests: AtomicUsize,
}

impl ITelemetryCollector for InventoryCollector {
    fn collect(&self, anchor: &Anchor) -> Result<RawAttestation, CollaboratorError> {
        let telemetry = self.state.telemetry(Collaborator::TelemetryCollector)?;
        let payload = telemetry.get(&anchor.id).cloned().ok_or_else(|| {
            CollaboratorError::unavailable(
                Collaborator::TelemetryCollector,
                format!("no telemetry on file for {}", anchor.id),
            )
        })?;
        Ok(RawAttestation {
            anchor_id: anchor.id.clone(),
            collected_at: Utc::now(),
            payload,
        })
    }

    fn request_telemetry(&self, request: &TelemetryRequest) -> Result<(), CollaboratorError> {
        let total = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            anchor_id = %request.anchor_id,
            missing = ?request.missing_inputs,
            total,
            "telemetry request noted; inventory telemetry is static"
        );
        Ok(())
    }
}

#[derive(Debug)]
struct InventoryAuthority {
    grant_as: Option<String>,
}

impl IAuthoritySource for InventoryAuthority {
    fn get_authorization(&self, _repair_id: Uuid) -> Result<AuthorizationDecision, CollaboratorError> {
        Ok(match &self.grant_as {
            Some(authority) => AuthorizationDecision::Granted {
                authority: authority.clone(),
            },
            None => AuthorizationDecision::Pending,
        })
    }
}

/// Applies repair payloads to the inventory's telemetry.
#[derive(Debug)]
struct DryRunBackend(Arc<InventoryState>);

impl IExecutionBackend for DryRunBackend {
    fn apply(&self, repair: &Repair) -> Result<ExecutionResult, CollaboratorError> {
        let mut telemetry = self.0.telemetry(Collaborator::ExecutionBackend)?;
        let Some(Value::Object(fields)) = telemetry.get_mut(&repair.anchor_id) else {
            return Ok(ExecutionResult {
                success: false,
                post_state: None,
                detail: Some(format!("no object telemetry on file for {}", repair.anchor_id)),
            });
        };
        for (key, value) in &repair.payload {
            fields.insert(key.clone(), value.clone());
        }
        tracing::info!(
            repair_id = %repair.id,
            anchor_id = %repair.anchor_id,
            keys = repair.payload.len(),
            "dry-run repair applied to inventory telemetry"
        );
        Ok(ExecutionResult {
            success: true,
            post_state: Some(RawAttestation {
                anchor_id: repair.anchor_id.clone(),
                collected_at: Utc::now(),
                payload: Value::Object(fields.clone()),
            }),
            detail: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::errors::SigningError;
    use anchorwatch_core::models::{RepairDraft, RepairType, Signature, TelemetryFields};
    use serde_json::json;

    fn inventory() -> Inventory {
        serde_json::from_value(json!({
            "anchors": [
                {
                    "id": "a",
                    "consent": { "collection": true, "tier": "standard" },
                    "policy": { "version": "v1", "intent": { "config": { "audit": true } } },
                    "registered_at": "2024-06-01T00:00:00Z"
                },
                {
                    "id": "b",
                    "consent": { "collection": false, "tier": "minimal" },
                    "policy": { "version": "v1", "intent": {} },
                    "registered_at": "2024-06-01T00:00:00Z"
                }
            ],
            "telemetry": { "a": { "config": { "audit": false } } }
        }))
        .unwrap()
    }

    struct NullSigner;

    impl ISigner for NullSigner {
        fn sign(&self, _payload: &[u8]) -> Result<Signature, SigningError> {
            Ok(Signature::from_hex("00"))
        }

        fn verify(
            &self,
            _payload: &[u8],
            _signature: &Signature,
        ) -> Result<bool, SigningError> {
            Ok(true)
        }
    }

    #[test]
    fn only_consenting_anchors_are_listed() {
        let collaborators = inventory().into_collaborators(Arc::new(NullSigner));
        let batch = collaborators.anchors.list_consented_anchors(10).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id.as_str(), "a");
    }

    #[test]
    fn dry_run_repair_changes_what_is_collected_next() {
        let collaborators = inventory().into_collaborators(Arc::new(NullSigner));
        let anchor = collaborators.anchors.list_consented_anchors(1).unwrap().remove(0);

        let mut payload = TelemetryFields::new();
        payload.insert("config".into(), json!({ "audit": true }));
        let draft = RepairDraft::new(anchor.id.clone(), RepairType::ConfigRestore, payload, 1, "config_drift");
        let repair = Repair::stage(draft, Signature::from_hex("00"), Utc::now());

        let result = collaborators.backend.apply(&repair).unwrap();
        assert!(result.success);
        let after = collaborators.collector.collect(&anchor).unwrap();
        assert_eq!(after.payload["config"]["audit"], json!(true));
    }

    #[test]
    fn without_auto_authority_nothing_is_granted() {
        let collaborators = inventory().into_collaborators(Arc::new(NullSigner));
        let decision = collaborators.authority.get_authorization(Uuid::new_v4()).unwrap();
        assert_eq!(decision, AuthorizationDecision::Pending);
    }
}
