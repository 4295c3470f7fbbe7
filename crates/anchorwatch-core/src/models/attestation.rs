//! Attestations: raw collected telemetry and its minimized, signed form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::anchor::{AnchorId, ConsentTier, TelemetryFields};
use super::signature::Signature;

/// Telemetry exactly as the collector returned it. The payload is untrusted
/// and may be malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttestation {
    pub anchor_id: AnchorId,
    pub collected_at: DateTime<Utc>,
    pub payload: Value,
}

/// Output of data minimization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MinimizedTelemetry {
    /// Fields that survived the allow-list.
    pub fields: TelemetryFields,
    /// Names of fields that were dropped.
    pub dropped: Vec<String>,
    /// True when the payload was not a JSON object.
    pub malformed: bool,
}

/// A minimized, digested telemetry snapshot for one anchor in one cycle.
/// Immutable once created apart from attaching the signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub anchor_id: AnchorId,
    pub cycle: u64,
    pub tier: ConsentTier,
    pub collected_at: DateTime<Utc>,
    pub fields: TelemetryFields,
    /// blake3 hex digest of the serialized fields.
    pub digest: String,
    pub signature: Option<Signature>,
}

impl Attestation {
    pub fn new(
        anchor_id: AnchorId,
        cycle: u64,
        tier: ConsentTier,
        collected_at: DateTime<Utc>,
        fields: TelemetryFields,
    ) -> Self {
        let digest = digest_fields(&fields);
        Self {
            anchor_id,
            cycle,
            tier,
            collected_at,
            fields,
            digest,
            signature: None,
        }
    }

    /// Canonical bytes covered by the attestation signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        format!(
            "{}|{}|{}|{}|{}",
            self.anchor_id,
            self.cycle,
            self.tier,
            self.collected_at.timestamp_micros(),
            self.digest
        )
        .into_bytes()
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Re-wrap the minimized fields as a raw attestation.
    pub fn to_raw(&self) -> RawAttestation {
        RawAttestation {
            anchor_id: self.anchor_id.clone(),
            collected_at: self.collected_at,
            payload: Value::Object(self.fields.clone().into_iter().collect()),
        }
    }
}

/// blake3 digest over the canonical JSON form of a field map.
pub fn digest_fields(fields: &TelemetryFields) -> String {
    // BTreeMap<String, Value> serialization cannot fail.
    let bytes = serde_json::to_vec(fields).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}
