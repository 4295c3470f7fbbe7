//! Anchors: the managed endpoints under verification, and the policy
//! snapshot (intent plus tolerance envelope) they declare.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::fields;

/// Telemetry and intent fields, keyed by field name.
///
/// A `BTreeMap` keeps serialization order stable, which checkpoint hashing
/// and attestation digests rely on.
pub type TelemetryFields = BTreeMap<String, Value>;

/// Stable identifier of an anchor, assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(String);

impl AnchorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AnchorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How much telemetry an anchor's owner has consented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentTier {
    Minimal,
    Standard,
    Extended,
}

impl ConsentTier {
    pub const ALL: [ConsentTier; 3] = [Self::Minimal, Self::Standard, Self::Extended];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for ConsentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent state as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    /// Telemetry may only be collected while this is true.
    pub collection: bool,
    pub tier: ConsentTier,
}

/// Acceptable deviation of reality from intent for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tolerance {
    /// Reality must equal intent.
    #[default]
    Exact,
    /// Reality must be one of the listed values.
    OneOf { values: Vec<Value> },
    /// Numeric reality within `[min, max]`.
    Range { min: f64, max: f64 },
    /// Numeric reality at least the intent value.
    AtLeast,
    /// Every element observed in reality must be declared in intent.
    /// Applies to arrays, and to objects whose values are arrays.
    Subset,
    /// Any observed value is acceptable.
    Ignore,
}

/// Declared intent plus the tolerance envelope that forms the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicySnapshot {
    pub version: String,
    pub intent: TelemetryFields,
    pub tolerances: BTreeMap<String, Tolerance>,
}

static EXACT: Tolerance = Tolerance::Exact;

impl PolicySnapshot {
    /// Tolerance for a field, defaulting to [`Tolerance::Exact`].
    pub fn tolerance_for(&self, key: &str) -> &Tolerance {
        self.tolerances.get(key).unwrap_or(&EXACT)
    }

    /// Whether an intent key is a policy directive (a parameter for sensors)
    /// rather than observable state.
    pub fn is_directive(key: &str) -> bool {
        fields::POLICY_DIRECTIVES.contains(&key)
    }

    /// Intent restricted to observable state.
    pub fn observable_intent(&self) -> TelemetryFields {
        self.intent
            .iter()
            .filter(|(k, _)| !Self::is_directive(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The projection: every observable intent key mapped to its effective
    /// tolerance.
    pub fn projection(&self) -> BTreeMap<String, Tolerance> {
        self.intent
            .keys()
            .filter(|k| !Self::is_directive(k))
            .map(|k| (k.clone(), self.tolerance_for(k).clone()))
            .collect()
    }
}

/// A managed endpoint. Created by the registry; this subsystem only updates
/// the sampling bookkeeping and never deletes anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,
    pub consent: Consent,
    pub policy: PolicySnapshot,
    #[serde(default)]
    pub last_reality: Option<TelemetryFields>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sampled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sample_count: u64,
}

impl Anchor {
    pub fn new(id: impl Into<AnchorId>, consent: Consent, policy: PolicySnapshot) -> Self {
        Self {
            id: id.into(),
            consent,
            policy,
            last_reality: None,
            registered_at: Utc::now(),
            last_sampled_at: None,
            sample_count: 0,
        }
    }

    /// Whether telemetry may be collected from this anchor right now.
    pub fn is_collectable(&self) -> bool {
        self.consent.collection
    }

    /// Record a completed sample.
    pub fn record_sample(&mut self, reality: TelemetryFields, at: DateTime<Utc>) {
        self.last_reality = Some(reality);
        self.last_sampled_at = Some(at);
        self.sample_count += 1;
    }
}
