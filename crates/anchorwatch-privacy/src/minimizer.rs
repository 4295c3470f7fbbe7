use anchorwatch_core::config::MinimizationConfig;
use anchorwatch_core::models::{
    Attestation, ConsentTier, MinimizedTelemetry, RawAttestation, TelemetryFields,
};
use anchorwatch_core::traits::IMinimizer;
use serde_json::Value;

/// Minimizer driven by the per-tier allow-lists in [`MinimizationConfig`].
///
/// Pure and total: a malformed payload yields empty fields with the
/// `malformed` flag set rather than an error.
#[derive(Debug, Clone, Default)]
pub struct AllowListMinimizer {
    config: MinimizationConfig,
}

impl AllowListMinimizer {
    pub fn new(config: MinimizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MinimizationConfig {
        &self.config
    }

    pub fn is_allowed(&self, tier: ConsentTier, field: &str) -> bool {
        self.config.allow_list(tier).contains(field)
    }

    /// Minimize and wrap as an unsigned attestation for `cycle`.
    pub fn attest(
        &self,
        raw: &RawAttestation,
        tier: ConsentTier,
        cycle: u64,
    ) -> (Attestation, MinimizedTelemetry) {
        let minimized = self.minimize(raw, tier);
        let attestation = Attestation::new(
            raw.anchor_id.clone(),
            cycle,
            tier,
            raw.collected_at,
            minimized.fields.clone(),
        );
        (attestation, minimized)
    }
}

impl IMinimizer for AllowListMinimizer {
    fn minimize(&self, raw: &RawAttestation, tier: ConsentTier) -> MinimizedTelemetry {
        let Value::Object(map) = &raw.payload else {
            return MinimizedTelemetry {
                fields: TelemetryFields::new(),
                dropped: Vec::new(),
                malformed: true,
            };
        };

        let allow = self.config.allow_list(tier);
        let mut fields = TelemetryFields::new();
        let mut dropped = Vec::new();
        for (key, value) in map {
            if allow.contains(key) {
                fields.insert(key.clone(), value.clone());
            } else {
                dropped.push(key.clone());
            }
        }
        dropped.sort();

        MinimizedTelemetry {
            fields,
            dropped,
            malformed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorwatch_core::models::AnchorId;
    use chrono::Utc;
    use serde_json::json;

    fn raw(payload: Value) -> RawAttestation {
        RawAttestation {
            anchor_id: AnchorId::new("host-1"),
            collected_at: Utc::now(),
            payload,
        }
    }

    #[test]
    fn strips_fields_outside_tier() {
        let m = AllowListMinimizer::default();
        let out = m.minimize(
            &raw(json!({"agent_version": "1.2", "config": {"a": 1}, "ssn": "x"})),
            ConsentTier::Minimal,
        );
        assert_eq!(out.fields.len(), 1);
        assert!(out.fields.contains_key("agent_version"));
        assert_eq!(out.dropped, vec!["config".to_string(), "ssn".to_string()]);
        assert!(!out.malformed);
    }

    #[test]
    fn standard_keeps_config_and_permissions() {
        let m = AllowListMinimizer::default();
        let out = m.minimize(
            &raw(json!({"config": {}, "permissions": [], "open_ports": [22]})),
            ConsentTier::Standard,
        );
        assert!(out.fields.contains_key("config"));
        assert!(out.fields.contains_key("permissions"));
        assert!(!out.fields.contains_key("open_ports"));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let m = AllowListMinimizer::default();
        for payload in [json!(null), json!([1, 2]), json!("text"), json!(42)] {
            let out = m.minimize(&raw(payload), ConsentTier::Extended);
            assert!(out.malformed);
            assert!(out.fields.is_empty());
        }
    }

    #[test]
    fn attest_digests_minimized_fields_only() {
        let m = AllowListMinimizer::default();
        let r1 = raw(json!({"agent_version": "1.2", "secret": "a"}));
        let mut r2 = r1.clone();
        r2.payload = json!({"agent_version": "1.2", "secret": "b"});
        let (a1, _) = m.attest(&r1, ConsentTier::Minimal, 3);
        let (a2, _) = m.attest(&r2, ConsentTier::Minimal, 3);
        assert_eq!(a1.digest, a2.digest);
        assert_eq!(a1.cycle, 3);
        assert!(!a1.is_signed());
    }
}
