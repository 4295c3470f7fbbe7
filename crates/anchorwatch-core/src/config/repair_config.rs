use serde::{Deserialize, Serialize};

use super::defaults;

/// Repair staging and execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Poll the authority and execute authorized repairs. Default: false,
    /// which keeps every repair STAGED until an operator enables execution.
    pub execution_enabled: bool,
    /// Cycles a repair may remain STAGED before it is rejected as expired.
    pub staged_ttl_cycles: u64,
    /// 64-hex-char key for the built-in keyed-hash signer. When absent a key
    /// is derived from `signing_key_seed`.
    pub signing_key_hex: Option<String>,
    /// Seed material for key derivation when no explicit key is set.
    pub signing_key_seed: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            execution_enabled: defaults::DEFAULT_EXECUTION_ENABLED,
            staged_ttl_cycles: defaults::DEFAULT_STAGED_TTL_CYCLES,
            signing_key_hex: None,
            signing_key_seed: "anchorwatch".to_string(),
        }
    }
}
