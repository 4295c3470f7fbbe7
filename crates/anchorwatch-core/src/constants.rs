/// Anchorwatch version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Previous-hash value of the first checkpoint in a chain.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Hex length of a blake3 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Context string for deriving the default repair signing key.
pub const SIGNING_KEY_CONTEXT: &str = "anchorwatch 2024-06 repair artifact signing";

/// Upper bound on anchors admitted in a single cycle, whatever the budget says.
pub const MAX_CYCLE_BATCH: usize = 10_000;

/// Terminal (executed or rejected) repairs kept in memory for inspection.
pub const MAX_REPAIR_HISTORY: usize = 1_024;

/// Recovered degradations kept in memory for health reporting.
pub const MAX_DEGRADATION_HISTORY: usize = 256;

/// Well-known telemetry and intent field names read by the built-in sensors.
pub mod fields {
    pub const PERMISSIONS: &str = "permissions";
    pub const CONFIG: &str = "config";
    pub const OPEN_PORTS: &str = "open_ports";
    pub const ALLOWED_PORTS: &str = "allowed_ports";
    pub const TLS_ENABLED: &str = "tls_enabled";
    pub const TLS_REQUIRED: &str = "tls_required";
    pub const PATCH_LEVEL: &str = "patch_level";
    pub const MIN_PATCH_LEVEL: &str = "min_patch_level";

    /// Intent keys that parameterize sensors instead of describing state.
    pub const POLICY_DIRECTIVES: &[&str] = &[ALLOWED_PORTS, TLS_REQUIRED, MIN_PATCH_LEVEL];
}
