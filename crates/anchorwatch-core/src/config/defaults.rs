// Single source of truth for all default values.

// --- Budget ---
pub const DEFAULT_UNITS_PER_WINDOW: u64 = 100;
pub const DEFAULT_BUDGET_WINDOW_MS: u64 = 1_000;
pub const DEFAULT_UNITS_PER_ANCHOR: u64 = 1;

// --- Minimization ---
pub const DEFAULT_MINIMAL_FIELDS: &[&str] = &["agent_version", "os_family", "patch_level"];
pub const DEFAULT_STANDARD_FIELDS: &[&str] = &[
    "agent_version",
    "os_family",
    "patch_level",
    "config",
    "permissions",
];
pub const DEFAULT_EXTENDED_FIELDS: &[&str] = &[
    "agent_version",
    "os_family",
    "patch_level",
    "config",
    "permissions",
    "open_ports",
    "tls_enabled",
    "services",
];

// --- Confidence ---
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.7;
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.4;
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.7;

// --- Repair ---
pub const DEFAULT_EXECUTION_ENABLED: bool = false;
pub const DEFAULT_STAGED_TTL_CYCLES: u64 = 20;

// --- Effectiveness ---
pub const DEFAULT_EFFECTIVENESS_WINDOW: usize = 20;
pub const DEFAULT_EFFECTIVENESS_THRESHOLD: f64 = 0.5;
pub const DEFAULT_EFFECTIVENESS_MIN_SAMPLES: usize = 5;

// --- Checkpoint ---
pub const DEFAULT_VERIFY_EVERY_CYCLES: u64 = 10;

// --- Loop ---
pub const DEFAULT_TICK_MS: u64 = 5_000;
pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_INDETERMINATE_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_COLLABORATOR_BACKOFF_BASE_MS: u64 = 500;
pub const DEFAULT_COLLABORATOR_BACKOFF_MAX_MS: u64 = 60_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_KPI_WINDOW: usize = 30;
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

// --- KPI targets ---
pub const DEFAULT_TARGET_THROUGHPUT: f64 = 1.0;
pub const DEFAULT_TARGET_DRIFT_RATE: f64 = 0.1;
pub const DEFAULT_TARGET_INDETERMINATE_RATE: f64 = 0.2;
pub const DEFAULT_TARGET_BUDGET_REFUSALS: f64 = 0.0;
pub const DEFAULT_TARGET_REPAIRS_STAGED: f64 = 10.0;
pub const DEFAULT_TARGET_REPAIRS_EXECUTED: f64 = 0.0;
pub const DEFAULT_TARGET_REPAIRS_REJECTED: f64 = 3.0;
