//! Rolling-window KPIs, updated once per cycle by the orchestrator.

mod registry;

pub use registry::{CycleSample, KpiRegistry, KpiTargets};

/// KPI names as constants for programmatic use.
pub mod names {
    pub const THROUGHPUT: &str = "throughput";
    pub const DRIFT_RATE: &str = "drift_rate";
    pub const AVERAGE_CONFIDENCE: &str = "average_confidence";
    pub const INDETERMINATE_RATE: &str = "indeterminate_rate";
    pub const BUDGET_REFUSALS: &str = "budget_refusals";
    pub const REPAIRS_STAGED: &str = "repairs_staged";
    pub const REPAIRS_EXECUTED: &str = "repairs_executed";
    pub const REPAIRS_REJECTED: &str = "repairs_rejected";
    pub const REPAIR_EFFECTIVENESS: &str = "repair_effectiveness";
    pub const CHECKPOINT_INTEGRITY: &str = "checkpoint_integrity";

    /// Every KPI in reporting order.
    pub const ALL: &[&str] = &[
        THROUGHPUT,
        DRIFT_RATE,
        AVERAGE_CONFIDENCE,
        INDETERMINATE_RATE,
        BUDGET_REFUSALS,
        REPAIRS_STAGED,
        REPAIRS_EXECUTED,
        REPAIRS_REJECTED,
        REPAIR_EFFECTIVENESS,
        CHECKPOINT_INTEGRITY,
    ];
}
