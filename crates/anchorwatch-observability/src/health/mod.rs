//! Health reporting: per-subsystem checks and an aggregate report.

pub mod reporter;
pub mod subsystem_checks;

pub use reporter::{HealthReport, HealthReporter, HealthSnapshot};
pub use subsystem_checks::{HealthStatus, SubsystemChecker, SubsystemHealth};
