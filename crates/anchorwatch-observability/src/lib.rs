//! # anchorwatch-observability
//!
//! Rolling KPIs updated once per cycle, structured tracing with span and event
//! definitions, collaborator degradation tracking, and per-subsystem health.

pub mod degradation;
pub mod health;
pub mod kpi;
pub mod tracing_setup;

pub use degradation::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use health::{HealthReport, HealthReporter, HealthSnapshot, HealthStatus, SubsystemHealth};
pub use kpi::{CycleSample, KpiRegistry, KpiTargets};
