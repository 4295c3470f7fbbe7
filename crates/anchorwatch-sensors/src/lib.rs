//! # anchorwatch-sensors
//!
//! Independent, pure checks evaluated per anchor per cycle. Each returns a
//! structured [`Finding`](anchorwatch_core::models::Finding); none of them
//! changes anything. Only drift sensors may flag a finding for repair staging.

pub mod config_drift;
pub mod exposure;
pub mod payload;
pub mod permission_drift;
pub mod registry;
pub mod three_way;
pub mod values;

mod finding;

pub use config_drift::ConfigDriftSensor;
pub use exposure::ExposurePreconditionSensor;
pub use payload::repair_payload;
pub use permission_drift::PermissionDriftSensor;
pub use registry::SensorRegistry;
pub use three_way::{compare, ThreeWayMatchSensor};
