//! Trait seams. Collaborators (§ external interfaces) are consumed through
//! these; each enforcer is injectable behind its own trait so it can be
//! tested in isolation.

pub mod admission_control;
pub mod anchor_source;
pub mod authority_source;
pub mod checkpoint_sink;
pub mod execution_backend;
pub mod minimizer;
pub mod policy_governance;
pub mod sensor;
pub mod signer;
pub mod telemetry_collector;

pub use admission_control::IAdmissionControl;
pub use anchor_source::IAnchorSource;
pub use authority_source::IAuthoritySource;
pub use checkpoint_sink::ICheckpointSink;
pub use execution_backend::IExecutionBackend;
pub use minimizer::IMinimizer;
pub use policy_governance::IPolicyGovernance;
pub use sensor::{ISensor, SensorInput};
pub use signer::ISigner;
pub use telemetry_collector::ITelemetryCollector;
