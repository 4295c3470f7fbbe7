//! Error handling for Anchorwatch.
//! One error enum per subsystem, `thiserror` only.
//!
//! Refusals (budget, confidence, authority) and repair rejections are not
//! errors; see [`crate::models::RefusalReason`] and
//! [`crate::models::RejectionReason`].

pub mod anchorwatch_error;
pub mod budget_error;
pub mod checkpoint_error;
pub mod collaborator_error;
pub mod config_error;
pub mod error_code;
pub mod governance_error;
pub mod repair_error;
pub mod sensor_error;
pub mod signing_error;

pub use anchorwatch_error::{AnchorwatchError, AnchorwatchResult};
pub use budget_error::BudgetError;
pub use checkpoint_error::CheckpointError;
pub use collaborator_error::CollaboratorError;
pub use config_error::ConfigError;
pub use error_code::AnchorwatchErrorCode;
pub use governance_error::GovernanceError;
pub use repair_error::RepairError;
pub use sensor_error::SensorError;
pub use signing_error::SigningError;
