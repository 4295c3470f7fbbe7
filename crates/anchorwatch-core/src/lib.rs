//! # anchorwatch-core
//!
//! Foundation crate for the Anchorwatch verification loop.
//! Defines the data model, collaborator and enforcer traits, errors, config,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AnchorwatchConfig;
pub use errors::{AnchorwatchError, AnchorwatchResult};
pub use models::{
    Anchor, AnchorId, Attestation, Comparison, ConsentTier, Finding, RawAttestation, RawEri,
    Repair, RepairStatus, RepairType, TelemetryFields,
};
