//! # anchorwatch-confidence
//!
//! Turns sensor findings into a raw Exposure-Readiness Index and gates it
//! behind the confidence floor. The only way to obtain a displayable value is
//! [`ConfidenceFloorEnforcer::calculate_displayable`]; below the floor the
//! result is categorically indeterminate.

mod displayable;
mod enforcer;
mod scorer;

pub use displayable::{DisplayableEri, EriDisplay};
pub use enforcer::{ConfidenceFloorEnforcer, IConfidenceGate};
pub use scorer::EriScorer;
