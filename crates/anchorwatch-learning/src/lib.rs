//! # anchorwatch-learning
//!
//! Measures whether executed repairs improved state and, when a repair type
//! keeps failing to, proposes a policy review. Proposals are records only:
//! [`ProposalLog`] has no path that writes policy.

pub mod effectiveness;
pub mod governance;

pub use effectiveness::{effectiveness_score, EffectivenessTracker, TrackOutcome};
pub use governance::ProposalLog;
