//! # anchorwatch-privacy
//!
//! Data minimization: every field outside the anchor's consent-tier
//! allow-list is stripped before telemetry leaves collection.

mod minimizer;

pub use minimizer::AllowListMinimizer;
