//! # anchorwatch-budget
//!
//! Admission control for the verification loop. A sliding window of recorded
//! work bounds how many verification units can be spent per window; when the
//! window is full the budget answers with a refusal and a backoff instead of
//! an error.

mod window;

pub use window::PressureBudget;
