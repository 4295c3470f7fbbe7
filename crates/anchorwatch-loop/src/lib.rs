//! # anchorwatch-loop
//!
//! The Pressure Loop: a single repeating cycle that admits work against the
//! pressure budget, evaluates a batch of consenting anchors concurrently,
//! then serially gates, stages, authorizes and executes repairs, tracks
//! their effectiveness, and seals the cycle with a hash-chained checkpoint.
//! Results are published to subscribers as [`LoopEvent`]s.

mod backoff;
mod collaborators;
mod evaluation;
mod handle;
pub mod inventory;
mod pressure_loop;
mod report;

pub use backoff::RetryBackoff;
pub use collaborators::Collaborators;
pub use handle::LoopHandle;
pub use inventory::Inventory;
pub use pressure_loop::PressureLoop;
pub use report::{CycleOutcome, CycleReport, LoopEvent};
