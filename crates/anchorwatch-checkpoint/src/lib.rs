//! # anchorwatch-checkpoint
//!
//! One checkpoint per completed cycle, each hashing the previous one:
//! `hash = blake3(previous_hash_hex ‖ serde_json(summary))`. The chain is
//! verifiable from genesis; any altered or removed record breaks it
//! deterministically, and a broken chain marks the log compromised until an
//! operator reconciles it.

mod chain;
mod log;
mod sink;

pub use chain::{chain_hash, verify_chain, Baseline, ChainBreak, ChainReport, BreakKind, TailMismatch};
pub use log::CheckpointLog;
pub use sink::{JsonlCheckpointSink, MemoryCheckpointSink};
