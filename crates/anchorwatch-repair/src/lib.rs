//! # anchorwatch-repair
//!
//! Stage → authorize → execute. Repairs are signed when staged, move to
//! AUTHORIZED only on an explicit granted decision from the authority source,
//! and reach EXECUTED only after their signature verifies. Nothing here ever
//! assumes a yes.

pub mod ledger;
pub mod signer;

pub use ledger::{AuthorityOutcome, ExecutionAttempt, ExecutionOutcome, RepairLedger};
pub use signer::KeyedHashSigner;
