use crate::errors::BudgetError;
use crate::models::Admission;

/// Admission control for verification work.
///
/// Owned and driven exclusively by the orchestrator.
pub trait IAdmissionControl: Send {
    /// Whether the next unit of work may proceed. Refusals are counted.
    fn can_proceed(&mut self) -> Admission;

    /// Record work that was admitted and performed.
    fn record_work(&mut self, units: u64) -> Result<(), BudgetError>;

    /// Total refusals issued so far.
    fn refusals(&self) -> u64;
}
