use crate::errors::GovernanceError;
use crate::models::{PolicyTarget, ProposalEvidence, ProposalRecord, ProposedChange};

/// The only channel from learning back to policy.
///
/// There is deliberately no method that changes live policy: implementations
/// record proposals for out-of-band review and nothing else.
pub trait IPolicyGovernance: Send + Sync {
    fn propose_change(
        &mut self,
        target: PolicyTarget,
        change: ProposedChange,
        evidence: ProposalEvidence,
    ) -> Result<ProposalRecord, GovernanceError>;

    /// Every proposal recorded so far, in order.
    fn proposals(&self) -> Vec<ProposalRecord>;
}
