//! Data model shared by every Anchorwatch subsystem.

pub mod admission;
pub mod anchor;
pub mod attestation;
pub mod authorization;
pub mod checkpoint;
pub mod comparison;
pub mod eri;
pub mod finding;
pub mod kpi;
pub mod proposal;
pub mod refusal;
pub mod repair;
pub mod signature;
pub mod telemetry_request;

pub use admission::Admission;
pub use anchor::{Anchor, AnchorId, Consent, ConsentTier, PolicySnapshot, TelemetryFields, Tolerance};
pub use attestation::{Attestation, MinimizedTelemetry, RawAttestation};
pub use authorization::{AuthorizationDecision, ExecutionResult};
pub use checkpoint::{Checkpoint, CycleCounts, CycleSummary};
pub use comparison::{Comparison, Divergence, DivergenceKind};
pub use eri::{EriBand, RawEri};
pub use finding::{Finding, FindingStatus, SensorCategory, Severity};
pub use kpi::{KpiDirection, KpiValue};
pub use proposal::{PolicyTarget, ProposalEvidence, ProposalRecord, ProposalStatus, ProposedChange};
pub use refusal::{Collaborator, RefusalReason, RejectionReason};
pub use repair::{Repair, RepairDraft, RepairStatus, RepairTransition, RepairType};
pub use signature::Signature;
pub use telemetry_request::TelemetryRequest;
