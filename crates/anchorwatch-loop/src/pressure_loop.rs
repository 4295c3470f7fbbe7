//! [`PressureLoop`]: the orchestrator.
//!
//! Owns all cross-cycle mutable state (pressure budget, repair ledger,
//! effectiveness windows, checkpoint chain, KPIs) and is the only code that
//! mutates it, at fixed points of the cycle: after admission, after the
//! anchor batch, after the checkpoint.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use anchorwatch_budget::PressureBudget;
use anchorwatch_checkpoint::{ChainReport, CheckpointLog, JsonlCheckpointSink, MemoryCheckpointSink};
use anchorwatch_confidence::{ConfidenceFloorEnforcer, EriDisplay, EriScorer};
use anchorwatch_core::constants::MAX_CYCLE_BATCH;
use anchorwatch_core::errors::RepairError;
use anchorwatch_core::models::{
    Admission, Anchor, AnchorId, Collaborator, Comparison, CycleCounts, CycleSummary, EriBand,
    Finding, ProposalRecord, RawAttestation, RefusalReason, RejectionReason, RepairDraft,
    RepairStatus, TelemetryRequest,
};
use uuid::Uuid;
use anchorwatch_core::traits::{IAdmissionControl, ICheckpointSink, IMinimizer, IPolicyGovernance};
use anchorwatch_core::{AnchorwatchConfig, AnchorwatchError, AnchorwatchResult};
use anchorwatch_learning::{EffectivenessTracker, ProposalLog};
use anchorwatch_observability::tracing_setup::events;
use anchorwatch_observability::{
    CycleSample, DegradationEvent, DegradationTracker, HealthReport, HealthReporter, KpiRegistry,
};
use anchorwatch_privacy::AllowListMinimizer;
use anchorwatch_repair::{AuthorityOutcome, ExecutionAttempt, ExecutionOutcome, RepairLedger};
use anchorwatch_sensors::{compare, repair_payload, SensorRegistry};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Semaphore};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::backoff::RetryBackoff;
use crate::collaborators::Collaborators;
use crate::evaluation::{AnchorEvaluation, Evaluator};
use crate::handle::LoopHandle;
use crate::report::{CycleOutcome, CycleReport, LoopEvent};

/// Everything one cycle accumulates before it is sealed.
#[derive(Default)]
struct CycleTally {
    counts: CycleCounts,
    confidences: Vec<f64>,
    effectiveness: Vec<f64>,
    telemetry_requests: Vec<TelemetryRequest>,
    proposals: Vec<ProposalRecord>,
    answered: BTreeSet<Collaborator>,
    failed: BTreeSet<Collaborator>,
}

pub struct PressureLoop {
    config: AnchorwatchConfig,
    collaborators: Collaborators,
    evaluator: Arc<Evaluator>,
    budget: PressureBudget,
    ledger: RepairLedger,
    tracker: EffectivenessTracker,
    governance: Box<dyn IPolicyGovernance>,
    checkpoints: CheckpointLog,
    kpis: KpiRegistry,
    degradations: DegradationTracker,
    /// Latest view of every anchor seen, for post-repair comparisons.
    known_anchors: HashMap<AnchorId, Anchor>,
    backoff: RetryBackoff,
    cycle: u64,
    events: broadcast::Sender<LoopEvent>,
}

impl std::fmt::Debug for PressureLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressureLoop")
            .field("cycle", &self.cycle)
            .field("budget", &self.budget)
            .field("checkpoints", &self.checkpoints)
            .field("known_anchors", &self.known_anchors.len())
            .finish_non_exhaustive()
    }
}

impl PressureLoop {
    /// Build a loop from validated configuration. The checkpoint chain is a
    /// JSONL file when `checkpoint.path` is set, in-memory otherwise.
    pub fn new(config: AnchorwatchConfig, collaborators: Collaborators) -> AnchorwatchResult<Self> {
        config.validate()?;
        let sink: Box<dyn ICheckpointSink> = match &config.checkpoint.path {
            Some(path) => Box::new(JsonlCheckpointSink::new(path)),
            None => Box::new(MemoryCheckpointSink::new()),
        };
        let evaluator = Evaluator {
            collector: Arc::clone(&collaborators.collector),
            signer: Arc::clone(&collaborators.signer),
            minimizer: AllowListMinimizer::new(config.minimization.clone()),
            sensors: SensorRegistry::with_builtins(&config.sensors)?,
            scorer: EriScorer::new(),
            gate: Arc::new(ConfidenceFloorEnforcer::new(config.confidence.clone())),
        };
        let (events, _) = broadcast::channel(config.observability.event_channel_capacity.max(1));

        Ok(Self {
            budget: PressureBudget::from_config(&config.budget)?,
            ledger: RepairLedger::new(config.repair.staged_ttl_cycles),
            tracker: EffectivenessTracker::new(config.effectiveness.clone()),
            governance: Box::new(ProposalLog::new()),
            checkpoints: CheckpointLog::open(sink)?,
            kpis: KpiRegistry::from_config(&config),
            degradations: DegradationTracker::new(),
            known_anchors: HashMap::new(),
            backoff: RetryBackoff::from_config(&config.pressure_loop),
            cycle: 0,
            evaluator: Arc::new(evaluator),
            collaborators,
            config,
            events,
        })
    }

    /// Replace the governance boundary (e.g. a journaled [`ProposalLog`]).
    pub fn with_governance(mut self, governance: Box<dyn IPolicyGovernance>) -> Self {
        self.governance = governance;
        self
    }

    /// Replace the checkpoint sink, resuming whatever chain it holds.
    pub fn with_checkpoint_sink(mut self, sink: Box<dyn ICheckpointSink>) -> AnchorwatchResult<Self> {
        self.checkpoints = CheckpointLog::open(sink)?;
        Ok(self)
    }

    /// Run the loop on the current runtime until stopped.
    pub fn spawn(mut self) -> LoopHandle {
        let (stop, mut stop_rx) = watch::channel(false);
        let events = self.events.clone();
        let join = tokio::spawn(async move {
            loop {
                if *stop_rx.borrow() {
                    break;
                }
                let delay = match self.run_cycle().await {
                    Ok(report) => report.next_delay,
                    Err(e) => {
                        tracing::error!(error = %e, cycle = self.cycle + 1, "cycle aborted");
                        self.backoff.next_delay()
                    }
                };
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::info!(event = "loop_stopped", cycles = self.cycle, "pressure loop stopped");
            let _ = self.events.send(LoopEvent::Stopped { cycles: self.cycle });
            self
        });
        LoopHandle { stop, events, join }
    }

    /// Run exactly one cycle: admission, batch evaluation, repair handling,
    /// checkpoint, KPIs, publication.
    pub async fn run_cycle(&mut self) -> AnchorwatchResult<CycleReport> {
        let cycle = self.cycle + 1;
        let span = anchorwatch_observability::cycle_span!(cycle);
        self.run_cycle_inner(cycle).instrument(span).await
    }

    async fn run_cycle_inner(&mut self, cycle: u64) -> AnchorwatchResult<CycleReport> {
        let started_at = Utc::now();

        let remaining = match self.budget.can_proceed() {
            Admission::Allowed { remaining_units } => remaining_units,
            Admission::Refused { reason, backoff } => {
                return Ok(self.refuse(cycle, started_at, reason, backoff));
            }
        };
        let per_anchor = self.config.budget.units_per_anchor.max(1);
        let capacity = usize::try_from(remaining / per_anchor)
            .unwrap_or(usize::MAX)
            .min(self.config.pressure_loop.batch_size)
            .min(MAX_CYCLE_BATCH);
        if capacity == 0 {
            let backoff = self.tick();
            return Ok(self.refuse(cycle, started_at, RefusalReason::BudgetExhausted, backoff));
        }

        let source = Arc::clone(&self.collaborators.anchors);
        let listed = blocking(move || source.list_consented_anchors(capacity)).await?;
        let anchors: Vec<Anchor> = match listed {
            Ok(anchors) => {
                self.backoff.reset();
                self.recovered(Collaborator::AnchorSource);
                anchors
                    .into_iter()
                    .filter(Anchor::is_collectable)
                    .take(capacity)
                    .collect()
            }
            Err(e) => {
                self.degraded(e.collaborator(), e.to_string(), "refuse cycle");
                let backoff = self.backoff.next_delay();
                let reason = RefusalReason::CollaboratorUnavailable {
                    collaborator: e.collaborator(),
                };
                return Ok(self.refuse(cycle, started_at, reason, backoff));
            }
        };

        let admitted = anchors.len() as u64;
        let evaluator = Arc::clone(&self.evaluator);
        let max_concurrency = self.config.pressure_loop.max_concurrency;
        let evaluations = Self::evaluate_batch(evaluator, max_concurrency, anchors, cycle).await;
        if let Err(e) = self.budget.record_work(admitted * per_anchor) {
            tracing::warn!(error = %e, "cycle work not recorded against the budget");
        }

        let mut tally = CycleTally::default();
        for evaluation in evaluations {
            self.settle_anchor(evaluation, cycle, &mut tally).await?;
        }
        self.expire_repairs(cycle, &mut tally);
        if self.config.repair.execution_enabled {
            self.poll_authority(&mut tally).await?;
            self.execute_repairs(&mut tally).await?;
        } else {
            let waiting = self.ledger.with_status(RepairStatus::Staged);
            for id in &waiting {
                if let Some(repair) = self.ledger.get(*id) {
                    events::anchor_refused(&repair.anchor_id, &RefusalReason::ExecutionDisabled);
                }
            }
        }
        for collaborator in tally.answered.difference(&tally.failed).copied().collect::<Vec<_>>() {
            self.recovered(collaborator);
        }

        let finished_at = Utc::now();
        let counts = tally.counts;
        let checkpoint_hash = match self.checkpoints.commit(CycleSummary {
            cycle,
            started_at,
            finished_at,
            counts,
        }) {
            Ok(hash) => {
                self.recovered(Collaborator::CheckpointSink);
                Some(hash)
            }
            Err(e) => {
                self.degraded(Collaborator::CheckpointSink, e.to_string(), "cycle not checkpointed");
                None
            }
        };
        self.cycle = cycle;

        self.kpis.record_cycle(CycleSample {
            refusal: None,
            anchors_evaluated: counts.anchors_evaluated,
            incoherent: counts.incoherent,
            indeterminate: counts.indeterminate,
            average_confidence: mean(&tally.confidences),
            repairs_staged: counts.repairs_staged,
            repairs_executed: counts.repairs_executed,
            repairs_rejected: counts.repairs_rejected,
            effectiveness: mean(&tally.effectiveness),
        });

        let next_delay = if tally.telemetry_requests.is_empty() {
            self.tick()
        } else {
            self.tick()
                .max(Duration::from_millis(self.config.pressure_loop.indeterminate_backoff_ms))
        };
        events::cycle_completed(
            cycle,
            counts.anchors_evaluated,
            counts.incoherent,
            counts.indeterminate,
            u64::try_from((finished_at - started_at).num_milliseconds()).unwrap_or(0),
        );
        let report = CycleReport {
            cycle,
            outcome: CycleOutcome::Completed { checkpoint_hash },
            started_at,
            finished_at,
            counts,
            telemetry_requests: tally.telemetry_requests,
            proposals: tally.proposals,
            kpis: self.kpis.snapshot(),
            next_delay,
        };
        let _ = self.events.send(LoopEvent::Cycle(report.clone()));

        let every = self.config.checkpoint.verify_every_cycles;
        if every > 0 && cycle % every == 0 {
            if let Err(e) = self.verify_checkpoints() {
                tracing::error!(error = %e, "checkpoint chain unreadable");
                events::integrity_failure(None, 0, 0, false);
                self.kpis.set_checkpoint_integrity(false);
            }
        }
        Ok(report)
    }

    /// Collect, minimize, sign and sense every admitted anchor, at most
    /// `max_concurrency` at a time. Results come back in batch order, one per
    /// anchor; an evaluation that panicked or was cancelled comes back with
    /// reality unavailable.
    async fn evaluate_batch(
        evaluator: Arc<Evaluator>,
        max_concurrency: usize,
        anchors: Vec<Anchor>,
        cycle: u64,
    ) -> Vec<AnchorEvaluation> {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for (index, anchor) in anchors.iter().cloned().enumerate() {
            let evaluator = Arc::clone(&evaluator);
            let semaphore = Arc::clone(&semaphore);
            let span = anchorwatch_observability::anchor_span!(anchor.id, cycle);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || {
                        let _entered = span.enter();
                        evaluator.evaluate(anchor, cycle)
                    })
                    .await
                    .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<AnchorEvaluation>> = anchors.iter().map(|_| None).collect();
        let mut reasons: Vec<Option<String>> = anchors.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(evaluation))) => slots[index] = Some(evaluation),
                Ok((index, Err(reason))) => reasons[index] = Some(reason),
                Err(e) => tracing::error!(error = %e, "anchor evaluation task failed"),
            }
        }

        anchors
            .into_iter()
            .zip(slots.into_iter().zip(reasons))
            .map(|(anchor, (slot, reason))| match slot {
                Some(evaluation) => evaluation,
                None => {
                    let reason = reason.unwrap_or_else(|| "evaluation task lost".to_string());
                    tracing::error!(anchor_id = %anchor.id, reason = %reason, "anchor evaluation aborted");
                    evaluator.aborted(anchor, reason)
                }
            })
            .collect()
    }

    /// Count one anchor's result, gate it on confidence and, when it scores
    /// critical, stage at most one repair for it.
    async fn settle_anchor(
        &mut self,
        evaluation: AnchorEvaluation,
        cycle: u64,
        tally: &mut CycleTally,
    ) -> AnchorwatchResult<()> {
        let AnchorEvaluation {
            mut anchor,
            attestation,
            comparison,
            findings,
            eri,
            failures,
            answered,
            malformed,
        } = evaluation;

        tally.counts.anchors_evaluated += 1;
        if comparison.coherent {
            tally.counts.coherent += 1;
        } else {
            tally.counts.incoherent += 1;
        }
        tally.confidences.push(eri.confidence());
        tally.answered.extend(answered);
        for failure in failures {
            tally.counts.collaborator_failures += 1;
            tally.failed.insert(failure.collaborator);
            self.degraded(failure.collaborator, failure.reason, "reality unavailable");
        }
        if malformed {
            tracing::warn!(anchor_id = %anchor.id, "telemetry payload was not an object");
        }

        if let Some(previous) = self.known_anchors.get(&anchor.id) {
            anchor.last_reality = previous.last_reality.clone();
            anchor.last_sampled_at = previous.last_sampled_at;
            anchor.sample_count = previous.sample_count;
        }
        if let Some(attestation) = &attestation {
            anchor.record_sample(attestation.fields.clone(), attestation.collected_at);
        }

        match eri.display() {
            EriDisplay::Indeterminate => {
                tally.counts.indeterminate += 1;
                events::anchor_refused(&anchor.id, &RefusalReason::LowConfidence);
                self.request_telemetry(&anchor.id, eri.missing_inputs(), eri.confidence(), cycle, tally)
                    .await?;
            }
            EriDisplay::Scored { band, .. } => match band {
                EriBand::Safe => tally.counts.safe += 1,
                EriBand::Warning => tally.counts.warning += 1,
                EriBand::Critical => {
                    tally.counts.critical += 1;
                    self.stage_repair(&anchor, &comparison, &findings, cycle, tally)
                        .await?;
                }
            },
        }
        self.known_anchors.insert(anchor.id.clone(), anchor);
        Ok(())
    }

    async fn request_telemetry(
        &mut self,
        anchor_id: &AnchorId,
        missing: &[String],
        confidence: f64,
        cycle: u64,
        tally: &mut CycleTally,
    ) -> AnchorwatchResult<()> {
        let request = TelemetryRequest {
            anchor_id: anchor_id.clone(),
            cycle,
            missing_inputs: missing.to_vec(),
            requested_at: Utc::now(),
        };
        events::telemetry_requested(anchor_id, missing, confidence);
        let collector = Arc::clone(&self.collaborators.collector);
        let sent = request.clone();
        match blocking(move || collector.request_telemetry(&sent)).await? {
            Ok(()) => {
                tally.counts.telemetry_requests += 1;
                tally.telemetry_requests.push(request);
            }
            Err(e) => {
                tally.counts.collaborator_failures += 1;
                tally.failed.insert(e.collaborator());
                self.degraded(e.collaborator(), e.to_string(), "telemetry request dropped");
            }
        }
        Ok(())
    }

    /// Stage the most severe auto-stageable drift finding, unless the
    /// anchor already has an open repair.
    async fn stage_repair(
        &mut self,
        anchor: &Anchor,
        comparison: &Comparison,
        findings: &[Finding],
        cycle: u64,
        tally: &mut CycleTally,
    ) -> AnchorwatchResult<()> {
        if self.ledger.open_for(&anchor.id).is_some() {
            return Ok(());
        }
        let Some(finding) = findings
            .iter()
            .filter(|f| f.stages_repair())
            .max_by_key(|f| f.severity)
        else {
            return Ok(());
        };
        let Some(repair_type) = finding.repair_type else {
            return Ok(());
        };
        let payload = repair_payload(finding, &anchor.policy);
        if payload.is_empty() {
            tracing::debug!(anchor_id = %anchor.id, sensor = %finding.sensor_id, "no intent values to restore");
            return Ok(());
        }

        let draft = RepairDraft::new(
            anchor.id.clone(),
            repair_type,
            payload,
            cycle,
            finding.sensor_id.clone(),
        );
        let preimage = match draft.preimage() {
            Ok(preimage) => preimage,
            Err(e) => {
                tracing::warn!(anchor_id = %anchor.id, error = %e, "repair not staged");
                return Ok(());
            }
        };
        let signer = Arc::clone(&self.collaborators.signer);
        let staged = match blocking(move || signer.sign(&preimage)).await? {
            Ok(signature) => self
                .ledger
                .stage_signed(draft, comparison.clone(), signature, Utc::now()),
            Err(e) => Err(RepairError::Signing(e)),
        };
        match staged {
            Ok(id) => {
                tally.counts.repairs_staged += 1;
                tally.answered.insert(Collaborator::SigningService);
                events::repair_staged(&id, &anchor.id, &repair_type);
            }
            Err(RepairError::Signing(e)) => {
                tally.counts.collaborator_failures += 1;
                tally.failed.insert(Collaborator::SigningService);
                self.degraded(Collaborator::SigningService, e.to_string(), "repair not staged");
            }
            Err(e) => tracing::warn!(anchor_id = %anchor.id, error = %e, "repair not staged"),
        }
        Ok(())
    }

    fn expire_repairs(&mut self, cycle: u64, tally: &mut CycleTally) {
        for id in self.ledger.expire(cycle, Utc::now()) {
            tally.counts.repairs_rejected += 1;
            if let Some(repair) = self.ledger.get(id) {
                events::repair_rejected(&id, &repair.anchor_id, &RejectionReason::Expired);
            }
        }
    }

    /// Ask the authority about every STAGED repair. Silence is never consent.
    async fn poll_authority(&mut self, tally: &mut CycleTally) -> AnchorwatchResult<()> {
        for id in self.ledger.with_status(RepairStatus::Staged) {
            let authority = Arc::clone(&self.collaborators.authority);
            let answer = blocking(move || authority.get_authorization(id)).await?;
            match self.ledger.record_decision(id, answer, Utc::now()) {
                Ok(AuthorityOutcome::Pending { unreachable }) => {
                    tally.counts.authority_pending += 1;
                    if unreachable {
                        tally.counts.collaborator_failures += 1;
                        tally.failed.insert(Collaborator::AuthoritySource);
                        self.degraded(
                            Collaborator::AuthoritySource,
                            format!("no answer for repair {id}"),
                            "treat as pending",
                        );
                    } else {
                        tally.answered.insert(Collaborator::AuthoritySource);
                        if let Some(repair) = self.ledger.get(id) {
                            events::anchor_refused(&repair.anchor_id, &RefusalReason::AuthorityPending);
                        }
                    }
                }
                Ok(AuthorityOutcome::Authorized { .. }) => {
                    tally.counts.repairs_authorized += 1;
                    tally.answered.insert(Collaborator::AuthoritySource);
                }
                Ok(AuthorityOutcome::Denied { authority, reason }) => {
                    tally.counts.repairs_rejected += 1;
                    tally.answered.insert(Collaborator::AuthoritySource);
                    if let Some(repair) = self.ledger.get(id) {
                        events::repair_rejected(
                            &id,
                            &repair.anchor_id,
                            &RejectionReason::AuthorityDenied { authority, reason },
                        );
                    }
                }
                Err(e) => tracing::warn!(repair_id = %id, error = %e, "authority poll skipped"),
            }
        }
        Ok(())
    }

    /// Verify and apply every AUTHORIZED repair, then score it.
    async fn execute_repairs(&mut self, tally: &mut CycleTally) -> AnchorwatchResult<()> {
        for id in self.ledger.with_status(RepairStatus::Authorized) {
            let span = anchorwatch_observability::repair_span!(id);
            self.execute_repair(id, tally).instrument(span).await?;
        }
        Ok(())
    }

    async fn execute_repair(&mut self, id: Uuid, tally: &mut CycleTally) -> AnchorwatchResult<()> {
        let Some(repair) = self.ledger.get(id).cloned() else {
            return Ok(());
        };
        let signer = Arc::clone(&self.collaborators.signer);
        let backend = Arc::clone(&self.collaborators.backend);
        let attempt =
            blocking(move || ExecutionAttempt::run(&repair, signer.as_ref(), backend.as_ref())).await?;
        let outcome =
            attempt.and_then(|attempt| self.ledger.settle_execution(id, attempt, Utc::now()));
        match outcome {
            Ok(ExecutionOutcome::Executed {
                repair_id,
                anchor_id,
                repair_type,
                pre_state,
                post_state,
            }) => {
                tally.counts.repairs_executed += 1;
                tally.answered.insert(Collaborator::ExecutionBackend);
                let post = self.post_comparison(&anchor_id, &pre_state, post_state.as_ref());
                match self.tracker.track_repair(
                    repair_id,
                    repair_type,
                    &pre_state,
                    &post,
                    self.governance.as_mut(),
                ) {
                    Ok(tracked) => {
                        tally.effectiveness.push(tracked.score);
                        events::repair_executed(&repair_id, &anchor_id, tracked.score);
                        if let Some(proposal) = tracked.proposal {
                            tally.counts.proposals += 1;
                            events::proposal_emitted(
                                &proposal.id,
                                &repair_type,
                                tracked.rolling_average,
                            );
                            tally.proposals.push(proposal);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(repair_id = %repair_id, error = %e, "effectiveness not tracked");
                    }
                }
            }
            Ok(ExecutionOutcome::Rejected { repair_id, reason }) => {
                tally.counts.repairs_rejected += 1;
                if let Some(repair) = self.ledger.get(repair_id) {
                    events::repair_rejected(&repair_id, &repair.anchor_id, &reason);
                }
            }
            Ok(ExecutionOutcome::Deferred {
                repair_id,
                collaborator,
            }) => {
                tally.counts.collaborator_failures += 1;
                tally.failed.insert(collaborator);
                self.degraded(
                    collaborator,
                    format!("repair {repair_id} deferred"),
                    "keep repair authorized",
                );
            }
            Err(e) => tracing::warn!(repair_id = %id, error = %e, "repair not executed"),
        }
        Ok(())
    }

    /// Compare the backend-reported post-state against the anchor's policy.
    /// No usable post-state means reality is unavailable.
    fn post_comparison(
        &self,
        anchor_id: &AnchorId,
        pre_state: &Comparison,
        post_state: Option<&RawAttestation>,
    ) -> Comparison {
        let Some(anchor) = self.known_anchors.get(anchor_id) else {
            return Comparison::reality_unavailable(
                anchor_id.clone(),
                pre_state.intent.clone(),
                pre_state.projection.clone(),
            );
        };
        let reality = post_state
            .filter(|raw| raw.anchor_id == *anchor_id)
            .map(|raw| self.evaluator.minimizer.minimize(raw, anchor.consent.tier))
            .filter(|minimized| !minimized.malformed)
            .map(|minimized| minimized.fields);
        compare(anchor_id, &anchor.policy, reality.as_ref())
    }

    fn refuse(
        &mut self,
        cycle: u64,
        started_at: DateTime<Utc>,
        reason: RefusalReason,
        backoff: Duration,
    ) -> CycleReport {
        events::cycle_refused(
            cycle,
            &reason,
            u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
        );
        self.kpis.record_cycle(CycleSample::refused(reason.clone()));
        let report = CycleReport {
            cycle,
            outcome: CycleOutcome::Refused { reason, backoff },
            started_at,
            finished_at: Utc::now(),
            counts: CycleCounts::default(),
            telemetry_requests: Vec::new(),
            proposals: Vec::new(),
            kpis: self.kpis.snapshot(),
            next_delay: backoff,
        };
        let _ = self.events.send(LoopEvent::Cycle(report.clone()));
        report
    }

    /// Recompute the checkpoint chain. A broken chain is reported loudly,
    /// drops the integrity KPI to zero and is published to subscribers.
    pub fn verify_checkpoints(&mut self) -> AnchorwatchResult<ChainReport> {
        let report = self.checkpoints.verify()?;
        if report.is_intact() {
            if !self.checkpoints.is_compromised() {
                self.kpis.set_checkpoint_integrity(true);
            }
        } else {
            events::integrity_failure(
                report.first_broken(),
                report.broken.len(),
                report.gaps.len(),
                report.tail.is_some(),
            );
            self.kpis.set_checkpoint_integrity(false);
            let _ = self.events.send(LoopEvent::IntegrityFailure(report.clone()));
        }
        Ok(report)
    }

    /// Operator acknowledgement of a compromised chain.
    pub fn reconcile_checkpoints(&mut self, operator: &str) -> AnchorwatchResult<()> {
        self.checkpoints.reconcile(operator)?;
        self.kpis.set_checkpoint_integrity(true);
        Ok(())
    }

    fn degraded(&mut self, collaborator: Collaborator, failure: String, fallback: &str) {
        self.degradations.record(DegradationEvent {
            collaborator,
            failure,
            fallback: fallback.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn recovered(&mut self, collaborator: Collaborator) {
        if self.degradations.is_degraded(collaborator) {
            self.degradations.mark_recovered(collaborator, Utc::now());
        }
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.config.pressure_loop.tick_ms)
    }

    /// Completed cycles so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn config(&self) -> &AnchorwatchConfig {
        &self.config
    }

    pub fn budget(&self) -> &PressureBudget {
        &self.budget
    }

    pub fn ledger(&self) -> &RepairLedger {
        &self.ledger
    }

    pub fn effectiveness(&self) -> &EffectivenessTracker {
        &self.tracker
    }

    pub fn checkpoints(&self) -> &CheckpointLog {
        &self.checkpoints
    }

    pub fn kpis(&self) -> &KpiRegistry {
        &self.kpis
    }

    pub fn degradations(&self) -> &DegradationTracker {
        &self.degradations
    }

    pub fn proposals(&self) -> Vec<ProposalRecord> {
        self.governance.proposals()
    }

    pub fn health(&self) -> HealthReport {
        HealthReporter::report(&self.kpis, &self.degradations)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoopEvent> {
        self.events.subscribe()
    }
}

/// Run a synchronous collaborator call off the async worker.
async fn blocking<T, F>(call: F) -> AnchorwatchResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|_| AnchorwatchError::Cancelled)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
