//! Consensus Service - Core coordination logic
//!
//! # Architecture
//! - Fan-out/fan-in: one task per validator, each with its own timeout
//! - Round deadline and cancellation bound the wait, never unbounded
//! - Seal + commit serialized by [`ChainWriter`]
//! - Log-then-respond: the audit log accepts a decision before it is returned
//! - Store writes (commit, audit append) run on the blocking pool, never on an
//!   async worker

mod chain_writer;
mod round_handle;


pub use chain_writer::ChainWriter;
pub use round_handle::RoundHandle;

use std::sync::Arc;
use std::time::{Duration, Instant};

use ac_01_validator_pool::{PoolError, PoolResult, Validator, ValidatorPoolApi};
use ac_03_boundary_enforcer::{BoundaryCheck, BoundaryEnforcer};
use ac_04_anchor_registry::{AnchorRegistryApi, RegistryError};
use ac_05_audit_log::AuditLogApi;
use anchor_telemetry::{log_anchor_event, log_validator_event};
use async_trait::async_trait;
use shared_types::{
    AnchorProposal, ConsensusDecision, DecisionOutcome, DecisionReason, SystemTimeSource,
    TimeSource, ValidatorId, Vote,
};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::adapters::RegistryAnchorReader;
use crate::domain::{
    decide, ConsensusConfig, ConsensusError, ConsensusResult, RoundParams, Tally,
    ValidatorFailure, Verdict, VoteBook,
};
use crate::metrics;
use crate::ports::{ConsensusApi, MisbehaviorDetector, RoundReport};

/// Dependencies for ConsensusService
pub struct ConsensusDependencies<P, R, A> {
    pub pool: Arc<P>,
    pub registry: Arc<R>,
    pub audit: Arc<A>,
    pub detector: Arc<dyn MisbehaviorDetector>,
    pub config: ConsensusConfig,
}

/// Consensus Service
pub struct ConsensusService<P, R, A>
where
    P: ValidatorPoolApi,
    R: AnchorRegistryApi,
    A: AuditLogApi,
{
    pool: Arc<P>,
    registry: Arc<R>,
    audit: Arc<A>,
    boundary: BoundaryEnforcer<RegistryAnchorReader<R>>,
    chain_writer: Arc<ChainWriter<R>>,
    detector: Arc<dyn MisbehaviorDetector>,
    config: ConsensusConfig,
    time_source: Arc<dyn TimeSource>,
}

/// Votes gathered by one fan-out.
struct Collected {
    book: VoteBook,
    failures: Vec<ValidatorFailure>,
    cancelled: bool,
}

impl<P, R, A> ConsensusService<P, R, A>
where
    P: ValidatorPoolApi,
    R: AnchorRegistryApi,
    A: AuditLogApi,
{
    /// Create a new ConsensusService
    pub fn new(deps: ConsensusDependencies<P, R, A>) -> ConsensusResult<Self> {
        deps.config.validate()?;
        let reader = Arc::new(RegistryAnchorReader::new(Arc::clone(&deps.registry)));

        Ok(Self {
            chain_writer: Arc::new(ChainWriter::new(Arc::clone(&deps.registry))?),
            boundary: BoundaryEnforcer::new(reader),
            pool: deps.pool,
            registry: deps.registry,
            audit: deps.audit,
            detector: deps.detector,
            config: deps.config,
            time_source: Arc::new(SystemTimeSource),
        })
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.boundary = self.boundary.with_time_source(Arc::clone(&time_source));
        // Unshared until the first round starts.
        if let Some(writer) = Arc::get_mut(&mut self.chain_writer) {
            writer.set_time_source(Arc::clone(&time_source));
        }
        self.time_source = time_source;
        self
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<P> {
        &self.pool
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn audit(&self) -> &Arc<A> {
        &self.audit
    }

    /// The boundary guard, including its violation ledger.
    pub fn boundary(&self) -> &BoundaryEnforcer<RegistryAnchorReader<R>> {
        &self.boundary
    }

    fn decision(
        &self,
        round_id: Uuid,
        proposal: &AnchorProposal,
        params: &RoundParams,
        verdict: Verdict,
        responded_count: usize,
        total_validators: usize,
    ) -> ConsensusDecision {
        ConsensusDecision {
            round_id,
            anchor_id: proposal.anchor_id.clone(),
            ratio_achieved: verdict.ratio,
            threshold_used: params.threshold,
            responded_count,
            total_validators,
            outcome: verdict.outcome,
            reason: verdict.reason,
            decided_at: self.time_source.now_millis(),
        }
    }

    /// Fold one validator's result into the round.
    fn absorb(
        &self,
        book: &mut VoteBook,
        failures: &mut Vec<ValidatorFailure>,
        validator_id: ValidatorId,
        result: PoolResult<Vote>,
    ) {
        match result {
            Ok(vote) => {
                if let Err(e) = book.record(vote) {
                    warn!(validator = %validator_id, error = %e, "vote refused");
                }
            }
            Err(PoolError::ValidatorUnavailable { cause, .. }) => {
                metrics::record_validator_failure(cause.label());
                debug!(validator = %validator_id, cause = %cause, "counted as abstain");
                failures.push(ValidatorFailure {
                    validator_id,
                    cause,
                });
            }
            Err(e) => {
                debug!(validator = %validator_id, error = %e, "counted as abstain");
            }
        }
    }

    /// Suspend whatever the detector flags.
    fn apply_detector(&self, report: &RoundReport<'_>) {
        for (validator_id, reason) in self.detector.inspect(report) {
            match self.pool.suspend(&validator_id, &reason) {
                Ok(_) => {
                    metrics::record_suspension();
                    log_validator_event!(
                        warn,
                        "consensus",
                        "validator suspended for misbehavior",
                        validator_id,
                        reason = %reason
                    );
                }
                Err(e) => debug!(validator = %validator_id, error = %e, "suspension skipped"),
            }
        }
    }
}

impl<P, R, A> ConsensusService<P, R, A>
where
    P: ValidatorPoolApi + 'static,
    R: AnchorRegistryApi + 'static,
    A: AuditLogApi + 'static,
{
    /// Log the decision, then hand it back.
    async fn finish(
        &self,
        decision: ConsensusDecision,
        votes: Vec<Vote>,
        failures: &[ValidatorFailure],
        started: Instant,
    ) -> ConsensusResult<ConsensusDecision> {
        let audit = Arc::clone(&self.audit);
        let logged = decision.clone();
        let entry = off_worker(move || audit.record_round(logged, votes)).await??;

        self.apply_detector(&RoundReport {
            decision: &decision,
            votes: &entry.votes,
            failures,
        });

        metrics::record_votes(&entry.votes);
        metrics::record_round(decision.outcome, started.elapsed().as_secs_f64());
        info!(
            outcome = decision.outcome.as_str(),
            reason = ?decision.reason,
            ratio = decision.ratio_achieved,
            responded = decision.responded_count,
            total = decision.total_validators,
            "round decided"
        );
        Ok(decision)
    }

    /// Run a round on its own task and return a cancellable handle.
    pub fn spawn_round(self: &Arc<Self>, proposal: AnchorProposal, params: RoundParams) -> RoundHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            service
                .propose_cancellable(proposal, params, cancel_rx)
                .await
        });
        RoundHandle::new(cancel_tx, task)
    }

    async fn run_round(
        &self,
        proposal: AnchorProposal,
        params: RoundParams,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> ConsensusResult<ConsensusDecision> {
        params.validate()?;
        let round_id = Uuid::new_v4();
        let span = info_span!(
            "consensus_round",
            %round_id,
            anchor_id = %proposal.anchor_id,
            threshold = params.threshold,
            min_responses = params.min_responses
        );
        self.execute_round(round_id, proposal, params, &mut cancel)
            .instrument(span)
            .await
    }

    async fn execute_round(
        &self,
        round_id: Uuid,
        proposal: AnchorProposal,
        params: RoundParams,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> ConsensusResult<ConsensusDecision> {
        let started = Instant::now();

        // 1. Boundary check. Conflicts end the round before any vote.
        let check = self.boundary.check(&proposal)?;
        if let BoundaryCheck::Conflict { kind, .. } = &check {
            let kind = *kind;
            self.boundary.record_violation(&proposal, &check);
            metrics::record_boundary_violation(kind);

            let verdict = Verdict {
                outcome: DecisionOutcome::Rejected,
                reason: Some(DecisionReason::BoundaryViolation { kind }),
                ratio: 0.0,
            };
            let total = self.pool.list_active().len();
            let decision = self.decision(round_id, &proposal, &params, verdict, 0, total);
            return self.finish(decision, Vec::new(), &[], started).await;
        }

        // 2-4. Fan out and collect until done, deadline or cancellation.
        let validators = self.pool.list_active();
        metrics::set_active_validators(validators.len());
        let collected = self
            .collect_votes(round_id, &proposal, &validators, params.deadline(), cancel)
            .await;

        // 5-7. Tally.
        let tally = Tally::from_votes(collected.book.votes(), &validators);
        let mut verdict = decide(
            &tally,
            &params,
            self.config.mode,
            self.config.min_distinct_groups,
            collected.cancelled,
        );

        // 8. Seal and commit accepted anchors.
        if verdict.outcome == DecisionOutcome::Accepted {
            let writer = Arc::clone(&self.chain_writer);
            let to_seal = proposal.clone();
            match off_worker(move || writer.seal_and_commit(&to_seal)).await? {
                Ok(sealed) => {
                    metrics::record_seal();
                    log_anchor_event!(
                        info,
                        "consensus",
                        "anchor sealed",
                        sealed.anchor_id,
                        sealed_at = sealed.sealed_at
                    );
                }
                Err(RegistryError::DuplicateAnchor(_)) => {
                    warn!("commit race lost to a concurrent round; rejecting");
                    verdict.outcome = DecisionOutcome::Rejected;
                    verdict.reason = Some(DecisionReason::DuplicateAnchor);
                }
                Err(RegistryError::PayloadCollision { existing, .. }) => {
                    warn!(existing = %existing, "payload sealed by another owner meanwhile; rejecting");
                    verdict.outcome = DecisionOutcome::Rejected;
                    verdict.reason = Some(DecisionReason::PayloadCollision);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let decision = self.decision(
            round_id,
            &proposal,
            &params,
            verdict,
            tally.responded_count(),
            validators.len(),
        );
        let Collected { book, failures, .. } = collected;
        self.finish(decision, book.into_votes(), &failures, started)
            .await
    }

    async fn collect_votes(
        &self,
        round_id: Uuid,
        proposal: &AnchorProposal,
        validators: &[Validator],
        deadline: Duration,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> Collected {
        let per_call = self.config.per_call_timeout().min(deadline);
        let mut book = VoteBook::new(proposal.anchor_id.clone());
        let mut failures = Vec::new();
        let mut cancelled = false;

        let mut tasks = JoinSet::new();
        for validator in validators {
            let pool = Arc::clone(&self.pool);
            let proposal = proposal.clone();
            let validator_id = validator.id.clone();
            tasks.spawn(async move {
                let result = pool.assess(&validator_id, round_id, &proposal, per_call).await;
                (validator_id, result)
            });
        }

        let round_deadline = tokio::time::sleep(deadline);
        tokio::pin!(round_deadline);

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok((validator_id, result))) => {
                        self.absorb(&mut book, &mut failures, validator_id, result);
                    }
                    Some(Err(e)) => warn!(error = %e, "assessment task failed"),
                },
                _ = &mut round_deadline => {
                    debug!(outstanding = tasks.len(), "round deadline reached");
                    break;
                }
                _ = wait_cancelled(cancel) => {
                    info!(outstanding = tasks.len(), votes = book.len(), "round cancelled");
                    cancelled = true;
                    break;
                }
            }
        }
        tasks.abort_all();

        let now = self.time_source.now_millis();
        for validator in validators {
            if !book.has_voted(&validator.id) {
                let abstain = Vote::abstain(validator.id.clone(), proposal.anchor_id.clone(), now);
                if let Err(e) = book.record(abstain) {
                    warn!(validator = %validator.id, error = %e, "abstain refused");
                }
            }
        }

        Collected {
            book,
            failures,
            cancelled,
        }
    }
}

/// Resolves once the round is cancelled. Never resolves without a signal,
/// or once the sender is gone.
/// Run blocking store work on the blocking pool.
async fn off_worker<T, F>(work: F) -> ConsensusResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ConsensusError::RoundAborted(format!("storage task failed: {e}")))
}

async fn wait_cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = cancel.as_mut() {
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
    *cancel = None;
    std::future::pending::<()>().await
}

#[async_trait]
impl<P, R, A> ConsensusApi for ConsensusService<P, R, A>
where
    P: ValidatorPoolApi + 'static,
    R: AnchorRegistryApi + 'static,
    A: AuditLogApi + 'static,
{
    async fn propose(
        &self,
        proposal: AnchorProposal,
        params: RoundParams,
    ) -> ConsensusResult<ConsensusDecision> {
        self.run_round(proposal, params, None).await
    }

    async fn propose_cancellable(
        &self,
        proposal: AnchorProposal,
        params: RoundParams,
        cancel: watch::Receiver<bool>,
    ) -> ConsensusResult<ConsensusDecision> {
        self.run_round(proposal, params, Some(cancel)).await
    }
}
