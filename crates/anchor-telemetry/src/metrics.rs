//! Prometheus metrics for Anchor-Chain subsystems.
//!
//! All metrics follow the naming convention: `ac_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CONSENSUS METRICS (ac-06)
    // =========================================================================

    /// Finished rounds by outcome (accepted, rejected, insufficient_quorum)
    pub static ref ROUNDS: IntCounterVec = IntCounterVec::new(
        Opts::new("ac_consensus_rounds_total", "Consensus rounds by outcome"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Wall time of a round from boundary check to logged decision
    pub static ref ROUND_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ac_consensus_round_duration_seconds",
            "Time from proposal to logged decision"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Collected votes by assessment (accept, reject, abstain)
    pub static ref VOTES: IntCounterVec = IntCounterVec::new(
        Opts::new("ac_consensus_votes_total", "Votes collected by assessment"),
        &["assessment"]
    ).expect("metric creation failed");

    // =========================================================================
    // VALIDATOR POOL METRICS (ac-01)
    // =========================================================================

    /// Failed or unauthenticated validator calls by cause
    pub static ref VALIDATOR_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("ac_pool_validator_failures_total", "Unusable validator responses by cause"),
        &["cause"]
    ).expect("metric creation failed");

    /// Validators suspended for misbehavior
    pub static ref SUSPENSIONS: IntCounter = IntCounter::new(
        "ac_pool_suspensions_total",
        "Validators suspended"
    ).expect("metric creation failed");

    /// Validators currently taking part in fan-outs
    pub static ref ACTIVE_VALIDATORS: IntGauge = IntGauge::new(
        "ac_pool_active_validators",
        "Number of active validators"
    ).expect("metric creation failed");

    // =========================================================================
    // SEALING AND BOUNDARY METRICS (ac-02, ac-03, ac-04)
    // =========================================================================

    /// Seals committed to the registry
    pub static ref SEALS_COMMITTED: IntCounter = IntCounter::new(
        "ac_registry_seals_committed_total",
        "Seals committed to the anchor chain"
    ).expect("metric creation failed");

    /// Boundary violations by conflict kind
    pub static ref BOUNDARY_VIOLATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("ac_boundary_violations_total", "Rejected conflicting proposals by kind"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Handle returned once metrics are registered.
pub struct MetricsHandle {
    _registered: usize,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Consensus
        Box::new(ROUNDS.clone()),
        Box::new(ROUND_DURATION.clone()),
        Box::new(VOTES.clone()),
        // Pool
        Box::new(VALIDATOR_FAILURES.clone()),
        Box::new(SUSPENSIONS.clone()),
        Box::new(ACTIVE_VALIDATORS.clone()),
        // Chain
        Box::new(SEALS_COMMITTED.clone()),
        Box::new(BOUNDARY_VIOLATIONS.clone()),
    ];

    let count = metrics.len();
    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registered: count,
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
