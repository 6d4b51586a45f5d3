//! # Consensus Metrics
//!
//! Recording hooks for the Prometheus metrics defined in `anchor-telemetry`.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! ac-06-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! Without the feature every function here is a no-op.

#[cfg(feature = "metrics")]
use anchor_telemetry::metrics::{
    ACTIVE_VALIDATORS, BOUNDARY_VIOLATIONS, ROUNDS, ROUND_DURATION, SEALS_COMMITTED, SUSPENSIONS,
    VALIDATOR_FAILURES, VOTES,
};
use shared_types::{ConflictKind, DecisionOutcome, Vote};

/// Record a finished round
#[cfg(feature = "metrics")]
pub fn record_round(outcome: DecisionOutcome, seconds: f64) {
    ROUNDS.with_label_values(&[outcome.as_str()]).inc();
    ROUND_DURATION.observe(seconds);
}

/// Record the votes of a round by assessment
#[cfg(feature = "metrics")]
pub fn record_votes(votes: &[Vote]) {
    for vote in votes {
        VOTES.with_label_values(&[vote.assessment.as_str()]).inc();
    }
}

/// Record an unusable validator response
#[cfg(feature = "metrics")]
pub fn record_validator_failure(cause: &str) {
    VALIDATOR_FAILURES.with_label_values(&[cause]).inc();
}

/// Record a suspension
#[cfg(feature = "metrics")]
pub fn record_suspension() {
    SUSPENSIONS.inc();
}

/// Record a committed seal
#[cfg(feature = "metrics")]
pub fn record_seal() {
    SEALS_COMMITTED.inc();
}

/// Record a boundary violation
#[cfg(feature = "metrics")]
pub fn record_boundary_violation(kind: ConflictKind) {
    BOUNDARY_VIOLATIONS.with_label_values(&[kind.as_str()]).inc();
}

/// Set the active validator gauge
#[cfg(feature = "metrics")]
pub fn set_active_validators(count: usize) {
    ACTIVE_VALIDATORS.set(count as i64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_round(_outcome: DecisionOutcome, _seconds: f64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_votes(_votes: &[Vote]) {}

#[cfg(not(feature = "metrics"))]
pub fn record_validator_failure(_cause: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_suspension() {}

#[cfg(not(feature = "metrics"))]
pub fn record_seal() {}

#[cfg(not(feature = "metrics"))]
pub fn record_boundary_violation(_kind: ConflictKind) {}

#[cfg(not(feature = "metrics"))]
pub fn set_active_validators(_count: usize) {}
