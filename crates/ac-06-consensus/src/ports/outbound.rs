//! Driven ports (Outbound dependencies)

use shared_types::{ConsensusDecision, ValidatorId, Vote};

use crate::domain::ValidatorFailure;

/// Everything observed in a finished round.
#[derive(Debug, Clone, Copy)]
pub struct RoundReport<'a> {
    pub decision: &'a ConsensusDecision,
    pub votes: &'a [Vote],
    pub failures: &'a [ValidatorFailure],
}

/// Pluggable misbehavior detection.
///
/// Called once per finished round. Every validator returned is suspended
/// through the pool with the given reason.
pub trait MisbehaviorDetector: Send + Sync {
    fn inspect(&self, report: &RoundReport<'_>) -> Vec<(ValidatorId, String)>;
}
