//! Vote aggregation and the round verdict. Pure functions only.

use std::collections::{BTreeSet, HashMap};

use ac_01_validator_pool::{Validator, DEFAULT_TRUST_WEIGHT};
use shared_types::{Assessment, DecisionOutcome, DecisionReason, ValidatorId, Vote};

use super::{ConsensusMode, RoundParams};

/// Aggregated votes of one round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub accept_count: usize,
    pub reject_count: usize,
    pub abstain_count: usize,
    pub accept_weight: f64,
    /// Trust weight of accept + reject votes.
    pub responded_weight: f64,
    /// Independence groups with at least one accept or reject vote.
    pub distinct_groups: usize,
}

impl Tally {
    /// Aggregate `votes`, looking up weights and groups in `validators`.
    pub fn from_votes(votes: &[Vote], validators: &[Validator]) -> Self {
        let by_id: HashMap<&ValidatorId, &Validator> =
            validators.iter().map(|v| (&v.id, v)).collect();
        let mut groups = BTreeSet::new();
        let mut tally = Tally::default();

        for vote in votes {
            let validator = by_id.get(&vote.validator_id);
            let weight = validator
                .map(|v| v.trust_weight)
                .unwrap_or(DEFAULT_TRUST_WEIGHT);

            match vote.assessment {
                Assessment::Accept => {
                    tally.accept_count += 1;
                    tally.accept_weight += weight;
                }
                Assessment::Reject => tally.reject_count += 1,
                Assessment::Abstain => {
                    tally.abstain_count += 1;
                    continue;
                }
            }
            tally.responded_weight += weight;
            if let Some(v) = validator {
                groups.insert(v.independence_group.as_str());
            }
        }

        tally.distinct_groups = groups.len();
        tally
    }

    /// Accept + reject votes.
    pub fn responded_count(&self) -> usize {
        self.accept_count + self.reject_count
    }

    /// Accept share of responsive votes; zero when nobody responded.
    pub fn ratio(&self, mode: ConsensusMode) -> f64 {
        match mode {
            ConsensusMode::Count if self.responded_count() > 0 => {
                self.accept_count as f64 / self.responded_count() as f64
            }
            ConsensusMode::Weighted if self.responded_weight > 0.0 => {
                self.accept_weight / self.responded_weight
            }
            _ => 0.0,
        }
    }
}

/// Outcome of a tallied round, before any registry commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub outcome: DecisionOutcome,
    pub reason: Option<DecisionReason>,
    pub ratio: f64,
}

/// Turn a tally into a verdict.
///
/// A cancelled round is judged on the votes it has; cancellation only shows
/// up as the reason when quorum was not reached.
pub fn decide(
    tally: &Tally,
    params: &RoundParams,
    mode: ConsensusMode,
    min_distinct_groups: usize,
    cancelled: bool,
) -> Verdict {
    let ratio = tally.ratio(mode);
    let responded = tally.responded_count();

    let insufficient = |reason| Verdict {
        outcome: DecisionOutcome::InsufficientQuorum,
        reason: Some(if cancelled {
            DecisionReason::Cancelled
        } else {
            reason
        }),
        ratio,
    };

    if responded == 0 || responded < params.min_responses {
        return insufficient(DecisionReason::TooFewResponses);
    }
    if tally.distinct_groups < min_distinct_groups {
        return insufficient(DecisionReason::TooFewIndependenceGroups);
    }

    if ratio >= params.threshold {
        Verdict {
            outcome: DecisionOutcome::Accepted,
            reason: None,
            ratio,
        }
    } else {
        Verdict {
            outcome: DecisionOutcome::Rejected,
            reason: Some(DecisionReason::BelowThreshold),
            ratio,
        }
    }
}
