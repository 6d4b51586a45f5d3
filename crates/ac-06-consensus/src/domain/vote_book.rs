//! Write-once vote collection for one round.

use std::collections::HashSet;

use ac_01_validator_pool::UnavailableCause;
use shared_types::{AnchorId, ValidatorId, Vote};

use super::{ConsensusError, ConsensusResult};

/// A validator whose call produced no usable vote.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorFailure {
    pub validator_id: ValidatorId,
    pub cause: UnavailableCause,
}

/// Votes of a single round, at most one per validator.
#[derive(Debug, Clone)]
pub struct VoteBook {
    anchor_id: AnchorId,
    votes: Vec<Vote>,
    seen: HashSet<ValidatorId>,
}

impl VoteBook {
    pub fn new(anchor_id: AnchorId) -> Self {
        Self {
            anchor_id,
            votes: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Record a vote. A second vote from the same validator is refused and
    /// the first one stands.
    pub fn record(&mut self, vote: Vote) -> ConsensusResult<()> {
        if vote.anchor_id != self.anchor_id {
            return Err(ConsensusError::VoteForOtherAnchor {
                validator_id: vote.validator_id,
                expected: self.anchor_id.clone(),
                actual: vote.anchor_id,
            });
        }
        if !self.seen.insert(vote.validator_id.clone()) {
            return Err(ConsensusError::DuplicateVote {
                validator_id: vote.validator_id,
                anchor_id: vote.anchor_id,
            });
        }
        self.votes.push(vote);
        Ok(())
    }

    pub fn has_voted(&self, validator_id: &ValidatorId) -> bool {
        self.seen.contains(validator_id)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn into_votes(self) -> Vec<Vote> {
        self.votes
    }
}
