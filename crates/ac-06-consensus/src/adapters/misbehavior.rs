//! Misbehavior detectors.

use std::collections::HashMap;

use parking_lot::Mutex;
use shared_types::ValidatorId;

use crate::ports::{MisbehaviorDetector, RoundReport};

/// Never flags anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMisbehaviorDetector;

impl MisbehaviorDetector for NoMisbehaviorDetector {
    fn inspect(&self, _report: &RoundReport<'_>) -> Vec<(ValidatorId, String)> {
        Vec::new()
    }
}

/// Flags a validator after `limit` consecutive rounds in which it sent an
/// unsigned, badly signed or out-of-range response.
///
/// Timeouts and transport errors never count; a valid vote resets the streak.
#[derive(Debug)]
pub struct RepeatedFailureDetector {
    limit: u32,
    strikes: Mutex<HashMap<ValidatorId, u32>>,
}

impl RepeatedFailureDetector {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            strikes: Mutex::new(HashMap::new()),
        }
    }

    pub fn strikes(&self, validator_id: &ValidatorId) -> u32 {
        self.strikes.lock().get(validator_id).copied().unwrap_or(0)
    }
}

impl MisbehaviorDetector for RepeatedFailureDetector {
    fn inspect(&self, report: &RoundReport<'_>) -> Vec<(ValidatorId, String)> {
        let mut strikes = self.strikes.lock();

        for vote in report.votes.iter().filter(|v| v.is_responsive()) {
            strikes.remove(&vote.validator_id);
        }

        let mut flagged = Vec::new();
        for failure in report.failures.iter().filter(|f| f.cause.is_misbehavior()) {
            let count = strikes.entry(failure.validator_id.clone()).or_insert(0);
            *count += 1;
            if *count >= self.limit {
                strikes.remove(&failure.validator_id);
                flagged.push((
                    failure.validator_id.clone(),
                    format!(
                        "{} invalid responses in a row (last: {})",
                        self.limit, failure.cause
                    ),
                ));
            }
        }
        flagged
    }
}
