//! Consensus configuration and per-round parameters.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConsensusError, ConsensusResult};

/// How accept votes are weighed against all responsive votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMode {
    /// One validator, one vote.
    #[default]
    Count,
    /// Votes weighted by each validator's trust weight.
    Weighted,
}

impl FromStr for ConsensusMode {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(ConsensusMode::Count),
            "weighted" => Ok(ConsensusMode::Weighted),
            other => Err(ConsensusError::InvalidConfig(format!(
                "unknown consensus mode '{other}'"
            ))),
        }
    }
}

/// Consensus configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Minimum accept ratio, in (0, 1]
    pub threshold: f64,
    /// Minimum number of accept + reject votes
    pub min_responses: usize,
    /// Whole-round deadline in milliseconds
    pub deadline_ms: u64,
    /// Per-validator call timeout in milliseconds, capped by the deadline
    pub per_call_timeout_ms: u64,
    pub mode: ConsensusMode,
    /// Responsive votes must span at least this many independence groups
    pub min_distinct_groups: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            threshold: 0.67,
            min_responses: 11,
            deadline_ms: 5_000,
            per_call_timeout_ms: 4_000,
            mode: ConsensusMode::Count,
            min_distinct_groups: 1,
        }
    }
}

impl ConsensusConfig {
    pub fn validate(&self) -> ConsensusResult<()> {
        validate_threshold(self.threshold).map_err(ConsensusError::InvalidConfig)?;
        if self.min_responses == 0 {
            return Err(ConsensusError::InvalidConfig(
                "min_responses must be at least 1".into(),
            ));
        }
        if self.deadline_ms == 0 {
            return Err(ConsensusError::InvalidConfig(
                "deadline_ms must be non-zero".into(),
            ));
        }
        if self.per_call_timeout_ms == 0 {
            return Err(ConsensusError::InvalidConfig(
                "per_call_timeout_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Round parameters taken from this configuration.
    pub fn round_params(&self) -> RoundParams {
        RoundParams::new(self.threshold, self.min_responses, self.deadline_ms)
    }

    pub fn per_call_timeout(&self) -> Duration {
        Duration::from_millis(self.per_call_timeout_ms)
    }
}

/// Caller-supplied parameters of one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundParams {
    pub threshold: f64,
    pub min_responses: usize,
    pub deadline_ms: u64,
}

impl RoundParams {
    pub fn new(threshold: f64, min_responses: usize, deadline_ms: u64) -> Self {
        Self {
            threshold,
            min_responses,
            deadline_ms,
        }
    }

    /// `min_responses` may be zero here; a round with no responses is
    /// still `insufficient_quorum`.
    pub fn validate(&self) -> ConsensusResult<()> {
        validate_threshold(self.threshold).map_err(ConsensusError::InvalidParams)?;
        if self.deadline_ms == 0 {
            return Err(ConsensusError::InvalidParams(
                "deadline_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

fn validate_threshold(threshold: f64) -> Result<(), String> {
    if threshold.is_finite() && threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(format!("threshold {threshold} outside (0, 1]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConsensusConfig::default();
        config.validate().unwrap();
        assert_eq!(config.round_params(), RoundParams::new(0.67, 11, 5_000));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad = [
            ConsensusConfig {
                threshold: 0.0,
                ..Default::default()
            },
            ConsensusConfig {
                threshold: 1.01,
                ..Default::default()
            },
            ConsensusConfig {
                min_responses: 0,
                ..Default::default()
            },
            ConsensusConfig {
                deadline_ms: 0,
                ..Default::default()
            },
            ConsensusConfig {
                per_call_timeout_ms: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(ConsensusError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_round_params_allow_zero_min_responses() {
        RoundParams::new(0.5, 0, 100).validate().unwrap();
        assert!(RoundParams::new(f64::NAN, 1, 100).validate().is_err());
        assert!(RoundParams::new(0.5, 1, 0).validate().is_err());
    }

    #[test]
    fn test_mode_parses() {
        assert_eq!("weighted".parse::<ConsensusMode>().unwrap(), ConsensusMode::Weighted);
        assert_eq!("COUNT".parse::<ConsensusMode>().unwrap(), ConsensusMode::Count);
        assert!("majority".parse::<ConsensusMode>().is_err());
    }
}
