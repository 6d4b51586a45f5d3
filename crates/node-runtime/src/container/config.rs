//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters, loaded
//! from `AC_*` environment variables on top of the defaults.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AC_THRESHOLD` | `consensus.threshold` |
//! | `AC_MIN_RESPONSES` | `consensus.min_responses` |
//! | `AC_DEADLINE_MS` | `consensus.deadline_ms` |
//! | `AC_PER_CALL_TIMEOUT_MS` | `consensus.per_call_timeout_ms` |
//! | `AC_CONSENSUS_MODE` | `consensus.mode` (`count` or `weighted`) |
//! | `AC_MIN_DISTINCT_GROUPS` | `consensus.min_distinct_groups` |
//! | `AC_VALIDATORS` | `simulation.validators` |
//! | `AC_INDEPENDENCE_GROUPS` | `simulation.independence_groups` |
//! | `AC_VALIDATOR_LATENCY_MS` | `simulation.latency_ms` |
//! | `AC_SUSPEND_AFTER` | `suspend_after` (0 disables suspension) |
//! | `AC_REGISTRY_PATH` | `storage.registry_path` |
//! | `AC_AUDIT_PATH` | `storage.audit_path` |
//! | `AC_MAX_IN_FLIGHT` | `surface.max_in_flight` |

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use ac_01_validator_pool::PoolConfig;
use ac_06_consensus::{ConsensusConfig, ConsensusError};
use anchor_telemetry::TelemetryConfig;
use serde::Deserialize;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub consensus: ConsensusConfig,
    pub pool: PoolConfig,
    pub simulation: SimulationConfig,
    pub storage: StorageConfig,
    pub surface: SurfaceConfig,
    /// Consecutive invalid responses before a validator is suspended.
    pub suspend_after: u32,
    #[serde(skip)]
    pub telemetry: TelemetryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            pool: PoolConfig::default(),
            simulation: SimulationConfig::default(),
            storage: StorageConfig::default(),
            surface: SurfaceConfig::default(),
            suspend_after: 3,
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not valid: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    #[error("{0}")]
    Invalid(String),
}

/// The in-process validator set the node runs for local use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub validators: usize,
    pub independence_groups: usize,
    /// Artificial assessment latency per validator.
    pub latency_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            validators: 21,
            independence_groups: 7,
            latency_ms: 0,
        }
    }
}

/// Storage configuration. `None` keeps that store in memory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub registry_path: Option<PathBuf>,
    pub audit_path: Option<PathBuf>,
}

/// JSON-lines surface configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Rounds allowed to run at once.
    pub max_in_flight: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { max_in_flight: 64 }
    }
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|var| env::var(var).ok())?;
        config.telemetry = TelemetryConfig::from_env();
        Ok(config)
    }

    /// Defaults overridden from `lookup`, then validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = NodeConfig::default();

        override_from(&lookup, "AC_THRESHOLD", &mut config.consensus.threshold)?;
        override_from(&lookup, "AC_MIN_RESPONSES", &mut config.consensus.min_responses)?;
        override_from(&lookup, "AC_DEADLINE_MS", &mut config.consensus.deadline_ms)?;
        override_from(
            &lookup,
            "AC_PER_CALL_TIMEOUT_MS",
            &mut config.consensus.per_call_timeout_ms,
        )?;
        override_from(&lookup, "AC_CONSENSUS_MODE", &mut config.consensus.mode)?;
        override_from(
            &lookup,
            "AC_MIN_DISTINCT_GROUPS",
            &mut config.consensus.min_distinct_groups,
        )?;
        override_from(&lookup, "AC_VALIDATORS", &mut config.simulation.validators)?;
        override_from(
            &lookup,
            "AC_INDEPENDENCE_GROUPS",
            &mut config.simulation.independence_groups,
        )?;
        override_from(&lookup, "AC_VALIDATOR_LATENCY_MS", &mut config.simulation.latency_ms)?;
        override_from(&lookup, "AC_SUSPEND_AFTER", &mut config.suspend_after)?;
        override_from(&lookup, "AC_MAX_IN_FLIGHT", &mut config.surface.max_in_flight)?;

        config.storage.registry_path = lookup("AC_REGISTRY_PATH").map(PathBuf::from);
        config.storage.audit_path = lookup("AC_AUDIT_PATH").map(PathBuf::from);
        config.pool.expected_size = config.simulation.validators;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.consensus.validate()?;
        if self.simulation.validators == 0 {
            return Err(ConfigError::Invalid("at least one validator is required".into()));
        }
        if self.simulation.independence_groups == 0 {
            return Err(ConfigError::Invalid(
                "at least one independence group is required".into(),
            ));
        }
        if self.surface.max_in_flight == 0 {
            return Err(ConfigError::Invalid("max_in_flight must be positive".into()));
        }
        Ok(())
    }
}

fn override_from<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    target: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(value) = lookup(var) {
        *target = value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
            value,
        })?;
    }
    Ok(())
}
