//! Error types for the Validator Pool subsystem

use shared_types::ValidatorId;
use thiserror::Error;

/// Why a validator's response was not usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnavailableCause {
    #[error("no response before the deadline")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response was not signed")]
    Unsigned,

    #[error("response signature did not verify")]
    BadSignature,

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

impl UnavailableCause {
    /// Causes attributable to the validator itself rather than the network.
    pub fn is_misbehavior(&self) -> bool {
        matches!(
            self,
            UnavailableCause::Unsigned
                | UnavailableCause::BadSignature
                | UnavailableCause::ConfidenceOutOfRange(_)
        )
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UnavailableCause::Timeout => "timeout",
            UnavailableCause::Transport(_) => "transport",
            UnavailableCause::Unsigned => "unsigned",
            UnavailableCause::BadSignature => "bad_signature",
            UnavailableCause::ConfidenceOutOfRange(_) => "confidence_out_of_range",
        }
    }
}

/// Validator pool errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("Unknown validator: {0}")]
    UnknownValidator(ValidatorId),

    #[error("Validator already registered: {0}")]
    DuplicateValidator(ValidatorId),

    #[error("Invalid trust weight {weight} for validator {validator_id}")]
    InvalidTrustWeight { validator_id: ValidatorId, weight: f64 },

    #[error("Validator already suspended: {0}")]
    AlreadySuspended(ValidatorId),

    #[error("Validator is suspended: {0}")]
    ValidatorSuspended(ValidatorId),

    /// Transport or timeout failure of one validator. The coordinator absorbs
    /// this as an abstain vote.
    #[error("Validator {validator_id} unavailable: {cause}")]
    ValidatorUnavailable {
        validator_id: ValidatorId,
        cause: UnavailableCause,
    },
}

/// Result type for validator pool operations
pub type PoolResult<T> = Result<T, PoolError>;
