//! Error types for the Consensus subsystem
//!
//! Round-level outcomes (boundary violation, rejection, insufficient quorum)
//! are decisions, not errors. These variants cover invalid input and
//! infrastructure failures only.

use ac_03_boundary_enforcer::BoundaryError;
use ac_04_anchor_registry::RegistryError;
use ac_05_audit_log::AuditError;
use shared_types::{AnchorId, ValidatorId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("Invalid consensus configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid round parameters: {0}")]
    InvalidParams(String),

    #[error("Duplicate vote from validator {validator_id} on {anchor_id}")]
    DuplicateVote {
        validator_id: ValidatorId,
        anchor_id: AnchorId,
    },

    #[error("Vote from {validator_id} is for {actual}, round is for {expected}")]
    VoteForOtherAnchor {
        validator_id: ValidatorId,
        expected: AnchorId,
        actual: AnchorId,
    },

    #[error("Boundary check failed: {0}")]
    Boundary(#[from] BoundaryError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The decision could not be made durable and was not returned.
    #[error("Audit log error: {0}")]
    Audit(#[from] AuditError),

    #[error("Round task ended abnormally: {0}")]
    RoundAborted(String),
}

/// Result type for consensus operations
pub type ConsensusResult<T> = Result<T, ConsensusError>;
