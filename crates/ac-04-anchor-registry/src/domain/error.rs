//! Error types for the Anchor Registry subsystem

use ac_02_temporal_sealer::SealError;
use shared_types::{AnchorId, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A concurrent round already committed this anchor id.
    #[error("Anchor already committed: {0}")]
    DuplicateAnchor(AnchorId),

    /// The payload is sealed under a different owner.
    #[error("Payload of {anchor_id} already sealed as {existing}")]
    PayloadCollision {
        anchor_id: AnchorId,
        existing: AnchorId,
    },

    #[error("Anchor not found: {0}")]
    NotFound(AnchorId),

    #[error("Seal for {0} does not link to the current chain head")]
    ChainLinkMismatch(AnchorId),

    #[error("Seal for {0} does not re-verify")]
    InvalidSeal(AnchorId),

    #[error("Seal for {0} is not later than the chain head")]
    TimestampRegression(AnchorId),

    #[error("Chain integrity check failed: {0}")]
    Integrity(#[from] SealError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
