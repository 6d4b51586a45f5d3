//! Error types for the Temporal Sealer subsystem

use shared_types::AnchorId;
use thiserror::Error;

/// Chain verification failures. `position` is the zero-based index in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    #[error("Seal hash mismatch at position {position} (anchor {anchor_id})")]
    HashMismatch { position: usize, anchor_id: AnchorId },

    #[error("Broken chain link at position {position} (anchor {anchor_id})")]
    LinkMismatch { position: usize, anchor_id: AnchorId },

    #[error("Seal timestamp does not advance at position {position} (anchor {anchor_id})")]
    TimestampRegression { position: usize, anchor_id: AnchorId },
}

/// Result type for sealing operations
pub type SealResult<T> = Result<T, SealError>;
