//! Driven ports (Outbound dependencies)

use shared_types::{AnchorId, Hash, SealedAnchor, StorageError};

/// Read access to committed anchors.
///
/// Implemented over the anchor registry by the consensus subsystem's adapter.
pub trait SealedAnchorReader: Send + Sync {
    /// The sealed record for `anchor_id`, with its current integrity status.
    fn find_by_anchor_id(&self, anchor_id: &AnchorId) -> Result<Option<SealedAnchor>, StorageError>;

    /// The sealed record whose payload hash equals `payload_hash`.
    fn find_by_payload_hash(&self, payload_hash: &Hash)
        -> Result<Option<SealedAnchor>, StorageError>;
}
