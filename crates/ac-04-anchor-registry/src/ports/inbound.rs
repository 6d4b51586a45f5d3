//! # Inbound Ports (Driving Ports)
//!
//! The API other subsystems use to read and extend the chain.

use crate::domain::{ChainHead, RegistryResult};
use shared_types::{AnchorId, Hash, SealedAnchor};

/// Primary API for the Anchor Registry subsystem.
///
/// Implementations must serialize commits: two commits racing on the same
/// head cannot both succeed.
pub trait AnchorRegistryApi: Send + Sync {
    /// Persist a sealed anchor as the new chain head.
    ///
    /// ## Errors
    ///
    /// - `DuplicateAnchor`: the id is already committed
    /// - `PayloadCollision`: the payload is sealed under another owner
    /// - `ChainLinkMismatch`: `previous_seal_hash` is not the current head
    /// - `InvalidSeal`: the seal hash does not re-verify
    /// - `TimestampRegression`: `sealed_at` does not advance past the head
    fn commit(&self, anchor: SealedAnchor) -> RegistryResult<ChainHead>;

    /// Look up a committed anchor.
    ///
    /// A record whose seal no longer re-verifies is returned with status
    /// `Violated`.
    fn get(&self, anchor_id: &AnchorId) -> RegistryResult<Option<SealedAnchor>>;

    /// The anchor that first sealed `payload_hash`, if any.
    fn find_by_payload_hash(&self, payload_hash: &Hash) -> RegistryResult<Option<SealedAnchor>>;

    /// Seal hash of the chain head, `None` for an empty chain.
    fn latest_seal_hash(&self) -> RegistryResult<Option<Hash>>;

    /// Current chain head.
    fn head(&self) -> RegistryResult<Option<ChainHead>>;
}
