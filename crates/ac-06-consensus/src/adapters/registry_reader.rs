//! Boundary reads served by the anchor registry.

use std::sync::Arc;

use ac_03_boundary_enforcer::SealedAnchorReader;
use ac_04_anchor_registry::{AnchorRegistryApi, RegistryError};
use shared_types::{AnchorId, Hash, SealedAnchor, StorageError};

pub struct RegistryAnchorReader<R: AnchorRegistryApi> {
    registry: Arc<R>,
}

impl<R: AnchorRegistryApi> RegistryAnchorReader<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

fn to_storage(err: RegistryError) -> StorageError {
    match err {
        RegistryError::Storage(e) => e,
        other => StorageError::DatabaseError(other.to_string()),
    }
}

impl<R: AnchorRegistryApi> SealedAnchorReader for RegistryAnchorReader<R> {
    fn find_by_anchor_id(&self, anchor_id: &AnchorId) -> Result<Option<SealedAnchor>, StorageError> {
        self.registry.get(anchor_id).map_err(to_storage)
    }

    fn find_by_payload_hash(&self, payload_hash: &Hash) -> Result<Option<SealedAnchor>, StorageError> {
        self.registry
            .find_by_payload_hash(payload_hash)
            .map_err(to_storage)
    }
}
