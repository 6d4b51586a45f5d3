//! Single writer for the anchor chain.

use std::sync::Arc;

use ac_02_temporal_sealer::TemporalSealer;
use ac_04_anchor_registry::{AnchorRegistryApi, RegistryError};
use parking_lot::Mutex;
use shared_types::{AnchorProposal, SealedAnchor, TimeSource};

use crate::domain::ConsensusResult;

/// Serializes seal + commit for the whole chain.
///
/// Reading the head, sealing against it and committing happen under one
/// lock, so no two seals can claim the same predecessor.
pub struct ChainWriter<R: AnchorRegistryApi> {
    registry: Arc<R>,
    sealer: TemporalSealer,
    lock: Mutex<()>,
}

impl<R: AnchorRegistryApi> ChainWriter<R> {
    /// Resume sealing after whatever head the registry already has.
    pub fn new(registry: Arc<R>) -> ConsensusResult<Self> {
        let last_sealed_at = registry.head()?.map(|head| head.sealed_at);
        Ok(Self {
            registry,
            sealer: TemporalSealer::new().resume_after(last_sealed_at),
            lock: Mutex::new(()),
        })
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.set_time_source(time_source);
        self
    }

    pub fn set_time_source(&mut self, time_source: Arc<dyn TimeSource>) {
        self.sealer = std::mem::take(&mut self.sealer).with_time_source(time_source);
    }

    pub fn seal_and_commit(&self, proposal: &AnchorProposal) -> Result<SealedAnchor, RegistryError> {
        let _guard = self.lock.lock();
        let previous = self.registry.latest_seal_hash()?;
        let sealed = self.sealer.seal(proposal, previous);
        self.registry.commit(sealed.clone())?;
        Ok(sealed)
    }
}
