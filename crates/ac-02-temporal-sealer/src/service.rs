//! Temporal Sealer Service

use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{AnchorProposal, Hash, SealedAnchor, SystemTimeSource, TimeSource, Timestamp};
use tracing::debug;

use crate::domain::{self, seal_at, SealResult};

/// Stamps accepted proposals with a strictly increasing `sealed_at` and links
/// them to the previous seal.
pub struct TemporalSealer {
    time_source: Arc<dyn TimeSource>,
    last_sealed_at: Mutex<Option<Timestamp>>,
}

impl TemporalSealer {
    pub fn new() -> Self {
        Self {
            time_source: Arc::new(SystemTimeSource),
            last_sealed_at: Mutex::new(None),
        }
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Continue after an existing chain head so timestamps keep increasing
    /// across restarts.
    pub fn resume_after(self, last_sealed_at: Option<Timestamp>) -> Self {
        *self.last_sealed_at.lock() = last_sealed_at;
        self
    }

    /// Seal a proposal on top of `previous_seal_hash`.
    pub fn seal(&self, proposal: &AnchorProposal, previous_seal_hash: Option<Hash>) -> SealedAnchor {
        let sealed_at = self.next_timestamp();
        let sealed = seal_at(proposal, previous_seal_hash, sealed_at);
        debug!(
            anchor_id = %sealed.anchor_id,
            sealed_at,
            seal_hash = %shared_crypto::to_hex(&sealed.seal_hash),
            "anchor sealed"
        );
        sealed
    }

    /// Recompute a single seal.
    pub fn verify_seal(sealed: &SealedAnchor) -> bool {
        domain::verify_seal(sealed)
    }

    /// Check a whole chain, oldest first. See [`domain::verify_chain`].
    pub fn verify_chain<'a, I>(chain: I) -> SealResult<()>
    where
        I: IntoIterator<Item = &'a SealedAnchor>,
    {
        domain::verify_chain(chain)
    }

    fn next_timestamp(&self) -> Timestamp {
        let mut last = self.last_sealed_at.lock();
        let now = self.time_source.now_millis();
        let next = match *last {
            Some(prev) if now <= prev => prev + 1,
            _ => now,
        };
        *last = Some(next);
        next
    }
}

impl Default for TemporalSealer {
    fn default() -> Self {
        Self::new()
    }
}
