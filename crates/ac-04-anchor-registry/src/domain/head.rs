use serde::{Deserialize, Serialize};
use shared_types::{AnchorId, Hash, Timestamp};

/// The most recently committed seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    /// Zero-based position of the head in the chain.
    pub sequence: u64,
    pub anchor_id: AnchorId,
    pub seal_hash: Hash,
    pub sealed_at: Timestamp,
}

impl ChainHead {
    /// Number of records in a chain ending at this head.
    pub fn chain_len(&self) -> u64 {
        self.sequence + 1
    }
}
