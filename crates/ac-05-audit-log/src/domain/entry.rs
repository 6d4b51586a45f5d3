//! Audit entries and their hash chain.

use super::{AuditError, AuditResult};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_crypto::Sha256Hasher;
use shared_types::{ConsensusDecision, Hash, StorageError, Timestamp, Vote};

/// Domain tag for audit entry hashes.
pub const AUDIT_DOMAIN: &[u8] = b"anchor-chain/audit/v1";

/// One recorded round.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Zero-based position in the log.
    pub sequence: u64,
    pub decision: ConsensusDecision,
    /// Every vote collected in the round, abstentions included.
    pub votes: Vec<Vote>,
    pub recorded_at: Timestamp,
    #[serde_as(as = "Option<Hex>")]
    pub previous_entry_hash: Option<Hash>,
    #[serde_as(as = "Hex")]
    pub entry_hash: Hash,
}

impl AuditEntry {
    /// Build the entry following `previous` (or the first entry).
    pub fn next(
        previous: Option<&AuditEntry>,
        decision: ConsensusDecision,
        votes: Vec<Vote>,
        recorded_at: Timestamp,
    ) -> AuditResult<Self> {
        let sequence = previous.map(|p| p.sequence + 1).unwrap_or(0);
        let previous_entry_hash = previous.map(|p| p.entry_hash);
        let entry_hash = compute_entry_hash(
            sequence,
            &decision,
            &votes,
            recorded_at,
            previous_entry_hash.as_ref(),
        )?;
        Ok(Self {
            sequence,
            decision,
            votes,
            recorded_at,
            previous_entry_hash,
            entry_hash,
        })
    }

    fn recompute_hash(&self) -> AuditResult<Hash> {
        compute_entry_hash(
            self.sequence,
            &self.decision,
            &self.votes,
            self.recorded_at,
            self.previous_entry_hash.as_ref(),
        )
    }
}

/// Hash an entry's contents and its link to the previous entry.
pub fn compute_entry_hash(
    sequence: u64,
    decision: &ConsensusDecision,
    votes: &[Vote],
    recorded_at: Timestamp,
    previous_entry_hash: Option<&Hash>,
) -> AuditResult<Hash> {
    let body = serde_json::to_vec(&(decision, votes))
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut hasher = Sha256Hasher::with_domain(AUDIT_DOMAIN);
    hasher.update_u64(sequence);
    hasher.update_prefixed(&body);
    hasher.update_u64(recorded_at);
    match previous_entry_hash {
        Some(previous) => {
            hasher.update(&[1]);
            hasher.update(previous);
        }
        None => {
            hasher.update(&[0]);
        }
    }
    Ok(hasher.finalize())
}

/// Check sequence numbers, hashes and links across a full log.
pub fn verify_entries(entries: &[AuditEntry]) -> AuditResult<()> {
    let mut previous: Option<&AuditEntry> = None;

    for (expected, entry) in entries.iter().enumerate() {
        let expected = expected as u64;
        if entry.sequence != expected {
            return Err(AuditError::SequenceGap {
                sequence: entry.sequence,
                expected,
            });
        }
        if entry.previous_entry_hash != previous.map(|p| p.entry_hash) {
            return Err(AuditError::LinkMismatch {
                sequence: entry.sequence,
            });
        }
        if entry.recompute_hash()? != entry.entry_hash {
            return Err(AuditError::HashMismatch {
                sequence: entry.sequence,
            });
        }
        previous = Some(entry);
    }

    Ok(())
}
