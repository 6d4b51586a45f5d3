//! Seal hashing.

use shared_crypto::Sha256Hasher;
use shared_types::{AnchorProposal, AnchorStatus, Hash, SealedAnchor, Timestamp};

/// Domain tag for seal hashes.
pub const SEAL_DOMAIN: &[u8] = b"anchor-chain/seal/v1";

/// Compute the seal hash from its three inputs.
pub fn compute_seal_hash(
    payload_hash: &Hash,
    previous_seal_hash: Option<&Hash>,
    sealed_at: Timestamp,
) -> Hash {
    let mut hasher = Sha256Hasher::with_domain(SEAL_DOMAIN);
    hasher.update(payload_hash);
    match previous_seal_hash {
        Some(previous) => {
            hasher.update(&[1]);
            hasher.update(previous);
        }
        None => {
            hasher.update(&[0]);
        }
    }
    hasher.update_u64(sealed_at);
    hasher.finalize()
}

/// Seal a proposal at an explicit time. Deterministic.
pub fn seal_at(
    proposal: &AnchorProposal,
    previous_seal_hash: Option<Hash>,
    sealed_at: Timestamp,
) -> SealedAnchor {
    SealedAnchor {
        anchor_id: proposal.anchor_id.clone(),
        owner_reference: proposal.owner_reference.clone(),
        payload_hash: proposal.payload_hash,
        seal_hash: compute_seal_hash(
            &proposal.payload_hash,
            previous_seal_hash.as_ref(),
            sealed_at,
        ),
        previous_seal_hash,
        sealed_at,
        status: AnchorStatus::Validated,
    }
}

/// Recompute a stored seal and compare.
pub fn verify_seal(sealed: &SealedAnchor) -> bool {
    compute_seal_hash(
        &sealed.payload_hash,
        sealed.previous_seal_hash.as_ref(),
        sealed.sealed_at,
    ) == sealed.seal_hash
}
