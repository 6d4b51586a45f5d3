//! Vote signing message.

use shared_types::{AnchorProposal, Assessment, ValidatorId};
use uuid::Uuid;

/// Domain tag prefixed to every signed vote.
pub const VOTE_SIGNING_DOMAIN: &[u8] = b"anchor-chain/vote/v2";

/// Bytes a validator signs for one vote.
///
/// Binds the round, the whole proposal (anchor, owner, payload, submission
/// time), the validator, the assessment and the exact confidence bits. A
/// response signed for one round or one proposal never verifies for another.
pub fn vote_signing_message(
    round_id: &Uuid,
    proposal: &AnchorProposal,
    validator_id: &ValidatorId,
    assessment: Assessment,
    confidence: f64,
) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        VOTE_SIGNING_DOMAIN.len()
            + proposal.anchor_id.as_str().len()
            + proposal.owner_reference.as_str().len()
            + validator_id.as_str().len()
            + 128,
    );
    for field in [
        VOTE_SIGNING_DOMAIN,
        round_id.as_bytes().as_slice(),
        proposal.anchor_id.as_str().as_bytes(),
        proposal.owner_reference.as_str().as_bytes(),
        proposal.payload_hash.as_slice(),
        validator_id.as_str().as_bytes(),
        assessment.as_str().as_bytes(),
    ] {
        message.extend_from_slice(&(field.len() as u64).to_be_bytes());
        message.extend_from_slice(field);
    }
    message.extend_from_slice(&proposal.submitted_at.to_be_bytes());
    message.extend_from_slice(&confidence.to_bits().to_be_bytes());
    message
}
