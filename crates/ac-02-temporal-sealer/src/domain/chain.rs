//! Whole-chain verification.

use shared_types::SealedAnchor;

use super::{verify_seal, SealError, SealResult};

/// Walk a chain in order, checking every hash, link and timestamp.
///
/// Returns the first break found.
pub fn verify_chain<'a, I>(chain: I) -> SealResult<()>
where
    I: IntoIterator<Item = &'a SealedAnchor>,
{
    let mut previous: Option<&SealedAnchor> = None;

    for (position, sealed) in chain.into_iter().enumerate() {
        if !verify_seal(sealed) {
            return Err(SealError::HashMismatch {
                position,
                anchor_id: sealed.anchor_id.clone(),
            });
        }

        let expected_link = previous.map(|p| p.seal_hash);
        if sealed.previous_seal_hash != expected_link {
            return Err(SealError::LinkMismatch {
                position,
                anchor_id: sealed.anchor_id.clone(),
            });
        }

        if let Some(prev) = previous {
            if sealed.sealed_at <= prev.sealed_at {
                return Err(SealError::TimestampRegression {
                    position,
                    anchor_id: sealed.anchor_id.clone(),
                });
            }
        }

        previous = Some(sealed);
    }

    Ok(())
}
