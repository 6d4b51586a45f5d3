//! Boundary check outcome and the violation ledger entry.

use serde::{Deserialize, Serialize};
use shared_types::{
    AnchorId, AnchorProposal, AnchorStatus, ConflictKind, OwnerReference, SealedAnchor, Timestamp,
};

/// Outcome of a boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryCheck {
    Clear,
    Conflict {
        kind: ConflictKind,
        existing: SealedAnchor,
    },
}

impl BoundaryCheck {
    pub fn is_clear(&self) -> bool {
        matches!(self, BoundaryCheck::Clear)
    }

    /// Classify a proposal against the records sharing its id or payload.
    pub fn classify(
        proposal: &AnchorProposal,
        by_anchor_id: Option<SealedAnchor>,
        by_payload: Option<SealedAnchor>,
    ) -> Self {
        if let Some(existing) = by_anchor_id {
            let kind = match existing.status {
                AnchorStatus::Validated => ConflictKind::AnchorAlreadySealed,
                AnchorStatus::Violated => ConflictKind::AnchorIntegrityViolated,
            };
            return BoundaryCheck::Conflict { kind, existing };
        }

        if let Some(existing) = by_payload {
            if existing.owner_reference != proposal.owner_reference {
                return BoundaryCheck::Conflict {
                    kind: ConflictKind::PayloadClaimedByOtherOwner,
                    existing,
                };
            }
        }

        BoundaryCheck::Clear
    }
}

/// A rejected attempt against sealed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryViolation {
    pub anchor_id: AnchorId,
    pub owner_reference: OwnerReference,
    pub kind: ConflictKind,
    /// The sealed record the attempt collided with.
    pub existing_anchor_id: AnchorId,
    pub detected_at: Timestamp,
}
