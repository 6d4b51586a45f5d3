//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `AnchorId`, `ValidatorId`, `OwnerReference`
//! - **Round inputs**: `AnchorProposal`, `Vote`, `Assessment`
//! - **Round outputs**: `SealedAnchor`, `ConsensusDecision`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_crypto::{to_hex, Sha256Hasher};
use uuid::Uuid;

/// A 32-byte digest (SHA-256).
pub type Hash = [u8; 32];

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Domain tag for anchor ids derived from owner and payload.
const ANCHOR_ID_DOMAIN: &[u8] = b"anchor-chain/anchor-id/v1";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of an identity anchor, unique across the registry.
    AnchorId
);

string_id!(
    /// Identifier of a registered validator.
    ValidatorId
);

string_id!(
    /// Opaque identity of the party that submitted an anchor.
    OwnerReference
);

// =============================================================================
// ROUND INPUTS
// =============================================================================

/// A request to register an identity anchor.
///
/// Lives only for the duration of one consensus round.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorProposal {
    pub anchor_id: AnchorId,
    pub owner_reference: OwnerReference,
    /// Content-addressed digest of the identity material.
    #[serde_as(as = "Hex")]
    pub payload_hash: Hash,
    pub submitted_at: Timestamp,
}

impl AnchorProposal {
    /// Create a proposal with a caller-supplied anchor id.
    pub fn new(
        anchor_id: impl Into<AnchorId>,
        owner_reference: impl Into<OwnerReference>,
        payload_hash: Hash,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            owner_reference: owner_reference.into(),
            payload_hash,
            submitted_at,
        }
    }

    /// Create a proposal whose anchor id is derived from owner and payload.
    pub fn derived(
        owner_reference: impl Into<OwnerReference>,
        payload_hash: Hash,
        submitted_at: Timestamp,
    ) -> Self {
        let owner_reference = owner_reference.into();
        let anchor_id = Self::derive_id(&owner_reference, &payload_hash);
        Self {
            anchor_id,
            owner_reference,
            payload_hash,
            submitted_at,
        }
    }

    /// Derive an anchor id as hex SHA-256 over the owner and payload hash.
    pub fn derive_id(owner_reference: &OwnerReference, payload_hash: &Hash) -> AnchorId {
        let mut hasher = Sha256Hasher::with_domain(ANCHOR_ID_DOMAIN);
        hasher.update_prefixed(owner_reference.as_str().as_bytes());
        hasher.update(payload_hash);
        AnchorId(to_hex(&hasher.finalize()))
    }
}

/// A validator's verdict on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Accept,
    Reject,
    Abstain,
}

impl Assessment {
    /// Stable label used in signing messages, logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Accept => "accept",
            Assessment::Reject => "reject",
            Assessment::Abstain => "abstain",
        }
    }
}

/// A single validator's vote in one round. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub validator_id: ValidatorId,
    pub anchor_id: AnchorId,
    pub assessment: Assessment,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub cast_at: Timestamp,
}

impl Vote {
    /// Abstain vote synthesized for a validator that timed out or failed.
    pub fn abstain(validator_id: ValidatorId, anchor_id: AnchorId, cast_at: Timestamp) -> Self {
        Self {
            validator_id,
            anchor_id,
            assessment: Assessment::Abstain,
            confidence: 0.0,
            cast_at,
        }
    }

    /// True for accept and reject votes.
    pub fn is_responsive(&self) -> bool {
        self.assessment != Assessment::Abstain
    }
}

// =============================================================================
// ROUND OUTPUTS
// =============================================================================

/// Lifecycle state of a sealed anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStatus {
    /// Committed and its seal re-verifies.
    Validated,
    /// Its stored seal no longer matches its inputs.
    Violated,
}

/// An accepted anchor committed to the hash chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedAnchor {
    pub anchor_id: AnchorId,
    pub owner_reference: OwnerReference,
    #[serde_as(as = "Hex")]
    pub payload_hash: Hash,
    #[serde_as(as = "Hex")]
    pub seal_hash: Hash,
    /// `None` only for the first record in the chain.
    #[serde_as(as = "Option<Hex>")]
    pub previous_seal_hash: Option<Hash>,
    pub sealed_at: Timestamp,
    pub status: AnchorStatus,
}

impl SealedAnchor {
    pub fn is_validated(&self) -> bool {
        self.status == AnchorStatus::Validated
    }
}

/// Why a sealed record blocks a new proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The anchor id already has a validated seal.
    AnchorAlreadySealed,
    /// The anchor id has a seal that failed re-verification.
    AnchorIntegrityViolated,
    /// The payload hash is sealed under a different owner.
    PayloadClaimedByOtherOwner,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::AnchorAlreadySealed => "anchor_already_sealed",
            ConflictKind::AnchorIntegrityViolated => "anchor_integrity_violated",
            ConflictKind::PayloadClaimedByOtherOwner => "payload_claimed_by_other_owner",
        }
    }
}

/// Final result of a consensus round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Accepted,
    Rejected,
    InsufficientQuorum,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Accepted => "accepted",
            DecisionOutcome::Rejected => "rejected",
            DecisionOutcome::InsufficientQuorum => "insufficient_quorum",
        }
    }
}

/// Detail attached to a non-accepted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DecisionReason {
    /// Boundary check failed; no votes were solicited.
    BoundaryViolation { kind: ConflictKind },
    /// Quorum reached but the ratio fell below the threshold.
    BelowThreshold,
    /// Accepted, but a concurrent round committed the same anchor id first.
    DuplicateAnchor,
    /// Accepted, but a concurrent round sealed the same payload for another owner.
    PayloadCollision,
    /// Fewer non-abstain votes than `min_responses` (or none at all).
    TooFewResponses,
    /// Responses came from fewer independence groups than required.
    TooFewIndependenceGroups,
    /// The caller cancelled the round before enough votes arrived.
    Cancelled,
}

/// The record of one consensus round. Written once to the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusDecision {
    pub round_id: Uuid,
    pub anchor_id: AnchorId,
    pub ratio_achieved: f64,
    pub threshold_used: f64,
    pub responded_count: usize,
    pub total_validators: usize,
    pub outcome: DecisionOutcome,
    pub reason: Option<DecisionReason>,
    pub decided_at: Timestamp,
}

impl ConsensusDecision {
    pub fn is_accepted(&self) -> bool {
        self.outcome == DecisionOutcome::Accepted
    }

    /// Whether the round ended in a boundary violation.
    pub fn is_boundary_violation(&self) -> bool {
        matches!(self.reason, Some(DecisionReason::BoundaryViolation { .. }))
    }

    /// Only insufficient-quorum rounds may be resubmitted as a new round.
    pub fn is_retryable(&self) -> bool {
        self.outcome == DecisionOutcome::InsufficientQuorum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_anchor_id_is_stable() {
        let a = AnchorProposal::derived("owner-1", [1u8; 32], 10);
        let b = AnchorProposal::derived("owner-1", [1u8; 32], 99);
        assert_eq!(a.anchor_id, b.anchor_id);
        assert_eq!(a.anchor_id.as_str().len(), 64);
    }

    #[test]
    fn test_derived_anchor_id_depends_on_owner() {
        let a = AnchorProposal::derived("owner-1", [1u8; 32], 10);
        let b = AnchorProposal::derived("owner-2", [1u8; 32], 10);
        assert_ne!(a.anchor_id, b.anchor_id);
    }

    #[test]
    fn test_abstain_vote_is_not_responsive() {
        let vote = Vote::abstain("v1".into(), "a1".into(), 5);
        assert!(!vote.is_responsive());
        assert_eq!(vote.confidence, 0.0);
    }

    #[test]
    fn test_sealed_anchor_json_uses_hex() {
        let sealed = SealedAnchor {
            anchor_id: "a1".into(),
            owner_reference: "o1".into(),
            payload_hash: [0xAB; 32],
            seal_hash: [0xCD; 32],
            previous_seal_hash: None,
            sealed_at: 1,
            status: AnchorStatus::Validated,
        };
        let json = serde_json::to_string(&sealed).unwrap();
        assert!(json.contains(&"ab".repeat(32)));
        assert!(json.contains("\"previous_seal_hash\":null"));

        let bytes = bincode::serialize(&sealed).unwrap();
        let decoded: SealedAnchor = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, sealed);
    }

    #[test]
    fn test_decision_reason_serializes_tagged() {
        let reason = DecisionReason::BoundaryViolation {
            kind: ConflictKind::AnchorAlreadySealed,
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(
            json,
            r#"{"reason":"boundary_violation","kind":"anchor_already_sealed"}"#
        );
    }

    #[test]
    fn test_only_insufficient_quorum_is_retryable() {
        let mut decision = ConsensusDecision {
            round_id: Uuid::nil(),
            anchor_id: "a".into(),
            ratio_achieved: 0.0,
            threshold_used: 0.67,
            responded_count: 0,
            total_validators: 21,
            outcome: DecisionOutcome::InsufficientQuorum,
            reason: Some(DecisionReason::TooFewResponses),
            decided_at: 0,
        };
        assert!(decision.is_retryable());
        decision.outcome = DecisionOutcome::Rejected;
        assert!(!decision.is_retryable());
    }
}
