//! Driven ports (Outbound dependencies)

use async_trait::async_trait;
use shared_crypto::Ed25519Signature;
use shared_types::{AnchorProposal, Assessment};
use thiserror::Error;
use uuid::Uuid;

/// What an assessor returns for one proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentResponse {
    pub assessment: Assessment,
    pub confidence: f64,
    /// Signature over [`crate::vote_signing_message`].
    pub signature: Option<Ed25519Signature>,
}

/// Failure reported by an assessor.
#[derive(Debug, Clone, Error)]
pub enum AssessorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("assessor failed: {0}")]
    Internal(String),
}

/// The single capability every validator provides.
///
/// Implementations may be remote reviewers, rule engines or scorers. How the
/// verdict is reached is opaque to the pool. The response signature must cover
/// `round_id` so it cannot be replayed into a later round.
#[async_trait]
pub trait AnchorAssessor: Send + Sync {
    async fn assess(
        &self,
        round_id: Uuid,
        proposal: &AnchorProposal,
    ) -> Result<AssessmentResponse, AssessorError>;
}
