//! In-process assessor that signs its own verdicts.
//!
//! Used by the node's simulated validator set and by tests. The verdict comes
//! from a caller-supplied rule; an optional latency emulates a slow reviewer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared_crypto::Ed25519KeyPair;
use shared_types::{AnchorProposal, Assessment, ValidatorId};
use uuid::Uuid;

use crate::domain::vote_signing_message;
use crate::ports::{AnchorAssessor, AssessmentResponse, AssessorError};

/// Verdict rule: proposal in, `(assessment, confidence)` out.
pub type AssessmentRule = Arc<dyn Fn(&AnchorProposal) -> (Assessment, f64) + Send + Sync>;

pub struct LocalAssessor {
    validator_id: ValidatorId,
    keypair: Ed25519KeyPair,
    rule: AssessmentRule,
    latency: Option<Duration>,
}

impl LocalAssessor {
    pub fn new(
        validator_id: impl Into<ValidatorId>,
        keypair: Ed25519KeyPair,
        rule: AssessmentRule,
    ) -> Self {
        Self {
            validator_id: validator_id.into(),
            keypair,
            rule,
            latency: None,
        }
    }

    /// Assessor that always returns the same verdict.
    pub fn fixed(
        validator_id: impl Into<ValidatorId>,
        keypair: Ed25519KeyPair,
        assessment: Assessment,
        confidence: f64,
    ) -> Self {
        Self::new(
            validator_id,
            keypair,
            Arc::new(move |_| (assessment, confidence)),
        )
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl AnchorAssessor for LocalAssessor {
    async fn assess(
        &self,
        round_id: Uuid,
        proposal: &AnchorProposal,
    ) -> Result<AssessmentResponse, AssessorError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let (assessment, confidence) = (self.rule)(proposal);
        let message = vote_signing_message(
            &round_id,
            proposal,
            &self.validator_id,
            assessment,
            confidence,
        );

        Ok(AssessmentResponse {
            assessment,
            confidence,
            signature: Some(self.keypair.sign(&message)),
        })
    }
}
