//! Validator Pool Service
//!
//! Owns the validator registry and the assessor handles, and turns one
//! assessor call into an authenticated [`Vote`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AnchorProposal, SystemTimeSource, TimeSource, ValidatorId, Vote};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    vote_signing_message, PoolConfig, PoolError, PoolResult, Suspension, UnavailableCause,
    Validator, ValidatorRegistry,
};
use crate::ports::{AnchorAssessor, AssessmentResponse, ValidatorPoolApi};

/// Validator Pool Service
pub struct ValidatorPool {
    registry: RwLock<ValidatorRegistry>,
    assessors: RwLock<HashMap<ValidatorId, Arc<dyn AnchorAssessor>>>,
    config: PoolConfig,
    time_source: Arc<dyn TimeSource>,
}

impl ValidatorPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            registry: RwLock::new(ValidatorRegistry::new()),
            assessors: RwLock::new(HashMap::new()),
            config,
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Register a validator together with the assessor that speaks for it.
    pub fn register(
        &self,
        validator: Validator,
        assessor: Arc<dyn AnchorAssessor>,
    ) -> PoolResult<()> {
        let id = validator.id.clone();
        let group = validator.independence_group.clone();
        self.registry.write().register(validator)?;
        self.assessors.write().insert(id.clone(), assessor);
        debug!(validator = %id, group = %group, "validator registered");
        Ok(())
    }

    pub fn get(&self, validator_id: &ValidatorId) -> Option<Validator> {
        self.registry.read().get(validator_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    pub fn active_groups(&self) -> BTreeSet<String> {
        self.registry.read().active_groups()
    }

    pub fn suspensions(&self) -> Vec<Suspension> {
        self.registry.read().suspensions().to_vec()
    }

    /// Whether the registered set matches the configured size.
    pub fn is_at_expected_size(&self) -> bool {
        let len = self.len();
        if len != self.config.expected_size {
            warn!(
                registered = len,
                expected = self.config.expected_size,
                "validator pool size differs from configuration"
            );
            return false;
        }
        true
    }

    /// Check range and signature of a raw response.
    fn authenticate(
        validator: &Validator,
        round_id: &Uuid,
        proposal: &AnchorProposal,
        response: &AssessmentResponse,
    ) -> Result<(), UnavailableCause> {
        if !response.confidence.is_finite() || !(0.0..=1.0).contains(&response.confidence) {
            return Err(UnavailableCause::ConfidenceOutOfRange(response.confidence));
        }

        let signature = response.signature.ok_or(UnavailableCause::Unsigned)?;
        let message = vote_signing_message(
            round_id,
            proposal,
            &validator.id,
            response.assessment,
            response.confidence,
        );
        validator
            .public_key
            .verify(&message, &signature)
            .map_err(|_| UnavailableCause::BadSignature)
    }

    fn unavailable(validator_id: &ValidatorId, cause: UnavailableCause) -> PoolError {
        debug!(validator = %validator_id, cause = %cause, "validator unavailable");
        PoolError::ValidatorUnavailable {
            validator_id: validator_id.clone(),
            cause,
        }
    }
}

#[async_trait]
impl ValidatorPoolApi for ValidatorPool {
    fn list_active(&self) -> Vec<Validator> {
        self.registry.read().list_active()
    }

    async fn assess(
        &self,
        validator_id: &ValidatorId,
        round_id: Uuid,
        proposal: &AnchorProposal,
        deadline: Duration,
    ) -> PoolResult<Vote> {
        let (validator, assessor) = {
            let registry = self.registry.read();
            let validator = registry
                .get(validator_id)
                .cloned()
                .ok_or_else(|| PoolError::UnknownValidator(validator_id.clone()))?;
            if !validator.is_active() {
                return Err(PoolError::ValidatorSuspended(validator_id.clone()));
            }
            let assessor = self
                .assessors
                .read()
                .get(validator_id)
                .cloned()
                .ok_or_else(|| PoolError::UnknownValidator(validator_id.clone()))?;
            (validator, assessor)
        };

        let call = assessor.assess(round_id, proposal);
        let response = match tokio::time::timeout(deadline, call).await {
            Err(_) => return Err(Self::unavailable(validator_id, UnavailableCause::Timeout)),
            Ok(Err(e)) => {
                return Err(Self::unavailable(
                    validator_id,
                    UnavailableCause::Transport(e.to_string()),
                ))
            }
            Ok(Ok(response)) => response,
        };

        Self::authenticate(&validator, &round_id, proposal, &response)
            .map_err(|cause| Self::unavailable(validator_id, cause))?;

        Ok(Vote {
            validator_id: validator.id,
            anchor_id: proposal.anchor_id.clone(),
            assessment: response.assessment,
            confidence: response.confidence,
            cast_at: self.time_source.now_millis(),
        })
    }

    fn suspend(&self, validator_id: &ValidatorId, reason: &str) -> PoolResult<Suspension> {
        let now = self.time_source.now_millis();
        let suspension = self.registry.write().suspend(validator_id, reason, now)?;
        info!(validator = %validator_id, reason = %reason, "validator suspended");
        Ok(suspension)
    }
}
