//! Driving ports (Inbound API)

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{AnchorProposal, ValidatorId, Vote};
use uuid::Uuid;

use crate::domain::{PoolResult, Suspension, Validator};

/// Primary Validator Pool API
#[async_trait]
pub trait ValidatorPoolApi: Send + Sync {
    /// Active validators in registration order.
    fn list_active(&self) -> Vec<Validator>;

    /// Ask one validator to assess a proposal within round `round_id`,
    /// waiting at most `deadline`.
    ///
    /// Slow, failing or unauthenticated validators yield
    /// `PoolError::ValidatorUnavailable`.
    async fn assess(
        &self,
        validator_id: &ValidatorId,
        round_id: Uuid,
        proposal: &AnchorProposal,
        deadline: Duration,
    ) -> PoolResult<Vote>;

    /// Remove a validator from future fan-outs. Past votes are untouched.
    fn suspend(&self, validator_id: &ValidatorId, reason: &str) -> PoolResult<Suspension>;
}
