//! Validator domain entities

use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use shared_types::{Timestamp, ValidatorId};

/// Default trust weight for a newly registered validator.
pub const DEFAULT_TRUST_WEIGHT: f64 = 1.0;

/// Whether a validator takes part in fan-outs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    Active,
    Suspended,
}

/// Individual validator information
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub id: ValidatorId,
    /// Validators sharing a group are assumed to fail together.
    pub independence_group: String,
    pub trust_weight: f64,
    pub status: ValidatorStatus,
    /// Key every assessment response must be signed with.
    pub public_key: Ed25519PublicKey,
}

impl Validator {
    /// Create an active validator with the default trust weight.
    pub fn new(
        id: impl Into<ValidatorId>,
        independence_group: impl Into<String>,
        public_key: Ed25519PublicKey,
    ) -> Self {
        Self {
            id: id.into(),
            independence_group: independence_group.into(),
            trust_weight: DEFAULT_TRUST_WEIGHT,
            status: ValidatorStatus::Active,
            public_key,
        }
    }

    pub fn with_trust_weight(mut self, trust_weight: f64) -> Self {
        self.trust_weight = trust_weight;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ValidatorStatus::Active
    }
}

/// Record of a suspension. Kept forever so the history stays auditable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suspension {
    pub validator_id: ValidatorId,
    pub reason: String,
    pub suspended_at: Timestamp,
}
