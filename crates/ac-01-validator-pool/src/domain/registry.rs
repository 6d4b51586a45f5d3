//! Validator registry with suspension history.

use std::collections::{BTreeSet, HashMap};

use shared_types::{Timestamp, ValidatorId};

use super::{PoolError, PoolResult, Suspension, Validator, ValidatorStatus};

/// Ordered validator set with an id lookup table.
///
/// Validators are never removed; suspension flips their status and appends a
/// [`Suspension`] record.
#[derive(Clone, Debug, Default)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
    lookup: HashMap<ValidatorId, usize>,
    suspensions: Vec<Suspension>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator. Ids must be unique and trust weights positive.
    pub fn register(&mut self, validator: Validator) -> PoolResult<()> {
        if self.lookup.contains_key(&validator.id) {
            return Err(PoolError::DuplicateValidator(validator.id));
        }
        if !validator.trust_weight.is_finite() || validator.trust_weight <= 0.0 {
            return Err(PoolError::InvalidTrustWeight {
                validator_id: validator.id,
                weight: validator.trust_weight,
            });
        }

        self.lookup
            .insert(validator.id.clone(), self.validators.len());
        self.validators.push(validator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn contains(&self, validator_id: &ValidatorId) -> bool {
        self.lookup.contains_key(validator_id)
    }

    pub fn get(&self, validator_id: &ValidatorId) -> Option<&Validator> {
        self.lookup
            .get(validator_id)
            .map(|&idx| &self.validators[idx])
    }

    /// Active validators in registration order.
    pub fn list_active(&self) -> Vec<Validator> {
        self.validators
            .iter()
            .filter(|v| v.is_active())
            .cloned()
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.validators.iter().filter(|v| v.is_active()).count()
    }

    /// Distinct independence groups among active validators.
    pub fn active_groups(&self) -> BTreeSet<String> {
        self.validators
            .iter()
            .filter(|v| v.is_active())
            .map(|v| v.independence_group.clone())
            .collect()
    }

    /// Remove a validator from future fan-outs.
    pub fn suspend(
        &mut self,
        validator_id: &ValidatorId,
        reason: impl Into<String>,
        at: Timestamp,
    ) -> PoolResult<Suspension> {
        let idx = *self
            .lookup
            .get(validator_id)
            .ok_or_else(|| PoolError::UnknownValidator(validator_id.clone()))?;

        let validator = &mut self.validators[idx];
        if validator.status == ValidatorStatus::Suspended {
            return Err(PoolError::AlreadySuspended(validator_id.clone()));
        }
        validator.status = ValidatorStatus::Suspended;

        let suspension = Suspension {
            validator_id: validator_id.clone(),
            reason: reason.into(),
            suspended_at: at,
        };
        self.suspensions.push(suspension.clone());
        Ok(suspension)
    }

    pub fn suspensions(&self) -> &[Suspension] {
        &self.suspensions
    }
}
