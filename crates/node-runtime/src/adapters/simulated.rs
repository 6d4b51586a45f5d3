//! Simulated validator set.
//!
//! Each validator gets a deterministic Ed25519 key derived from its index and
//! a [`LocalAssessor`] that applies [`simulated_rule`]. Good enough to run the
//! node end to end without external reviewers.

use std::sync::Arc;
use std::time::Duration;

use ac_01_validator_pool::{AssessmentRule, LocalAssessor, PoolResult, Validator, ValidatorPool};
use shared_crypto::{sha256, Ed25519KeyPair};
use shared_types::Assessment;
use tracing::info;

use crate::container::config::SimulationConfig;

/// Accept unless the proposal is obviously malformed.
///
/// An all-zero payload hash or a blank owner reference is rejected.
pub fn simulated_rule() -> AssessmentRule {
    Arc::new(|proposal| {
        let blank_owner = proposal.owner_reference.as_str().trim().is_empty();
        let zero_payload = proposal.payload_hash.iter().all(|b| *b == 0);
        if blank_owner || zero_payload {
            (Assessment::Reject, 0.95)
        } else {
            (Assessment::Accept, 0.9)
        }
    })
}

fn simulated_keypair(index: usize) -> Ed25519KeyPair {
    let seed = sha256(format!("anchor-chain/simulated-validator/{index}").as_bytes());
    Ed25519KeyPair::from_seed(seed)
}

/// Register `config.validators` simulated validators with `pool`.
pub fn register_simulated_validators(
    pool: &ValidatorPool,
    config: &SimulationConfig,
) -> PoolResult<()> {
    let groups = config.independence_groups.max(1);

    for index in 0..config.validators {
        let id = format!("sim-{index:03}");
        let validator = Validator::new(
            id.as_str(),
            format!("group-{}", index % groups),
            simulated_keypair(index).public_key(),
        );
        let mut assessor = LocalAssessor::new(id.as_str(), simulated_keypair(index), simulated_rule());
        if config.latency_ms > 0 {
            assessor = assessor.with_latency(Duration::from_millis(config.latency_ms));
        }
        pool.register(validator, Arc::new(assessor))?;
    }

    info!(
        validators = config.validators,
        groups, "simulated validator set registered"
    );
    Ok(())
}
