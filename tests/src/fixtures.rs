//! Scripted validator networks.
//!
//! A [`NetworkBuilder`] wires the real subsystems together with one
//! [`LocalAssessor`] per scripted validator. Keys are derived from the
//! validator index so runs are reproducible.

use std::sync::Arc;
use std::time::Duration;

use ac_01_validator_pool::{LocalAssessor, PoolConfig, Validator, ValidatorPool};
use ac_04_anchor_registry::{AnchorRegistry, InMemoryKVStore, KeyValueStore};
use ac_05_audit_log::{AuditLog, AuditStore, InMemoryAuditStore};
use ac_06_consensus::{
    ConsensusConfig, ConsensusDependencies, ConsensusService, MisbehaviorDetector,
    NoMisbehaviorDetector, RoundParams,
};
use shared_crypto::Ed25519KeyPair;
use shared_types::{AnchorProposal, Assessment};

/// How one validator behaves for the whole test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Script {
    Accept,
    Reject,
    /// Responds, but declines to judge.
    Abstain,
    /// Answers `accept` after the delay.
    Slow(Duration),
    /// Never answers within any sane deadline.
    Silent,
    /// Signs with a key the pool does not know.
    BadKey,
}

/// `[(3, Script::Accept), (2, Script::Reject)]` -> five scripts.
pub fn scripts(counts: &[(usize, Script)]) -> Vec<Script> {
    counts
        .iter()
        .flat_map(|(n, s)| std::iter::repeat(*s).take(*n))
        .collect()
}

pub fn keypair(index: usize) -> Ed25519KeyPair {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&(index as u64).to_le_bytes());
    seed[31] = 0xAC;
    Ed25519KeyPair::from_seed(seed)
}

fn assessor(index: usize, id: &str, script: Script) -> LocalAssessor {
    let fixed = |a| LocalAssessor::fixed(id, keypair(index), a, 0.8);
    match script {
        Script::Accept => fixed(Assessment::Accept),
        Script::Reject => fixed(Assessment::Reject),
        Script::Abstain => fixed(Assessment::Abstain),
        Script::Slow(delay) => fixed(Assessment::Accept).with_latency(delay),
        Script::Silent => fixed(Assessment::Accept).with_latency(Duration::from_secs(3_600)),
        Script::BadKey => {
            LocalAssessor::fixed(id, keypair(index + 10_000), Assessment::Accept, 0.8)
        }
    }
}

pub fn proposal(anchor: &str, owner: &str, payload: u8) -> AnchorProposal {
    AnchorProposal::new(anchor, owner, [payload; 32], 1_000)
}

/// 0.67 / 11 / 5000 ms.
pub fn default_params() -> RoundParams {
    RoundParams::new(0.67, 11, 5_000)
}

pub type TestConsensus<K = InMemoryKVStore, A = InMemoryAuditStore> =
    ConsensusService<ValidatorPool, AnchorRegistry<K>, AuditLog<A>>;

/// A wired network plus handles on its parts.
pub struct Network<K: KeyValueStore = InMemoryKVStore, A: AuditStore = InMemoryAuditStore> {
    pub consensus: Arc<TestConsensus<K, A>>,
    pub pool: Arc<ValidatorPool>,
    pub registry: Arc<AnchorRegistry<K>>,
    pub audit: Arc<AuditLog<A>>,
}

pub struct NetworkBuilder {
    scripts: Vec<Script>,
    groups: usize,
    weights: Vec<f64>,
    config: ConsensusConfig,
    detector: Arc<dyn MisbehaviorDetector>,
}

impl NetworkBuilder {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            groups: 7,
            weights: Vec::new(),
            config: ConsensusConfig::default(),
            detector: Arc::new(NoMisbehaviorDetector),
        }
    }

    pub fn groups(mut self, groups: usize) -> Self {
        self.groups = groups.max(1);
        self
    }

    /// Trust weight per validator index; missing entries use the default.
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(mut self, config: ConsensusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn detector(mut self, detector: Arc<dyn MisbehaviorDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn build(self) -> Network {
        self.build_with(InMemoryKVStore::new(), InMemoryAuditStore::new())
    }

    pub fn build_with<K, A>(self, registry_store: K, audit_store: A) -> Network<K, A>
    where
        K: KeyValueStore + 'static,
        A: AuditStore + 'static,
    {
        let pool = Arc::new(ValidatorPool::new(PoolConfig {
            expected_size: self.scripts.len(),
        }));
        for (index, script) in self.scripts.iter().enumerate() {
            let id = format!("validator-{index:02}");
            let mut validator = Validator::new(
                id.as_str(),
                format!("group-{}", index % self.groups),
                keypair(index).public_key(),
            );
            if let Some(weight) = self.weights.get(index) {
                validator = validator.with_trust_weight(*weight);
            }
            pool.register(validator, Arc::new(assessor(index, &id, *script)))
                .expect("scripted validator registers");
        }

        let registry = Arc::new(AnchorRegistry::open(registry_store).expect("registry opens"));
        let audit = Arc::new(AuditLog::open(audit_store).expect("audit log opens"));
        let consensus = ConsensusService::new(ConsensusDependencies {
            pool: Arc::clone(&pool),
            registry: Arc::clone(&registry),
            audit: Arc::clone(&audit),
            detector: self.detector,
            config: self.config,
        })
        .expect("consensus service builds");

        Network {
            consensus: Arc::new(consensus),
            pool,
            registry,
            audit,
        }
    }
}

/// Shorthand for a default network over the given scripts.
pub fn network(scripts: Vec<Script>) -> Network {
    NetworkBuilder::new(scripts).build()
}
