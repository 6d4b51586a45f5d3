//! # Subsystem Container
//!
//! Holds all subsystem instances and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. Validator Pool (ac-01)     simulated validator set
//! 2. Anchor Registry (ac-04)    open store, verify the chain
//! 3. Audit Log (ac-05)          open store, verify the hash links
//! 4. Consensus (ac-06)          owns Sealer (ac-02) and Boundary (ac-03)
//! ```
//!
//! A registry or audit log that fails verification stops startup. The node
//! never extends a broken chain.

use std::sync::Arc;

use ac_01_validator_pool::ValidatorPool;
use ac_04_anchor_registry::AnchorRegistry;
use ac_05_audit_log::AuditLog;
use ac_06_consensus::{
    ConsensusDependencies, ConsensusService, MisbehaviorDetector, NoMisbehaviorDetector,
    RepeatedFailureDetector,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{register_simulated_validators, AuditBackend, RegistryStore};
use crate::container::config::NodeConfig;

/// Registry over whichever store was configured.
pub type NodeRegistry = AnchorRegistry<RegistryStore>;

/// Audit log over whichever store was configured.
pub type NodeAuditLog = AuditLog<AuditBackend>;

/// Concrete consensus service the node runs.
pub type NodeConsensus = ConsensusService<ValidatorPool, NodeRegistry, NodeAuditLog>;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub pool: Arc<ValidatorPool>,
    pub registry: Arc<NodeRegistry>,
    pub audit: Arc<NodeAuditLog>,
    pub consensus: Arc<NodeConsensus>,
}

impl SubsystemContainer {
    /// Build and verify every subsystem.
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Initializing subsystems");

        let pool = Arc::new(ValidatorPool::new(config.pool.clone()));
        register_simulated_validators(&pool, &config.simulation)
            .context("registering simulated validators")?;
        if !pool.is_at_expected_size() {
            warn!(
                registered = pool.len(),
                expected = config.pool.expected_size,
                "validator pool below expected size"
            );
        }

        let store = RegistryStore::open(config.storage.registry_path.as_deref())
            .context("opening anchor registry store")?;
        let durable_registry = store.is_durable();
        let registry = AnchorRegistry::open(store).context("loading anchor registry")?;
        registry
            .verify_integrity()
            .context("anchor registry failed chain verification")?;
        let registry = Arc::new(registry);

        let backend = AuditBackend::open(config.storage.audit_path.as_deref())
            .context("opening audit store")?;
        let durable_audit = backend.is_durable();
        let audit = Arc::new(AuditLog::open(backend).context("loading audit log")?);

        info!(
            anchors = registry.len().unwrap_or(0),
            decisions = audit.len(),
            durable_registry,
            durable_audit,
            "storage ready"
        );

        let detector: Arc<dyn MisbehaviorDetector> = if config.suspend_after > 0 {
            Arc::new(RepeatedFailureDetector::new(config.suspend_after))
        } else {
            Arc::new(NoMisbehaviorDetector)
        };

        let consensus = ConsensusService::new(ConsensusDependencies {
            pool: Arc::clone(&pool),
            registry: Arc::clone(&registry),
            audit: Arc::clone(&audit),
            detector,
            config: config.consensus.clone(),
        })
        .context("building consensus service")?;

        info!(
            validators = pool.len(),
            threshold = config.consensus.threshold,
            mode = ?config.consensus.mode,
            "subsystems initialized"
        );

        Ok(Self {
            config,
            pool,
            registry,
            audit,
            consensus: Arc::new(consensus),
        })
    }
}
