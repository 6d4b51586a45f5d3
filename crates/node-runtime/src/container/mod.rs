//! # Subsystem Container
//!
//! Configuration plus the container that builds every subsystem in
//! dependency order and hands out the consensus service.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig, SimulationConfig, StorageConfig, SurfaceConfig};
pub use subsystems::{NodeAuditLog, NodeConsensus, NodeRegistry, SubsystemContainer};
