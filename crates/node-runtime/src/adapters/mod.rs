//! # Runtime Adapters
//!
//! Port implementations the binary plugs into the subsystems:
//!
//! - `storage` - backend selection for the registry and audit stores
//! - `simulated` - in-process validator set for local runs

pub mod simulated;
pub mod storage;

pub use simulated::{register_simulated_validators, simulated_rule};
pub use storage::{AuditBackend, RegistryStore};
