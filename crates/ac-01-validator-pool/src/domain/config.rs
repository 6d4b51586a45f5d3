use serde::{Deserialize, Serialize};

/// Validator pool configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of validators the deployment is expected to register.
    pub expected_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { expected_size: 21 }
    }
}
