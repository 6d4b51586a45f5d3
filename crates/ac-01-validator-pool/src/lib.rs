//! # ac-01-validator-pool
//!
//! Registry of independent assessors and the single capability they share:
//! "assess an anchor proposal and return an assessment with a confidence".
//!
//! ## Responsibilities
//!
//! - Hold validator identities, independence groups and trust weights
//! - Dispatch one `assess` call to one validator, bounded by a deadline
//! - Authenticate the response (Ed25519 signature over the vote contents)
//! - Suspend misbehaving validators without erasing their history
//!
//! Concrete assessors (human review desks, rule engines, ML scorers) live
//! outside this crate and plug in through [`ports::AnchorAssessor`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ac_01_validator_pool::{PoolConfig, Validator, ValidatorPool, ValidatorPoolApi};
//!
//! let pool = ValidatorPool::new(PoolConfig::default());
//! pool.register(Validator::new("v-01", "region-a", public_key), assessor)?;
//!
//! let vote = pool
//!     .assess(&"v-01".into(), round_id, &proposal, Duration::from_secs(2))
//!     .await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{AssessmentRule, LocalAssessor};
pub use domain::{
    vote_signing_message, PoolConfig, PoolError, PoolResult, Suspension, UnavailableCause,
    Validator, ValidatorRegistry, ValidatorStatus, DEFAULT_TRUST_WEIGHT,
};
pub use ports::{AnchorAssessor, AssessmentResponse, AssessorError, ValidatorPoolApi};
pub use service::ValidatorPool;
