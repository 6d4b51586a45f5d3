//! # ac-06-consensus
//!
//! Consensus Coordinator for Anchor-Chain.
//!
//! ## Round Lifecycle
//!
//! ```text
//! propose(proposal, params)
//!   ├── boundary check ── conflict ──► rejected(boundary_violation)
//!   ├── fan out assess() to every active validator (own timeout each)
//!   ├── collect until all answered, the deadline, or cancellation
//!   ├── missing and failed responses become abstain votes
//!   ├── tally ──► accepted | rejected | insufficient_quorum
//!   ├── accepted: seal + commit under the chain lock
//!   │     └── lost race ──► rejected(duplicate_anchor | payload_collision)
//!   └── record decision and votes in the audit log, then return
//! ```
//!
//! The decision is returned only after the audit log has accepted it. A
//! round whose decision cannot be logged fails with `ConsensusError::Audit`.
//!
//! ## Concurrency
//!
//! Rounds for different anchors run in parallel. Only seal + commit is
//! serialized, through a single `ChainWriter` that owns the chain head.

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{NoMisbehaviorDetector, RegistryAnchorReader, RepeatedFailureDetector};
pub use domain::{
    decide, ConsensusConfig, ConsensusError, ConsensusMode, ConsensusResult, RoundParams, Tally,
    ValidatorFailure, Verdict, VoteBook,
};
pub use ports::{ConsensusApi, MisbehaviorDetector, RoundReport};
pub use service::{ChainWriter, ConsensusDependencies, ConsensusService, RoundHandle};
