//! # ac-04-anchor-registry
//!
//! Authoritative store of sealed anchors and the single source of truth for
//! chain ordering.
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `anchor/<anchor_id>` | bincode `SealedAnchor` |
//! | `payload/<payload_hash>` | anchor id that first sealed the payload |
//! | `chain/<sequence, big-endian u64>` | anchor id at that position |
//! | `meta/head` | bincode `ChainHead` |
//!
//! Every commit writes all of its keys in one atomic batch: a commit either
//! lands completely or not at all.
//!
//! ## Commit Rules
//!
//! A sealed anchor is accepted only if its id is new, its payload is not
//! sealed under another owner, its `previous_seal_hash` equals the current
//! head, its seal re-verifies, and its timestamp advances past the head.
//! The registry is therefore the sole writer of the chain linkage.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use domain::{ChainHead, RegistryError, RegistryResult};
pub use ports::{AnchorRegistryApi, BatchOperation, KeyValueStore};
pub use service::AnchorRegistry;
