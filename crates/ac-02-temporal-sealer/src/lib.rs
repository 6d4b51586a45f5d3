//! # ac-02-temporal-sealer
//!
//! Produces tamper-evident, strictly ordered seals for accepted anchors.
//!
//! ## Seal Construction
//!
//! ```text
//! seal_hash = SHA-256( "anchor-chain/seal/v1"
//!                    ‖ payload_hash
//!                    ‖ previous_seal_hash (or the genesis marker)
//!                    ‖ sealed_at )
//! ```
//!
//! The hash is a pure function of its three inputs, so any stored seal can be
//! re-verified independently. Linking each seal to its predecessor turns the
//! registry into a single append-only chain.
//!
//! ## Ordering
//!
//! `sealed_at` is strictly increasing across the seals one sealer produces,
//! even when the wall clock stalls or steps backwards. The sealer itself does
//! not serialize callers; the consensus coordinator holds the chain lock
//! around every seal + commit pair.

pub mod domain;
pub mod service;

pub use domain::{compute_seal_hash, seal_at, verify_chain, verify_seal, SealError, SealResult};
pub use service::TemporalSealer;
