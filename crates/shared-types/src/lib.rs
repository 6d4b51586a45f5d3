//! # Shared Types Crate
//!
//! This crate contains all domain entities exchanged between the Anchor-Chain
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutability by construction**: `Vote`, `SealedAnchor` and
//!   `ConsensusDecision` are plain values; nothing in the workspace mutates
//!   one after it has been recorded.
//! - **Millisecond time**: every timestamp is milliseconds since the Unix epoch
//!   and is read through a [`TimeSource`] so tests can pin the clock.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
