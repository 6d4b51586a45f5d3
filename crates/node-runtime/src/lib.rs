//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - Configuration and subsystem wiring
//! - `adapters/` - Storage backend selection, simulated validator set
//! - `handlers/` - JSON-lines proposal surface, metrics endpoint

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod handlers;

pub use container::{NodeConfig, SubsystemContainer};
