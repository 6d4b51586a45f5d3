//! # Anchor-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Scripted validator networks
//! └── integration/      # Cross-subsystem flows
//!     ├── consensus_flows.rs
//!     ├── concurrency.rs
//!     ├── tamper_evidence.rs
//!     └── node_surface.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ac-tests
//!
//! # By category
//! cargo test -p ac-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p ac-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
