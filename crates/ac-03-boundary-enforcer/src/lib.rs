//! # ac-03-boundary-enforcer
//!
//! Guard clause run before any consensus round: does this proposal collide
//! with state that is already sealed?
//!
//! ## Conflict Rules
//!
//! | Existing state | Conflict kind |
//! |----------------|---------------|
//! | Same `anchor_id`, seal validated | `AnchorAlreadySealed` |
//! | Same `anchor_id`, seal fails re-verification | `AnchorIntegrityViolated` |
//! | Same `payload_hash`, different owner | `PayloadClaimedByOtherOwner` |
//!
//! `check` is a pure read against committed state. Conflicts are terminal for
//! the proposal; resolving them (dispute workflows) happens elsewhere.
//! Rejected attempts are appended to a violation ledger through
//! `record_violation`.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{BoundaryCheck, BoundaryError, BoundaryResult, BoundaryViolation};
pub use ports::SealedAnchorReader;
pub use service::{BoundaryEnforcer, DEFAULT_LEDGER_CAPACITY};
