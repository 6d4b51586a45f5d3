//! # ac-05-audit-log
//!
//! Append-only record of every consensus decision, with the votes that
//! produced it.
//!
//! Entries are hash-linked: each `entry_hash` covers the entry's contents
//! and the previous entry's hash, so rewriting or dropping any entry breaks
//! every later link. `AuditLog::verify` walks the whole log.
//!
//! Recording is durable before it returns; a store failure leaves the log
//! unchanged and is reported to the caller. Subscribers receive each entry
//! after it is durable.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryAuditStore, JsonLinesAuditStore};
pub use domain::{compute_entry_hash, verify_entries, AuditEntry, AuditError, AuditResult};
pub use ports::{AuditLogApi, AuditStore};
pub use service::AuditLog;
