//! Audit store adapters.

mod jsonl;
mod memory;

pub use jsonl::JsonLinesAuditStore;
pub use memory::InMemoryAuditStore;
