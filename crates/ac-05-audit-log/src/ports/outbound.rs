use crate::domain::AuditEntry;
use shared_types::StorageError;

/// Durable backing for the audit log.
///
/// Production: `JsonLinesAuditStore`
/// Testing: `InMemoryAuditStore`
pub trait AuditStore: Send + Sync {
    /// Persist one entry. Must be durable when this returns `Ok`.
    fn append(&mut self, entry: &AuditEntry) -> Result<(), StorageError>;

    /// Every persisted entry in append order.
    fn load_all(&self) -> Result<Vec<AuditEntry>, StorageError>;
}
