use crate::domain::AuditEntry;
use crate::ports::AuditStore;
use shared_types::StorageError;

/// Volatile audit store for tests and simulations.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditStore {
    entries: Vec<AuditEntry>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with pre-existing entries, as if reloaded from disk.
    pub fn with_entries(entries: Vec<AuditEntry>) -> Self {
        Self { entries }
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), StorageError> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<AuditEntry>, StorageError> {
        Ok(self.entries.clone())
    }
}
