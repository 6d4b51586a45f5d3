//! Storage backends chosen at startup.
//!
//! Each enum forwards the port to whichever store the configuration selected,
//! so the services stay monomorphic.

use std::path::Path;

use ac_04_anchor_registry::{BatchOperation, FileBackedKVStore, InMemoryKVStore, KeyValueStore};
use ac_05_audit_log::{AuditEntry, AuditStore, InMemoryAuditStore, JsonLinesAuditStore};
use shared_types::StorageError;

/// Key-value store behind the anchor registry.
pub enum RegistryStore {
    Memory(InMemoryKVStore),
    File(FileBackedKVStore),
}

impl RegistryStore {
    /// File-backed when a path is given, in memory otherwise.
    pub fn open(path: Option<&Path>) -> Result<Self, StorageError> {
        match path {
            Some(path) => Ok(Self::File(FileBackedKVStore::open(path)?)),
            None => Ok(Self::Memory(InMemoryKVStore::new())),
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl KeyValueStore for RegistryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Self::Memory(s) => s.get(key),
            Self::File(s) => s.get(key),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Memory(s) => s.put(key, value),
            Self::File(s) => s.put(key, value),
        }
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Memory(s) => s.delete(key),
            Self::File(s) => s.delete(key),
        }
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        match self {
            Self::Memory(s) => s.atomic_batch_write(operations),
            Self::File(s) => s.atomic_batch_write(operations),
        }
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        match self {
            Self::Memory(s) => s.prefix_scan(prefix),
            Self::File(s) => s.prefix_scan(prefix),
        }
    }
}

/// Store behind the audit log.
pub enum AuditBackend {
    Memory(InMemoryAuditStore),
    JsonLines(JsonLinesAuditStore),
}

impl AuditBackend {
    /// JSON-lines file when a path is given, in memory otherwise.
    pub fn open(path: Option<&Path>) -> Result<Self, StorageError> {
        match path {
            Some(path) => Ok(Self::JsonLines(JsonLinesAuditStore::open(path)?)),
            None => Ok(Self::Memory(InMemoryAuditStore::new())),
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Self::JsonLines(_))
    }
}

impl AuditStore for AuditBackend {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), StorageError> {
        match self {
            Self::Memory(s) => s.append(entry),
            Self::JsonLines(s) => s.append(entry),
        }
    }

    fn load_all(&self) -> Result<Vec<AuditEntry>, StorageError> {
        match self {
            Self::Memory(s) => s.load_all(),
            Self::JsonLines(s) => s.load_all(),
        }
    }
}
