use super::memory::{apply, InMemoryKVStore};
use crate::ports::{BatchOperation, KeyValueStore};
use shared_types::StorageError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed key-value store.
///
/// Keeps the full map in memory and rewrites a bincode snapshot on every
/// mutation (temp file, fsync, rename). A failed write leaves both the file
/// and the in-memory map unchanged.
pub struct FileBackedKVStore {
    inner: InMemoryKVStore,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, creating it empty if the file is absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data: BTreeMap<Vec<u8>, Vec<u8>> =
                    bincode::deserialize(&bytes).map_err(|e| StorageError::DataCorruption {
                        key: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                info!(
                    "[ac-04] Loaded {} keys from {}",
                    data.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[ac-04] No existing registry file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(StorageError::DatabaseError(e.to_string())),
        };

        Ok(Self {
            inner: InMemoryKVStore::from_map(data),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), StorageError> {
        let io = |e: std::io::Error| StorageError::DatabaseError(e.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io)?;
            }
        }

        let bytes =
            bincode::serialize(data).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io)?;
        file.write_all(&bytes).map_err(io)?;
        file.sync_all().map_err(io)?;
        std::fs::rename(&temp_path, &self.path).map_err(io)?;

        debug!("[ac-04] Snapshot written: {} bytes", bytes.len());
        Ok(())
    }

    fn mutate(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        let mut next = self.inner.as_map().clone();
        apply(&mut next, operations);
        self.save(&next)?;
        self.inner = InMemoryKVStore::from_map(next);
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.mutate(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.mutate(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        self.mutate(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        self.inner.exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        self.inner.prefix_scan(prefix)
    }
}
