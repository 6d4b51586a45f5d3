use crate::domain::AuditEntry;
use crate::ports::AuditStore;
use shared_types::StorageError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Write handle under the JSON-lines store.
///
/// `truncate` must leave the next append landing right after `len` bytes.
pub(crate) trait LogFile: Write + Send + Sync {
    fn len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Append-only JSON-lines file, one entry per line, synced on every append.
///
/// A failed append is rolled back to the previous line boundary. If the
/// rollback itself fails the store refuses further appends rather than glue
/// the next entry onto a torn line.
pub struct JsonLinesAuditStore {
    path: PathBuf,
    file: Box<dyn LogFile>,
    poisoned: Option<String>,
}

impl JsonLinesAuditStore {
    /// Open (or create) the log file at `path`.
    ///
    /// A trailing line without its newline is a write torn by a crash; it is
    /// cut off before anything is read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(io_error)?;
        repair_torn_tail(&path, &file)?;
        info!("[ac-05] Audit log file: {}", path.display());
        Ok(Self::with_file(path, Box::new(file)))
    }

    pub(crate) fn with_file(path: PathBuf, file: Box<dyn LogFile>) -> Self {
        Self {
            path,
            file,
            poisoned: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()?;
        self.file.sync()
    }

    fn roll_back(&mut self, len: u64) {
        match self.file.truncate(len).and_then(|_| self.file.sync()) {
            Ok(()) => warn!(
                "[ac-05] Rolled back failed append on {} to {} bytes",
                self.path.display(),
                len
            ),
            Err(e) => {
                error!(
                    "[ac-05] Rollback of {} failed, refusing further appends: {}",
                    self.path.display(),
                    e
                );
                self.poisoned = Some(e.to_string());
            }
        }
    }
}

fn io_error(e: io::Error) -> StorageError {
    StorageError::DatabaseError(e.to_string())
}

/// Cut the file back to its last newline if the final line is incomplete.
fn repair_torn_tail(path: &Path, file: &File) -> Result<(), StorageError> {
    let bytes = std::fs::read(path).map_err(io_error)?;
    if bytes.last().map_or(true, |b| *b == b'\n') {
        return Ok(());
    }
    let keep = bytes
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    warn!(
        "[ac-05] Dropping {} bytes of torn trailing line in {}",
        bytes.len() - keep,
        path.display()
    );
    file.set_len(keep as u64).map_err(io_error)?;
    file.sync_data().map_err(io_error)
}

impl AuditStore for JsonLinesAuditStore {
    fn append(&mut self, entry: &AuditEntry) -> Result<(), StorageError> {
        if let Some(reason) = &self.poisoned {
            return Err(StorageError::DatabaseError(format!(
                "audit file {} needs repair after failed rollback: {}",
                self.path.display(),
                reason
            )));
        }

        let mut line =
            serde_json::to_vec(entry).map_err(|e| StorageError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let len = self.file.len().map_err(io_error)?;
        if let Err(e) = self.write_line(&line) {
            self.roll_back(len);
            return Err(io_error(e));
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<AuditEntry>, StorageError> {
        let reader = BufReader::new(File::open(&self.path).map_err(io_error)?);
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(io_error)?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| StorageError::DataCorruption {
                key: format!("{}:{}", self.path.display(), index + 1),
                reason: e.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
