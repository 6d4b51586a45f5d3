use shared_types::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("Entry {sequence} is out of sequence (expected {expected})")]
    SequenceGap { sequence: u64, expected: u64 },

    #[error("Entry {sequence} does not link to its predecessor")]
    LinkMismatch { sequence: u64 },

    #[error("Entry {sequence} hash does not match its contents")]
    HashMismatch { sequence: u64 },

    #[error("Audit storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type AuditResult<T> = Result<T, AuditError>;
