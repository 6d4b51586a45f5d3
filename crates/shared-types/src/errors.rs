//! # Error Types
//!
//! Errors shared by more than one subsystem.

use thiserror::Error;

/// Errors raised by a key-value store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Stored bytes could not be decoded.
    #[error("Data corruption at key {key}: {reason}")]
    DataCorruption { key: String, reason: String },

    /// Value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),
}
