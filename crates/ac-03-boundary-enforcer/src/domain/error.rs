use shared_types::StorageError;
use thiserror::Error;

/// Boundary enforcer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("Committed state unreadable: {0}")]
    Storage(#[from] StorageError),
}

pub type BoundaryResult<T> = Result<T, BoundaryError>;
