//! Repository errors

use thiserror::Error;

use super::memory::RepositoryId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Item not found: {0}")]
    ItemNotFound(RepositoryId),

    #[error("Repository is full: {0} items (max: {1})")]
    CapacityExceeded(usize, usize),
}

impl RepositoryError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::ItemNotFound(_) => "ROWQ_ITEM_NOT_FOUND",
            RepositoryError::CapacityExceeded(_, _) => "ROWQ_REPOSITORY_FULL",
        }
    }
}
