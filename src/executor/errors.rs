//! Executor error types
//!
//! Error codes:
//! - ROWQ_EXECUTION_FAILED (ERROR)
//!
//! Construction-time query errors never reach the executor. What remains is a
//! query failing while rows are produced, in which case no partial result set
//! is returned.

use std::fmt;

use crate::query::{QueryError, QueryErrorCode};
use crate::repository::RepositoryId;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed but the collection is untouched
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// A query failed while producing rows
    RowqExecutionFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::RowqExecutionFailed => "ROWQ_EXECUTION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    item: Option<RepositoryId>,
    source: Option<QueryError>,
}

impl ExecutorError {
    /// Create an execution failed error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::RowqExecutionFailed,
            message: reason.into(),
            item: None,
            source: None,
        }
    }

    /// Wrap a query error raised while visiting `item`
    pub fn query_failed(item: RepositoryId, source: QueryError) -> Self {
        Self {
            code: ExecutorErrorCode::RowqExecutionFailed,
            message: format!("query failed on {}: {}", item, source.message()),
            item: Some(item),
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the item being visited when the error was raised
    pub fn item(&self) -> Option<RepositoryId> {
        self.item
    }

    /// Returns the code of the underlying query error, if any
    pub fn query_code(&self) -> Option<QueryErrorCode> {
        self.source.as_ref().map(QueryError::code)
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
