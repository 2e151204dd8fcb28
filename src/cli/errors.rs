//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::executor::ExecutorError;
use crate::query::QueryError;
use crate::repository::RepositoryError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Data file unreadable or malformed
    DataError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request is not a valid query request
    InvalidRequest,
    /// Query rejected at construction
    QueryRejected,
    /// Query failed while materializing
    ExecutionFailed,
    /// Repository refused an item
    RepositoryError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ROWQ_CLI_CONFIG_ERROR",
            Self::DataError => "ROWQ_CLI_DATA_ERROR",
            Self::IoError => "ROWQ_CLI_IO_ERROR",
            Self::InvalidRequest => "ROWQ_CLI_INVALID_REQUEST",
            Self::QueryRejected => "ROWQ_CLI_QUERY_REJECTED",
            Self::ExecutionFailed => "ROWQ_CLI_EXECUTION_FAILED",
            Self::RepositoryError => "ROWQ_CLI_REPOSITORY_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Code of the underlying subsystem error, when there is one
    cause: Option<&'static str>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Data file error
    pub fn data_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DataError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    fn with_cause(mut self, cause: &'static str) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string.
    ///
    /// Errors raised by a subsystem report that subsystem's code.
    pub fn code_str(&self) -> &'static str {
        self.cause.unwrap_or_else(|| self.code.code())
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_request(format!("JSON error: {}", e))
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        let message = match e.query() {
            Some(query) => format!("{} (query: {})", e.message(), query),
            None => e.message().to_string(),
        };
        Self::new(CliErrorCode::QueryRejected, message).with_cause(e.code().code())
    }
}

impl From<ExecutorError> for CliError {
    fn from(e: ExecutorError) -> Self {
        Self::new(CliErrorCode::ExecutionFailed, e.message()).with_cause(e.code().code())
    }
}

impl From<RepositoryError> for CliError {
    fn from(e: RepositoryError) -> Self {
        Self::new(CliErrorCode::RepositoryError, e.to_string()).with_cause(e.code())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings() {
        assert_eq!(CliErrorCode::ConfigError.code(), "ROWQ_CLI_CONFIG_ERROR");
        assert_eq!(CliErrorCode::DataError.code(), "ROWQ_CLI_DATA_ERROR");
    }

    #[test]
    fn test_query_error_keeps_its_code() {
        let err: CliError = QueryError::config_invalid("bogus key").into();
        assert_eq!(err.code(), CliErrorCode::QueryRejected);
        assert_eq!(err.code_str(), "ROWQ_QUERY_CONFIG_INVALID");
        assert_eq!(err.to_string(), "ROWQ_QUERY_CONFIG_INVALID: bogus key");
    }

    #[test]
    fn test_repository_error_keeps_its_code() {
        let err: CliError = RepositoryError::CapacityExceeded(2, 2).into();
        assert_eq!(err.code_str(), "ROWQ_REPOSITORY_FULL");
    }

    #[test]
    fn test_plain_error_display() {
        let err = CliError::config_error("missing data_file");
        assert_eq!(err.to_string(), "ROWQ_CLI_CONFIG_ERROR: missing data_file");
    }
}
