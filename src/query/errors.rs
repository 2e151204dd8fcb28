//! Query construction error types
//!
//! Error codes:
//! - ROWQ_QUERY_CONFIG_INVALID (REJECT)
//! - ROWQ_QUERY_UNSUPPORTED (REJECT)
//!
//! Both are raised while a query is being composed, before any item is
//! visited. Nothing is recovered automatically.

use std::fmt;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected, nothing was materialized
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Query error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Key map or join references labels that do not line up
    RowqQueryConfigInvalid,
    /// Query lacks a capability the composition needs
    RowqQueryUnsupported,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::RowqQueryConfigInvalid => "ROWQ_QUERY_CONFIG_INVALID",
            QueryErrorCode::RowqQueryUnsupported => "ROWQ_QUERY_UNSUPPORTED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with code and context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
    query: Option<String>,
}

impl QueryError {
    /// Create a configuration error
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::RowqQueryConfigInvalid,
            message: reason.into(),
            query: None,
        }
    }

    /// Create an unsupported capability error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::RowqQueryUnsupported,
            message: reason.into(),
            query: None,
        }
    }

    /// Attach the unique label of the query that raised the error
    pub fn for_query(mut self, label: impl Into<String>) -> Self {
        self.query = Some(label.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
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

    /// Returns the offending query label, if known
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns true for configuration errors
    pub fn is_config_error(&self) -> bool {
        self.code == QueryErrorCode::RowqQueryConfigInvalid
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref query) = self.query {
            write!(f, " (query: {})", query)?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            QueryErrorCode::RowqQueryConfigInvalid.code(),
            "ROWQ_QUERY_CONFIG_INVALID"
        );
        assert_eq!(
            QueryErrorCode::RowqQueryUnsupported.code(),
            "ROWQ_QUERY_UNSUPPORTED"
        );
    }

    #[test]
    fn test_config_error_flag() {
        assert!(QueryError::config_invalid("bogus").is_config_error());
        assert!(!QueryError::unsupported("no check").is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::config_invalid("unknown label 'bogus'").for_query("Merge(A,B)");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("ROWQ_QUERY_CONFIG_INVALID"));
        assert!(display.contains("bogus"));
        assert!(display.contains("Merge(A,B)"));
    }
}
