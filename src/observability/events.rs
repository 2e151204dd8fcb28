//! Observability events for rowquery
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Item collection loaded into the repository
    ItemsLoaded,

    // Query operations
    /// Query request received
    QueryReceived,
    /// Query composed and validated
    QueryBuilt,
    /// Query rejected at construction
    QueryRejected,
    /// Query materialized successfully
    QueryExecuted,
    /// Query failed while materializing
    QueryFailed,

    // Explain operations
    /// Explain complete
    ExplainComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ItemsLoaded => "ITEMS_LOADED",

            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryBuilt => "QUERY_BUILT",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",

            Event::ExplainComplete => "EXPLAIN_COMPLETE",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::QueryRejected | Event::QueryFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
