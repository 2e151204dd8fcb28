//! Query Executor subsystem for rowquery
//!
//! The executor applies a query to every item of a source and produces one
//! globally ordered result set.
//!
//! # Execution Flow (strict order)
//!
//! 1. Enumerate items
//! 2. Extract rows per item
//! 3. Assign sequence numbers in (item order, row order)
//! 4. Sort by sort keys, sequence as final tie-break
//! 5. Apply limit
//! 6. Return ordered results
//!
//! # Invariants
//!
//! - Deterministic execution: same items + same query = same order
//! - Duplicate key values are never an error
//! - A failing query yields no partial result set

mod errors;
mod executor;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::{ExecutionOptions, ItemSource, QueryExecutor};
pub use result::{ExecutionStats, RecordToken, ResultSet};
pub use sorter::ResultSorter;
