//! Query subsystem for rowquery
//!
//! A query describes, per item, rows of labeled field values. Queries are
//! composed with three combinators and then materialized by the executor.
//!
//! # Combinators
//!
//! - `JoinInner(A, B)`: per-item Cartesian product, A orders before B
//! - `Merge(A, B, key_map)`: A's rows plus B's relabeled rows, A's order wins
//! - `GetAlternative(A, B, key_map)`: per item, A's rows if populated, else
//!   B's relabeled rows, else one empty row
//!
//! # Invariants
//!
//! - Key maps and join labels are validated when the combinator is built,
//!   never while rows are produced
//! - Queries are immutable and `Send + Sync`

mod alternative;
mod errors;
mod join;
mod leaf;
mod merge;
mod query;
mod sort;
mod value;

pub use alternative::GetAlternative;
pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
pub use join::JoinInner;
pub use leaf::FieldQuery;
pub use merge::{KeyMap, Merge};
pub use query::{Query, QueryExt};
pub use sort::{Comparator, SortDirection, SortKey};
pub use value::{FieldValue, Row};
