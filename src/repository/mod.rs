//! Item repository for rowquery
//!
//! The query engine only needs to enumerate items and name them. This module
//! provides an in-memory repository that does both, plus create/delete.

mod errors;
mod memory;

pub use errors::{RepositoryError, RepositoryResult};
pub use memory::{MemoryRepository, RepositoryId};
