//! rowquery - composable, deterministic row queries
//!
//! Queries turn each item of a repository into zero or more rows of labeled
//! field values. Three combinators compose them (`JoinInner`, `Merge`,
//! `GetAlternative`) and the executor materializes every row of every item
//! into one globally ordered result set.
//!
//! ```no_run
//! use rowquery::query::{FieldQuery, SortKey};
//! use rowquery::repository::MemoryRepository;
//!
//! struct Entry {
//!     forms: Vec<String>,
//! }
//!
//! let forms = FieldQuery::new("Forms", SortKey::asc("form"), |e: &Entry| {
//!     e.forms.iter().map(|f| f.as_str().into()).collect()
//! });
//!
//! let mut repository = MemoryRepository::new();
//! repository.insert(Entry { forms: vec!["pear".into()] }).unwrap();
//! let results = repository.get_items_matching(&forms).unwrap();
//! assert_eq!(results[0].field("form"), "pear");
//! ```

pub mod cli;
pub mod document;
pub mod executor;
pub mod observability;
pub mod query;
pub mod repository;
