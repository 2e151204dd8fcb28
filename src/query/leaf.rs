//! Closure-backed leaf query
//!
//! `FieldQuery` extracts one field from an item: every extracted value
//! becomes its own row, so an item with a multi-valued field appears once per
//! value in the result set.

use std::fmt;
use std::sync::Arc;

use super::errors::{QueryError, QueryResult};
use super::query::Query;
use super::sort::SortKey;
use super::value::{FieldValue, Row};

type ExtractFn<T> = dyn Fn(&T) -> Vec<FieldValue> + Send + Sync;
type CheckFn<T> = dyn Fn(&T) -> bool + Send + Sync;

enum UnpopulatedCheck<T> {
    /// Answer by running the extractor
    Derived,
    /// Answer from item state
    Direct(Arc<CheckFn<T>>),
    /// Cannot answer
    Unsupported,
}

impl<T> Clone for UnpopulatedCheck<T> {
    fn clone(&self) -> Self {
        match self {
            UnpopulatedCheck::Derived => UnpopulatedCheck::Derived,
            UnpopulatedCheck::Direct(f) => UnpopulatedCheck::Direct(Arc::clone(f)),
            UnpopulatedCheck::Unsupported => UnpopulatedCheck::Unsupported,
        }
    }
}

/// Leaf query over a single field of `T`
pub struct FieldQuery<T> {
    label: String,
    sort_key: SortKey,
    extract: Arc<ExtractFn<T>>,
    check: UnpopulatedCheck<T>,
}

impl<T> FieldQuery<T> {
    /// Creates a leaf query.
    ///
    /// `sort_key.label` names the field every row carries; `extract` returns
    /// one value per row.
    pub fn new<F>(label: impl Into<String>, sort_key: SortKey, extract: F) -> Self
    where
        F: Fn(&T) -> Vec<FieldValue> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            sort_key,
            extract: Arc::new(extract),
            check: UnpopulatedCheck::Derived,
        }
    }

    /// Answers `would_produce_unpopulated_row` from item state directly
    pub fn with_unpopulated_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.check = UnpopulatedCheck::Direct(Arc::new(check));
        self
    }

    /// Marks the query as unable to detect unpopulated rows
    pub fn without_unpopulated_check(mut self) -> Self {
        self.check = UnpopulatedCheck::Unsupported;
        self
    }

    /// Field label the rows carry
    pub fn field(&self) -> &str {
        &self.sort_key.label
    }
}

impl<T> Clone for FieldQuery<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            sort_key: self.sort_key.clone(),
            extract: Arc::clone(&self.extract),
            check: self.check.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldQuery")
            .field("label", &self.label)
            .field("sort_key", &self.sort_key)
            .finish()
    }
}

impl<T> Query<T> for FieldQuery<T> {
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        Ok((self.extract)(item)
            .into_iter()
            .map(|value| Row::new().with(self.sort_key.label.clone(), value))
            .collect())
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        vec![self.sort_key.clone()]
    }

    fn unique_label(&self) -> String {
        self.label.clone()
    }

    fn supports_unpopulated_check(&self) -> bool {
        !matches!(self.check, UnpopulatedCheck::Unsupported)
    }

    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        match &self.check {
            UnpopulatedCheck::Direct(check) => Ok(check(item)),
            UnpopulatedCheck::Derived => {
                Ok((self.extract)(item).iter().all(FieldValue::is_empty))
            }
            UnpopulatedCheck::Unsupported => Err(QueryError::unsupported(
                "leaf query cannot detect unpopulated rows",
            )
            .for_query(self.label.clone())),
        }
    }
}
