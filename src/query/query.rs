//! The query extraction contract
//!
//! A query turns one item into zero or more rows, declares the sort keys that
//! order those rows globally, and answers cheaply whether an item would only
//! contribute unpopulated rows.

use std::sync::Arc;

use super::alternative::GetAlternative;
use super::errors::{QueryError, QueryResult};
use super::join::JoinInner;
use super::merge::{KeyMap, Merge};
use super::sort::SortKey;
use super::value::Row;

/// Extraction contract implemented by leaf queries and combinators.
///
/// # Invariants
///
/// - Every label named in `sort_keys()` is present in every row returned by
///   `results()` for the same query.
/// - Queries hold no per-call state and can be shared between callers.
pub trait Query<T>: Send + Sync {
    /// Rows for one item. An item may yield no rows, one row, or many.
    fn results(&self, item: &T) -> QueryResult<Vec<Row>>;

    /// Ordered sort keys. The first key is the primary key.
    fn sort_keys(&self) -> Vec<SortKey>;

    /// Stable identity of the query shape
    fn unique_label(&self) -> String;

    /// Labels every row of this query carries.
    ///
    /// Used to validate key maps and joins at construction time. Defaults to
    /// the sort-key labels.
    fn field_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for key in self.sort_keys() {
            if !labels.contains(&key.label) {
                labels.push(key.label);
            }
        }
        labels
    }

    /// Whether `would_produce_unpopulated_row` can be answered at all.
    fn supports_unpopulated_check(&self) -> bool {
        true
    }

    /// True if the rows for `item` would carry only empty values (or there
    /// would be no rows).
    ///
    /// The default runs the full extraction and inspects the rows. Leaves that
    /// can answer from item state directly should override it.
    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        if !self.supports_unpopulated_check() {
            return Err(QueryError::unsupported("query cannot detect unpopulated rows")
                .for_query(self.unique_label()));
        }
        let rows = self.results(item)?;
        Ok(rows.iter().all(Row::is_unpopulated))
    }
}

impl<T, Q: Query<T> + ?Sized> Query<T> for Box<Q> {
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        (**self).results(item)
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        (**self).sort_keys()
    }

    fn unique_label(&self) -> String {
        (**self).unique_label()
    }

    fn field_labels(&self) -> Vec<String> {
        (**self).field_labels()
    }

    fn supports_unpopulated_check(&self) -> bool {
        (**self).supports_unpopulated_check()
    }

    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        (**self).would_produce_unpopulated_row(item)
    }
}

impl<T, Q: Query<T> + ?Sized> Query<T> for Arc<Q> {
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        (**self).results(item)
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        (**self).sort_keys()
    }

    fn unique_label(&self) -> String {
        (**self).unique_label()
    }

    fn field_labels(&self) -> Vec<String> {
        (**self).field_labels()
    }

    fn supports_unpopulated_check(&self) -> bool {
        (**self).supports_unpopulated_check()
    }

    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        (**self).would_produce_unpopulated_row(item)
    }
}

/// Combinator methods available on every query
pub trait QueryExt<T>: Query<T> + Sized {
    /// Per-item Cartesian product with `other`
    fn join_inner<B: Query<T>>(self, other: B) -> QueryResult<JoinInner<Self, B>> {
        JoinInner::<Self, B>::new::<T>(self, other)
    }

    /// This query's rows plus `other`'s rows relabeled through `key_map`
    fn merge<B: Query<T>>(self, other: B, key_map: KeyMap) -> QueryResult<Merge<Self, B>> {
        Merge::<Self, B>::new::<T>(self, other, key_map)
    }

    /// This query's rows, or `other`'s relabeled rows where this one is
    /// unpopulated
    fn get_alternative<B: Query<T>>(
        self,
        other: B,
        key_map: KeyMap,
    ) -> QueryResult<GetAlternative<Self, B>> {
        GetAlternative::<Self, B>::new::<T>(self, other, key_map)
    }

    /// Erases the concrete type
    fn boxed(self) -> Box<dyn Query<T>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T, Q: Query<T>> QueryExt<T> for Q {}
