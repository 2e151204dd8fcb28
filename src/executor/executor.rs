//! Query executor for rowquery
//!
//! Materializes a query against an item source.
//!
//! Execution flow (strict order):
//! 1. Enumerate items from the source
//! 2. Extract rows per item, in enumeration order
//! 3. Wrap each row in a record token with the next sequence number
//! 4. Sort all tokens by the query's sort keys, sequence last
//! 5. Apply limit
//! 6. Return the result set

use crate::observability::{MetricsRegistry, ObservationScope};
use crate::query::Query;
use crate::repository::RepositoryId;

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{ExecutionStats, RecordToken, ResultSet};
use super::sorter::ResultSorter;

/// Trait for enumerating the items a query runs over.
///
/// The enumeration must be stable for the duration of one execution.
pub trait ItemSource<T> {
    /// All items with their identities, in enumeration order
    fn items(&self) -> Vec<(RepositoryId, &T)>;
}

impl<T> ItemSource<T> for [T] {
    fn items(&self) -> Vec<(RepositoryId, &T)> {
        self.iter()
            .enumerate()
            .map(|(i, item)| (RepositoryId::new(i as u64), item))
            .collect()
    }
}

impl<T> ItemSource<T> for Vec<T> {
    fn items(&self) -> Vec<(RepositoryId, &T)> {
        self.as_slice().items()
    }
}

/// Options applied after sorting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Keep at most this many tokens
    pub limit: Option<usize>,
}

impl ExecutionOptions {
    /// Options with a result limit
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// Query executor over an item source
pub struct QueryExecutor<'a, S: ?Sized> {
    source: &'a S,
    metrics: Option<&'a MetricsRegistry>,
    options: ExecutionOptions,
}

impl<'a, S: ?Sized> QueryExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            metrics: None,
            options: ExecutionOptions::default(),
        }
    }

    /// Records counters into `metrics`
    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets execution options
    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes a query and returns the sorted result set.
    ///
    /// Deterministic: same query + same items = same result order. On error
    /// nothing is returned.
    pub fn execute<T, Q>(&self, query: &Q) -> ExecutorResult<ResultSet<'a, T>>
    where
        S: ItemSource<T>,
        Q: Query<T> + ?Sized,
    {
        let label = query.unique_label();
        let scope = ObservationScope::with_fields("QUERY", &[("query", label.as_str())]);

        // Steps 1-3: enumerate, extract, tokenize
        let items = self.source.items();
        let items_scanned = items.len();
        let mut tokens: Vec<RecordToken<'a, T>> = Vec::new();
        let mut sequence: u64 = 0;

        for (id, item) in items {
            let rows = match query.results(item) {
                Ok(rows) => rows,
                Err(e) => {
                    let err = ExecutorError::query_failed(id, e);
                    if let Some(metrics) = self.metrics {
                        metrics.increment_queries_failed();
                    }
                    scope.fail(err.message());
                    return Err(err);
                }
            };

            for row in rows {
                tokens.push(RecordToken::new(row, item, id, sequence));
                sequence += 1;
            }
        }

        let rows_materialized = tokens.len();

        // Step 4: global order
        ResultSorter::sort(&mut tokens, &query.sort_keys());

        let mut result = ResultSet::new(
            label.clone(),
            tokens,
            ExecutionStats {
                items_scanned,
                rows_materialized,
                limit_applied: false,
            },
        );

        // Step 5: limit
        if let Some(limit) = self.options.limit {
            result.truncate(limit);
        }

        if let Some(metrics) = self.metrics {
            metrics.increment_queries_executed();
            metrics.add_items_scanned(items_scanned as u64);
            metrics.add_rows_materialized(rows_materialized as u64);
        }

        scope.complete_with_fields(&[
            ("items", items_scanned.to_string().as_str()),
            ("rows", result.len().to_string().as_str()),
        ]);

        Ok(result)
    }
}
