//! Inner join of two queries over the same item

use super::errors::{QueryError, QueryResult};
use super::query::Query;
use super::sort::SortKey;
use super::value::Row;

/// Per-item Cartesian product of two queries.
///
/// For an item where `A` yields m rows and `B` yields n rows, the join yields
/// m×n rows, each the union of one `A` row and one `B` row. If either side
/// yields nothing, the item yields nothing.
#[derive(Debug, Clone)]
pub struct JoinInner<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> JoinInner<A, B> {
    /// Creates the join, rejecting overlapping field labels.
    pub fn new<T>(primary: A, secondary: B) -> QueryResult<Self>
    where
        A: Query<T>,
        B: Query<T>,
    {
        let primary_labels = primary.field_labels();
        let clashes: Vec<String> = secondary
            .field_labels()
            .into_iter()
            .filter(|label| primary_labels.contains(label))
            .collect();

        if !clashes.is_empty() {
            return Err(QueryError::config_invalid(format!(
                "joined queries both declare field(s) {}",
                clashes.join(", ")
            ))
            .for_query(format!(
                "JoinInner({},{})",
                primary.unique_label(),
                secondary.unique_label()
            )));
        }

        Ok(Self { primary, secondary })
    }

    /// The query that orders primarily
    pub fn primary(&self) -> &A {
        &self.primary
    }

    /// The query that breaks ties within the primary order
    pub fn secondary(&self) -> &B {
        &self.secondary
    }
}

impl<T, A, B> Query<T> for JoinInner<A, B>
where
    A: Query<T>,
    B: Query<T>,
{
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        let left = self.primary.results(item)?;
        if left.is_empty() {
            return Ok(Vec::new());
        }
        let right = self.secondary.results(item)?;

        let mut rows = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                rows.push(a.clone().union(b));
            }
        }
        Ok(rows)
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        let mut keys = self.primary.sort_keys();
        keys.extend(self.secondary.sort_keys());
        keys
    }

    fn unique_label(&self) -> String {
        format!(
            "JoinInner({},{})",
            self.primary.unique_label(),
            self.secondary.unique_label()
        )
    }

    fn field_labels(&self) -> Vec<String> {
        let mut labels = self.primary.field_labels();
        labels.extend(self.secondary.field_labels());
        labels
    }

    fn supports_unpopulated_check(&self) -> bool {
        self.primary.supports_unpopulated_check() && self.secondary.supports_unpopulated_check()
    }

    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        Ok(self.primary.would_produce_unpopulated_row(item)?
            || self.secondary.would_produce_unpopulated_row(item)?)
    }
}
