//! Per-item fallback between two queries

use super::errors::{QueryError, QueryResult};
use super::merge::{composite_label, KeyMap};
use super::query::Query;
use super::sort::SortKey;
use super::value::Row;

/// Primary rows where the primary query is populated for an item, otherwise
/// the secondary query's rows relabeled through the key map.
///
/// The choice is made per item. An item for which neither query has content
/// still yields exactly one row, with every primary field present and empty.
#[derive(Debug, Clone)]
pub struct GetAlternative<A, B> {
    primary: A,
    secondary: B,
    key_map: KeyMap,
}

impl<A, B> GetAlternative<A, B> {
    /// Creates the fallback query.
    ///
    /// Fails if `key_map` does not line up with the two queries, or if the
    /// primary query cannot tell whether it is populated.
    pub fn new<T>(primary: A, secondary: B, key_map: KeyMap) -> QueryResult<Self>
    where
        A: Query<T>,
        B: Query<T>,
    {
        let label = composite_label(
            "GetAlternative",
            &primary.unique_label(),
            &secondary.unique_label(),
            &key_map,
        );

        key_map
            .validate(&primary.field_labels(), &secondary.field_labels())
            .map_err(|e| e.for_query(label.clone()))?;

        if !primary.supports_unpopulated_check() {
            return Err(QueryError::unsupported(format!(
                "primary query '{}' cannot detect unpopulated rows",
                primary.unique_label()
            ))
            .for_query(label));
        }

        Ok(Self {
            primary,
            secondary,
            key_map,
        })
    }

    /// The key map in use
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }
}

impl<T, A, B> Query<T> for GetAlternative<A, B>
where
    A: Query<T>,
    B: Query<T>,
{
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        if !self.primary.would_produce_unpopulated_row(item)? {
            return self.primary.results(item);
        }

        let fallback = self.secondary.results(item)?;
        if fallback.iter().all(Row::is_unpopulated) {
            return Ok(vec![Row::unpopulated(self.primary.field_labels())]);
        }

        let keys = self.primary.sort_keys();
        Ok(fallback
            .into_iter()
            .map(|row| self.key_map.remap(row, &keys))
            .collect())
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        self.primary.sort_keys()
    }

    fn unique_label(&self) -> String {
        composite_label(
            "GetAlternative",
            &self.primary.unique_label(),
            &self.secondary.unique_label(),
            &self.key_map,
        )
    }

    fn field_labels(&self) -> Vec<String> {
        self.primary.field_labels()
    }

    fn supports_unpopulated_check(&self) -> bool {
        self.primary.supports_unpopulated_check() && self.secondary.supports_unpopulated_check()
    }

    fn would_produce_unpopulated_row(&self, item: &T) -> QueryResult<bool> {
        Ok(self.primary.would_produce_unpopulated_row(item)?
            && self.secondary.would_produce_unpopulated_row(item)?)
    }
}
