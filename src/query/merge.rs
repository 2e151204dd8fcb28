//! Set-merge of two queries with label remapping

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};
use super::query::Query;
use super::sort::SortKey;
use super::value::{FieldValue, Row};

/// Maps a secondary query's field labels onto the primary query's labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    entries: BTreeMap<String, String>,
}

impl KeyMap {
    /// Creates an empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry: present secondary label `from` as primary label `to`
    pub fn map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.insert(from.into(), to.into());
        self
    }

    /// Target label for a secondary label
    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(String::as_str)
    }

    /// Iterates (secondary label, primary label) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every key is a secondary field and every value a primary
    /// field.
    pub(crate) fn validate(
        &self,
        primary_fields: &[String],
        secondary_fields: &[String],
    ) -> QueryResult<()> {
        for (from, to) in self.iter() {
            if !secondary_fields.iter().any(|f| f == from) {
                return Err(QueryError::config_invalid(format!(
                    "key map source '{}' is not a field of the secondary query (fields: {})",
                    from,
                    secondary_fields.join(", ")
                )));
            }
            if !primary_fields.iter().any(|f| f == to) {
                return Err(QueryError::config_invalid(format!(
                    "key map target '{}' is not a field of the primary query (fields: {})",
                    to,
                    primary_fields.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Relabels a secondary row into the primary query's label space.
    ///
    /// Unmapped labels pass through. Mapped values win over a passthrough
    /// label with the same name. Any primary sort label still missing is
    /// added as an empty value.
    pub(crate) fn remap(&self, row: Row, primary_keys: &[SortKey]) -> Row {
        let mut mapped = Vec::new();
        let mut out = Row::new();
        for (label, value) in row {
            match self.entries.get(&label) {
                Some(target) => mapped.push((target.clone(), value)),
                None => {
                    out.insert(label, value);
                }
            }
        }
        for (label, value) in mapped {
            out.insert(label, value);
        }
        for key in primary_keys {
            if !out.contains(&key.label) {
                out.insert(key.label.clone(), FieldValue::Empty);
            }
        }
        out
    }

    fn describe(&self) -> String {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}->{}", k, v)).collect();
        format!("{{{}}}", pairs.join(","))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for KeyMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

pub(crate) fn composite_label(kind: &str, primary: &str, secondary: &str, key_map: &KeyMap) -> String {
    format!("{}({},{},{})", kind, primary, secondary, key_map.describe())
}

/// Union of a primary query's rows with a secondary query's relabeled rows.
///
/// Rows are not deduplicated: an item yields rows(A) + rows(B). Ordering uses
/// the primary query's sort keys only.
#[derive(Debug, Clone)]
pub struct Merge<A, B> {
    primary: A,
    secondary: B,
    key_map: KeyMap,
}

impl<A, B> Merge<A, B> {
    /// Creates the merge, validating `key_map` against both queries.
    pub fn new<T>(primary: A, secondary: B, key_map: KeyMap) -> QueryResult<Self>
    where
        A: Query<T>,
        B: Query<T>,
    {
        key_map
            .validate(&primary.field_labels(), &secondary.field_labels())
            .map_err(|e| {
                e.for_query(composite_label(
                    "Merge",
                    &primary.unique_label(),
                    &secondary.unique_label(),
                    &key_map,
                ))
            })?;

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

impl<T, A, B> Query<T> for Merge<A, B>
where
    A: Query<T>,
    B: Query<T>,
{
    fn results(&self, item: &T) -> QueryResult<Vec<Row>> {
        let mut rows = self.primary.results(item)?;
        let secondary = self.secondary.results(item)?;
        if !secondary.is_empty() {
            let keys = self.primary.sort_keys();
            rows.extend(secondary.into_iter().map(|row| self.key_map.remap(row, &keys)));
        }
        Ok(rows)
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        self.primary.sort_keys()
    }

    fn unique_label(&self) -> String {
        composite_label(
            "Merge",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FieldQuery, QueryErrorCode, QueryExt};

    struct Names {
        given: Vec<&'static str>,
        nick: Vec<&'static str>,
    }

    fn given() -> FieldQuery<Names> {
        FieldQuery::new("Given", SortKey::asc("given"), |n: &Names| {
            n.given.iter().map(|s| (*s).into()).collect()
        })
    }

    fn nick() -> FieldQuery<Names> {
        FieldQuery::new("Nick", SortKey::asc("nick"), |n: &Names| {
            n.nick.iter().map(|s| (*s).into()).collect()
        })
    }

    #[test]
    fn test_rows_are_summed_and_remapped() {
        let merge = given().merge(nick(), KeyMap::from([("nick", "given")])).unwrap();
        let item = Names {
            given: vec!["Robert"],
            nick: vec!["Bob", "Rob"],
        };
        let rows = merge.results(&item).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.contains("given") && !r.contains("nick")));
        assert_eq!(rows[2].get("given"), Some(&FieldValue::from("Rob")));
    }

    #[test]
    fn test_bogus_key_rejected() {
        let err = given()
            .merge(nick(), KeyMap::from([("bogus", "given")]))
            .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::RowqQueryConfigInvalid);
        assert!(err.message().contains("bogus"));
    }

    #[test]
    fn test_bogus_value_rejected() {
        let err = given()
            .merge(nick(), KeyMap::from([("nick", "bogus")]))
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.query().unwrap().starts_with("Merge(Given,Nick"));
    }

    #[test]
    fn test_sort_keys_are_primary_only() {
        let merge = given().merge(nick(), KeyMap::from([("nick", "given")])).unwrap();
        let keys = merge.sort_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].label, "given");
    }

    #[test]
    fn test_unpopulated_is_and() {
        let merge = given().merge(nick(), KeyMap::from([("nick", "given")])).unwrap();
        let only_nick = Names {
            given: vec![],
            nick: vec!["Bob"],
        };
        let nothing = Names {
            given: vec![],
            nick: vec![],
        };
        assert!(!merge.would_produce_unpopulated_row(&only_nick).unwrap());
        assert!(merge.would_produce_unpopulated_row(&nothing).unwrap());
    }

    #[test]
    fn test_remap_fills_missing_sort_label() {
        let keys = vec![SortKey::asc("given"), SortKey::asc("rank")];
        let row = Row::new().with("nick", "Bob");
        let remapped = KeyMap::from([("nick", "given")]).remap(row, &keys);
        assert_eq!(remapped.get("given"), Some(&FieldValue::from("Bob")));
        assert_eq!(remapped.get("rank"), Some(&FieldValue::Empty));
    }

    #[test]
    fn test_key_map_deserialize() {
        let map: KeyMap = serde_json::from_str(r#"{"Field2": "Field1"}"#).unwrap();
        assert_eq!(map.get("Field2"), Some("Field1"));
        assert_eq!(map.len(), 1);
    }
}
