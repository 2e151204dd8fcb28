//! Result types for query execution

use std::collections::HashMap;
use std::ops::Index;

use crate::query::{FieldValue, Row, SortKey};
use crate::repository::RepositoryId;

use super::sorter::ResultSorter;

static EMPTY: FieldValue = FieldValue::Empty;

/// One materialized row and the item it came from
#[derive(Debug)]
pub struct RecordToken<'a, T> {
    fields: Row,
    owner: &'a T,
    owner_id: RepositoryId,
    sequence: u64,
}

impl<'a, T> RecordToken<'a, T> {
    /// Creates a token
    pub fn new(fields: Row, owner: &'a T, owner_id: RepositoryId, sequence: u64) -> Self {
        Self {
            fields,
            owner,
            owner_id,
            sequence,
        }
    }

    /// Value of a field, or `FieldValue::Empty` if the row lacks it
    pub fn field(&self, label: &str) -> &FieldValue {
        self.fields.get(label).unwrap_or(&EMPTY)
    }

    /// All fields of the row
    pub fn fields(&self) -> &Row {
        &self.fields
    }

    /// The item the row was extracted from
    pub fn owner(&self) -> &'a T {
        self.owner
    }

    /// Identity of the owning item
    pub fn owner_id(&self) -> RepositoryId {
        self.owner_id
    }

    /// Creation sequence number; the final tie-break of the global order
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl<T> Clone for RecordToken<'_, T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            owner: self.owner,
            owner_id: self.owner_id,
            sequence: self.sequence,
        }
    }
}

impl<T> Index<&str> for RecordToken<'_, T> {
    type Output = FieldValue;

    fn index(&self, label: &str) -> &FieldValue {
        self.field(label)
    }
}

/// Counters gathered while materializing a result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Items enumerated
    pub items_scanned: usize,
    /// Rows produced before any limit
    pub rows_materialized: usize,
    /// Whether a limit cut the result short
    pub limit_applied: bool,
}

/// Globally sorted, indexable sequence of record tokens.
///
/// Owns its tokens; borrows the items they point at.
#[derive(Debug)]
pub struct ResultSet<'a, T> {
    query_label: String,
    tokens: Vec<RecordToken<'a, T>>,
    stats: ExecutionStats,
}

impl<'a, T> ResultSet<'a, T> {
    /// Creates a result set from tokens already in result order
    pub fn new(
        query_label: impl Into<String>,
        tokens: Vec<RecordToken<'a, T>>,
        stats: ExecutionStats,
    ) -> Self {
        Self {
            query_label: query_label.into(),
            tokens,
            stats,
        }
    }

    /// Unique label of the query that produced the set
    pub fn query_label(&self) -> &str {
        &self.query_label
    }

    /// Execution counters
    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    /// Number of tokens
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`
    pub fn at(&self, index: usize) -> Option<&RecordToken<'a, T>> {
        self.tokens.get(index)
    }

    /// Token at `index`
    pub fn get(&self, index: usize) -> Option<&RecordToken<'a, T>> {
        self.at(index)
    }

    /// Iterates tokens in result order
    pub fn iter(&self) -> std::slice::Iter<'_, RecordToken<'a, T>> {
        self.tokens.iter()
    }

    /// Index of the first token matching `predicate`
    pub fn find_first_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&RecordToken<'a, T>) -> bool,
    {
        self.tokens.iter().position(predicate)
    }

    /// Index of the first token owned by `id`
    pub fn find_first_index_by_owner(&self, id: RepositoryId) -> Option<usize> {
        self.find_first_index(|token| token.owner_id == id)
    }

    /// First token matching `predicate`
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&RecordToken<'a, T>>
    where
        P: FnMut(&RecordToken<'a, T>) -> bool,
    {
        self.tokens.iter().find(|token| predicate(token))
    }

    /// Removes every token matching `predicate`, returning how many went
    pub fn remove_all<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&RecordToken<'a, T>) -> bool,
    {
        let before = self.tokens.len();
        self.tokens.retain(|token| !predicate(token));
        before - self.tokens.len()
    }

    /// Drops tokens whose `label` field is empty while another token of the
    /// same owner remains. Every owner keeps at least one token.
    pub fn coalesce(&mut self, label: &str) -> usize {
        let mut remaining: HashMap<RepositoryId, usize> = HashMap::new();
        for token in &self.tokens {
            *remaining.entry(token.owner_id).or_insert(0) += 1;
        }

        let before = self.tokens.len();
        self.tokens.retain(|token| {
            if !token.field(label).is_empty() {
                return true;
            }
            match remaining.get_mut(&token.owner_id) {
                Some(count) if *count > 1 => {
                    *count -= 1;
                    false
                }
                _ => true,
            }
        });
        before - self.tokens.len()
    }

    /// Re-orders the tokens by new sort keys; sequence stays the final
    /// tie-break.
    pub fn resort(&mut self, sort_keys: &[SortKey]) {
        ResultSorter::sort(&mut self.tokens, sort_keys);
    }

    pub(crate) fn truncate(&mut self, limit: usize) -> bool {
        let applied = self.tokens.len() > limit;
        self.tokens.truncate(limit);
        self.stats.limit_applied = applied;
        applied
    }
}

impl<'a, T> Index<usize> for ResultSet<'a, T> {
    type Output = RecordToken<'a, T>;

    fn index(&self, index: usize) -> &RecordToken<'a, T> {
        &self.tokens[index]
    }
}

impl<'s, 'a, T> IntoIterator for &'s ResultSet<'a, T> {
    type Item = &'s RecordToken<'a, T>;
    type IntoIter = std::slice::Iter<'s, RecordToken<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<'a, T> IntoIterator for ResultSet<'a, T> {
    type Item = RecordToken<'a, T>;
    type IntoIter = std::vec::IntoIter<RecordToken<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
