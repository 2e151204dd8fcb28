//! Result sorting for query execution
//!
//! Sorts record tokens by a chain of sort keys, deterministically.

use std::cmp::Ordering;

use crate::query::SortKey;

use super::result::RecordToken;

/// Sorts record tokens
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts tokens according to `sort_keys`.
    ///
    /// Keys are applied in priority order. Tokens equal on every key keep
    /// their creation order (sequence), so duplicates never make the order
    /// ambiguous.
    pub fn sort<T>(tokens: &mut [RecordToken<'_, T>], sort_keys: &[SortKey]) {
        tokens.sort_by(|a, b| Self::compare(a, b, sort_keys));
    }

    /// Compares two tokens under `sort_keys`, falling back to sequence.
    pub fn compare<T>(a: &RecordToken<'_, T>, b: &RecordToken<'_, T>, sort_keys: &[SortKey]) -> Ordering {
        for key in sort_keys {
            let ordering = key
                .comparator
                .compare(a.field(&key.label), b.field(&key.label));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.sequence().cmp(&b.sequence())
    }
}
