//! In-memory keyed repository
//!
//! Items are enumerated in creation order, which fixes the sequence numbers
//! the executor hands out and therefore the tie-break order of equal rows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::executor::{ExecutionOptions, ExecutorResult, ItemSource, QueryExecutor, ResultSet};
use crate::query::Query;

use super::errors::{RepositoryError, RepositoryResult};

/// Opaque item identity, stable for the lifetime of the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(u64);

impl RepositoryId {
    /// Wraps a raw id
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Keyed in-memory store of items
#[derive(Debug)]
pub struct MemoryRepository<T> {
    items: BTreeMap<RepositoryId, T>,
    next_id: u64,
    max_items: Option<usize>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryRepository<T> {
    /// Creates an empty, unbounded repository
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 0,
            max_items: None,
        }
    }

    /// Creates an empty repository that holds at most `max_items`
    pub fn with_max_items(max_items: usize) -> Self {
        Self {
            max_items: Some(max_items),
            ..Self::new()
        }
    }

    /// Stores an item and returns its identity
    pub fn insert(&mut self, item: T) -> RepositoryResult<RepositoryId> {
        if let Some(max) = self.max_items {
            if self.items.len() >= max {
                return Err(RepositoryError::CapacityExceeded(self.items.len(), max));
            }
        }
        let id = RepositoryId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        Ok(id)
    }

    /// Creates a default item and returns its identity
    pub fn create_item(&mut self) -> RepositoryResult<RepositoryId>
    where
        T: Default,
    {
        self.insert(T::default())
    }

    /// Looks up an item
    pub fn get(&self, id: RepositoryId) -> Option<&T> {
        self.items.get(&id)
    }

    /// Looks up an item for modification
    pub fn get_mut(&mut self, id: RepositoryId) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    /// Removes an item, returning it
    pub fn delete_item(&mut self, id: RepositoryId) -> RepositoryResult<T> {
        self.items
            .remove(&id)
            .ok_or(RepositoryError::ItemNotFound(id))
    }

    /// Number of stored items
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identities in enumeration order
    pub fn ids(&self) -> Vec<RepositoryId> {
        self.items.keys().copied().collect()
    }

    /// Applies `query` to every item and returns the globally sorted rows
    pub fn get_items_matching<Q>(&self, query: &Q) -> ExecutorResult<ResultSet<'_, T>>
    where
        Q: Query<T> + ?Sized,
    {
        QueryExecutor::new(self).execute(query)
    }

    /// Same as `get_items_matching`, with execution options
    pub fn get_items_matching_with<Q>(
        &self,
        query: &Q,
        options: ExecutionOptions,
    ) -> ExecutorResult<ResultSet<'_, T>>
    where
        Q: Query<T> + ?Sized,
    {
        QueryExecutor::new(self).with_options(options).execute(query)
    }
}

impl<T> ItemSource<T> for MemoryRepository<T> {
    fn items(&self) -> Vec<(RepositoryId, &T)> {
        self.items.iter().map(|(id, item)| (*id, item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_creation_order() {
        let mut repo: MemoryRepository<Vec<i64>> = MemoryRepository::new();
        let a = repo.create_item().unwrap();
        let b = repo.insert(vec![1]).unwrap();
        let c = repo.create_item().unwrap();

        assert!(a < b && b < c);
        assert_eq!(repo.ids(), vec![a, b, c]);
        assert_eq!(repo.count(), 3);
    }

    #[test]
    fn test_delete_item() {
        let mut repo = MemoryRepository::new();
        let id = repo.insert("entry").unwrap();

        assert_eq!(repo.delete_item(id), Ok("entry"));
        assert!(repo.is_empty());
        assert_eq!(
            repo.delete_item(id),
            Err(RepositoryError::ItemNotFound(id))
        );
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut repo = MemoryRepository::new();
        let first = repo.insert(1).unwrap();
        repo.delete_item(first).unwrap();
        let second = repo.insert(2).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_get_mut() {
        let mut repo: MemoryRepository<Vec<i64>> = MemoryRepository::new();
        let id = repo.create_item().unwrap();
        repo.get_mut(id).unwrap().push(5);
        assert_eq!(repo.get(id), Some(&vec![5]));
    }

    #[test]
    fn test_capacity_limit() {
        let mut repo = MemoryRepository::with_max_items(1);
        repo.insert(1).unwrap();
        assert_eq!(
            repo.insert(2),
            Err(RepositoryError::CapacityExceeded(1, 1))
        );
    }
}
