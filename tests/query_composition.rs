//! Query Composition Tests
//!
//! Tests for composed queries over a repository:
//! - Leaf ordering tolerates duplicate values across items
//! - JoinInner produces per-item products, ordered primary then secondary
//! - Merge keeps every row and sorts by the first query
//! - Bad key maps are rejected before any row is produced
//! - GetAlternative falls back per item and never drops an item

use rowquery::query::{
    Comparator, FieldQuery, FieldValue, KeyMap, Query, QueryErrorCode, QueryExt, SortKey,
};
use rowquery::repository::{MemoryRepository, RepositoryId};

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Default)]
struct SimpleObject {
    field1: Vec<i64>,
    field2: Vec<i64>,
}

fn greater_than() -> Comparator {
    Comparator::new("greater_than", |x: &FieldValue, y: &FieldValue| x.natural_cmp(y))
}

fn less_than() -> Comparator {
    Comparator::new("less_than", |x: &FieldValue, y: &FieldValue| y.natural_cmp(x))
}

fn field1_query() -> FieldQuery<SimpleObject> {
    FieldQuery::new(
        "Field1Query",
        SortKey::new("Field1", greater_than()),
        |o: &SimpleObject| o.field1.iter().map(|v| FieldValue::from(*v)).collect(),
    )
}

fn field2_query() -> FieldQuery<SimpleObject> {
    FieldQuery::new(
        "Field2Query",
        SortKey::new("Field2", less_than()),
        |o: &SimpleObject| o.field2.iter().map(|v| FieldValue::from(*v)).collect(),
    )
}

struct Fixture {
    repo: MemoryRepository<SimpleObject>,
    item1: RepositoryId,
    item2: RepositoryId,
}

impl Fixture {
    fn new() -> Self {
        let mut repo = MemoryRepository::new();
        let item1 = repo.create_item().unwrap();
        let item2 = repo.create_item().unwrap();
        Self { repo, item1, item2 }
    }

    fn set(&mut self, id: RepositoryId, field1: &[i64], field2: &[i64]) {
        let item = self.repo.get_mut(id).unwrap();
        item.field1.extend_from_slice(field1);
        item.field2.extend_from_slice(field2);
    }

    fn standard() -> Self {
        let mut fixture = Self::new();
        let (item1, item2) = (fixture.item1, fixture.item2);
        fixture.set(item1, &[1, 4], &[1, 3, 6]);
        fixture.set(item2, &[3, 2], &[4, 2, 5]);
        fixture
    }
}

fn ints<Q: Query<SimpleObject>>(repo: &MemoryRepository<SimpleObject>, query: &Q, label: &str) -> Vec<i64> {
    repo.get_items_matching(query)
        .unwrap()
        .iter()
        .map(|token| token.field(label).as_int().unwrap())
        .collect()
}

// =============================================================================
// Leaf Tests
// =============================================================================

/// Duplicate values in different items sort without error.
#[test]
fn test_leaf_orders_duplicates_across_items() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[4, 2], &[]);
    fixture.set(item2, &[2, 1], &[]);

    assert_eq!(ints(&fixture.repo, &field1_query(), "Field1"), vec![1, 2, 2, 4]);
    assert_eq!(ints(&fixture.repo, &field1_query(), "Field1"), vec![1, 2, 2, 4]);
}

/// Equal values keep item enumeration order.
#[test]
fn test_leaf_duplicates_keep_item_order() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[], &[7]);
    fixture.set(item2, &[], &[7]);

    let results = fixture.repo.get_items_matching(&field2_query()).unwrap();
    assert_eq!(results.count(), 2);
    assert_eq!(results[0].owner_id(), item1);
    assert_eq!(results[1].owner_id(), item2);
}

/// An item yields one token per field value.
#[test]
fn test_item_appears_once_per_value() {
    let fixture = Fixture::standard();
    let results = fixture.repo.get_items_matching(&field2_query()).unwrap();

    let from_item1 = results
        .iter()
        .filter(|token| token.owner_id() == fixture.item1)
        .count();
    assert_eq!(from_item1, 3);
}

// =============================================================================
// JoinInner Tests
// =============================================================================

/// Row count is the sum of per-item products.
#[test]
fn test_join_inner_count_is_sum_of_products() {
    let fixture = Fixture::standard();
    let query = field1_query().join_inner(field2_query()).unwrap();

    let results = fixture.repo.get_items_matching(&query).unwrap();
    assert_eq!(results.count(), 12);
}

/// First query orders primarily, second query breaks ties.
#[test]
fn test_join_inner_sorts_primary_then_secondary() {
    let fixture = Fixture::standard();
    let query = field1_query().join_inner(field2_query()).unwrap();

    let results = fixture.repo.get_items_matching(&query).unwrap();
    let pairs: Vec<(i64, i64)> = results
        .iter()
        .take(6)
        .map(|t| {
            (
                t.field("Field1").as_int().unwrap(),
                t.field("Field2").as_int().unwrap(),
            )
        })
        .collect();

    assert_eq!(pairs, vec![(1, 6), (1, 3), (1, 1), (2, 5), (2, 4), (2, 2)]);
}

/// An item missing one side contributes nothing.
#[test]
fn test_join_inner_has_no_outer_rows() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[1, 2], &[]);
    fixture.set(item2, &[3], &[5]);

    let query = field1_query().join_inner(field2_query()).unwrap();
    let results = fixture.repo.get_items_matching(&query).unwrap();

    assert_eq!(results.count(), 1);
    assert_eq!(results[0].owner_id(), item2);
}

/// Joining a query with itself shares labels and is rejected.
#[test]
fn test_join_inner_rejects_shared_labels() {
    let err = field1_query().join_inner(field1_query()).unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::RowqQueryConfigInvalid);
}

// =============================================================================
// Merge Tests
// =============================================================================

/// Merged count is rows(A) + rows(B).
#[test]
fn test_merge_count_is_sum() {
    let fixture = Fixture::standard();
    let query = field1_query()
        .merge(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();

    let results = fixture.repo.get_items_matching(&query).unwrap();
    assert_eq!(results.count(), 10);
}

/// The first query's comparator orders remapped rows too.
#[test]
fn test_merge_sort_of_first_query_wins() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[1, 4], &[1, 9, 6]);
    fixture.set(item2, &[3, 7], &[4, 2, 5]);

    let query = field2_query()
        .merge(field1_query(), KeyMap::from([("Field1", "Field2")]))
        .unwrap();

    assert_eq!(
        ints(&fixture.repo, &query, "Field2"),
        vec![9, 7, 6, 5, 4, 4, 3, 2, 1, 1]
    );
}

/// A key naming no field of the second query is a configuration error.
#[test]
fn test_merge_bogus_key_rejected() {
    let err = field1_query()
        .merge(field2_query(), KeyMap::from([("bogus", "Field1")]))
        .unwrap_err();

    assert!(err.is_config_error());
    assert!(err.query().unwrap().starts_with("Merge("));
}

/// A value naming no field of the first query is a configuration error.
#[test]
fn test_merge_bogus_value_rejected() {
    let err = field1_query()
        .merge(field2_query(), KeyMap::from([("Field2", "bogus")]))
        .unwrap_err();

    assert_eq!(err.code(), QueryErrorCode::RowqQueryConfigInvalid);
}

// =============================================================================
// GetAlternative Tests
// =============================================================================

/// Empty primary falls back to the alternate field.
#[test]
fn test_alternative_nothing_in_field_returns_alternate() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[], &[1]);
    fixture.set(item2, &[], &[4]);

    let query = field1_query()
        .get_alternative(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();

    assert_eq!(ints(&fixture.repo, &query, "Field1"), vec![1, 4]);
}

/// Fallback rows interleave with primary rows under the first query's order.
#[test]
fn test_alternative_sorts_according_to_first_query() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[1, 3], &[]);
    fixture.set(item2, &[], &[2]);

    let query = field1_query()
        .get_alternative(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();

    assert_eq!(ints(&fixture.repo, &query, "Field1"), vec![1, 2, 3]);
}

/// A populated primary ignores the alternate for that item.
#[test]
fn test_alternative_first_field_not_empty_returns_its_values() {
    let mut fixture = Fixture::new();
    let (item1, item2) = (fixture.item1, fixture.item2);
    fixture.set(item1, &[1], &[9]);
    fixture.set(item2, &[3], &[4]);

    let query = field1_query()
        .get_alternative(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();

    assert_eq!(ints(&fixture.repo, &query, "Field1"), vec![1, 3]);
}

/// Both sides empty still yields one empty row per item.
#[test]
fn test_alternative_both_empty_returns_unpopulated_rows() {
    let fixture = Fixture::new();

    let query = field1_query()
        .get_alternative(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();
    let results = fixture.repo.get_items_matching(&query).unwrap();

    assert_eq!(results.count(), 2);
    assert_eq!(results[0].field("Field1"), "");
    assert_eq!(results[1].field("Field1"), "");
    assert!(results[0].fields().contains("Field1"));
}

/// A primary that cannot detect emptiness is refused up front.
#[test]
fn test_alternative_requires_unpopulated_check() {
    let err = field1_query()
        .without_unpopulated_check()
        .get_alternative(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap_err();

    assert_eq!(err.code(), QueryErrorCode::RowqQueryUnsupported);
}

// =============================================================================
// Nested Composition Tests
// =============================================================================

/// Combinators nest; boxed queries compose like concrete ones.
#[test]
fn test_nested_merge_inside_join() {
    let fixture = Fixture::standard();

    let field3 = FieldQuery::new(
        "Field3Query",
        SortKey::asc("Field3"),
        |o: &SimpleObject| vec![FieldValue::from(o.field1.len())],
    );
    let query = field1_query()
        .boxed()
        .join_inner(field3.boxed())
        .unwrap()
        .merge(field2_query(), KeyMap::from([("Field2", "Field1")]))
        .unwrap();

    let results = fixture.repo.get_items_matching(&query).unwrap();
    assert_eq!(results.count(), 4 + 6);
    assert_eq!(results[0].field("Field1"), &FieldValue::Int(1));
}
