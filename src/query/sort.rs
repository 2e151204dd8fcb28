//! Comparators and sort keys
//!
//! A `Comparator` is injected by the caller and fully defines the direction
//! of one sort level: `Ordering::Less` means "sorts earlier". Nothing is
//! inferred from the comparator's name.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

type CompareFn = dyn Fn(&FieldValue, &FieldValue) -> Ordering + Send + Sync;

/// Total-order comparison over field values
#[derive(Clone)]
pub struct Comparator {
    name: String,
    compare: Arc<CompareFn>,
}

impl Comparator {
    /// Creates a comparator from a closure
    pub fn new<F>(name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&FieldValue, &FieldValue) -> Ordering + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            compare: Arc::new(compare),
        }
    }

    /// Natural order, smallest first
    pub fn ascending() -> Self {
        Self::new("ascending", FieldValue::natural_cmp)
    }

    /// Natural order, largest first
    pub fn descending() -> Self {
        Self::new("descending", |a: &FieldValue, b: &FieldValue| b.natural_cmp(a))
    }

    /// Returns a comparator with the opposite direction
    pub fn reverse(&self) -> Self {
        let inner = Arc::clone(&self.compare);
        Self {
            name: format!("reverse({})", self.name),
            compare: Arc::new(move |a: &FieldValue, b: &FieldValue| inner(a, b).reverse()),
        }
    }

    /// Compares two values
    pub fn compare(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        (self.compare)(a, b)
    }

    /// Comparator name, for explain output
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").field("name", &self.name).finish()
    }
}

/// Direction for the built-in natural comparators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Builds the natural comparator for this direction
    pub fn comparator(self) -> Comparator {
        match self {
            SortDirection::Asc => Comparator::ascending(),
            SortDirection::Desc => Comparator::descending(),
        }
    }
}

/// One level of a multi-key ordering: a field label and its comparator
#[derive(Debug, Clone)]
pub struct SortKey {
    /// Field label the key reads
    pub label: String,
    /// Comparator applied to the field
    pub comparator: Comparator,
}

impl SortKey {
    /// Creates a sort key
    pub fn new(label: impl Into<String>, comparator: Comparator) -> Self {
        Self {
            label: label.into(),
            comparator,
        }
    }

    /// Sort key using natural ascending order
    pub fn asc(label: impl Into<String>) -> Self {
        Self::new(label, Comparator::ascending())
    }

    /// Sort key using natural descending order
    pub fn desc(label: impl Into<String>) -> Self {
        Self::new(label, Comparator::descending())
    }
}
