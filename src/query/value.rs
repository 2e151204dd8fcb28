//! Field values and rows
//!
//! A row is a label → value map produced by a query for one item. Values are
//! a small tagged union so that rows from different queries can be compared
//! once labels have been aligned.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A single extracted field value
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicitly empty (no value)
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl FieldValue {
    /// Returns true if the value carries no content.
    ///
    /// Empty text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the integer value if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value if this is a `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Natural total order over field values.
    ///
    /// Ordering rules:
    /// - empty < bool < number < text
    /// - ints and floats compare exactly by numeric value; an int sorts
    ///   before a float of the same value
    /// - NaN sorts after every other number
    pub fn natural_cmp(&self, other: &FieldValue) -> Ordering {
        let type_order = |v: &FieldValue| -> u8 {
            match v {
                FieldValue::Empty => 0,
                FieldValue::Bool(_) => 1,
                FieldValue::Int(_) | FieldValue::Float(_) => 2,
                FieldValue::Text(_) => 3,
            }
        };

        let a_type = type_order(self);
        let b_type = type_order(other);
        if a_type != b_type {
            return a_type.cmp(&b_type);
        }

        match (self, other) {
            (FieldValue::Empty, FieldValue::Empty) => Ordering::Equal,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => compare_int_float(*a, *b),
            (FieldValue::Float(a), FieldValue::Int(b)) => compare_int_float(*b, *a).reverse(),
            (FieldValue::Float(a), FieldValue::Float(b)) => compare_floats(*a, *b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

// 2^63; every float at or above it exceeds i64::MAX
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

// Exact: `a as f64` would round above 2^53 and break transitivity.
fn compare_int_float(a: i64, b: f64) -> Ordering {
    if b.is_nan() || b >= I64_BOUND {
        return Ordering::Less;
    }
    if b < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => {
            let fraction = b - whole;
            if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        other => other,
    }
}

// Empty serializes as "" so callers see an explicit empty value rather than null.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_str(""),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl PartialEq<i64> for FieldValue {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, FieldValue::Int(n) if n == other)
    }
}

impl PartialEq<str> for FieldValue {
    fn eq(&self, other: &str) -> bool {
        match self {
            FieldValue::Text(s) => s == other,
            FieldValue::Empty => other.is_empty(),
            _ => false,
        }
    }
}

/// One row: label → value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(label, value);
        self
    }

    /// Creates a row with the given labels all set to `FieldValue::Empty`
    pub fn unpopulated<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = labels
            .into_iter()
            .map(|label| (label.into(), FieldValue::Empty))
            .collect();
        Self { fields }
    }

    /// Inserts or replaces a field, returning the previous value
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(label.into(), value.into())
    }

    /// Looks up a field by label
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields.get(label)
    }

    /// Removes a field by label
    pub fn remove(&mut self, label: &str) -> Option<FieldValue> {
        self.fields.remove(label)
    }

    /// Returns true if the row has a field with this label
    pub fn contains(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    /// Iterates labels in sorted order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates (label, value) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if every field is empty (or there are none)
    pub fn is_unpopulated(&self) -> bool {
        self.fields.values().all(FieldValue::is_empty)
    }

    /// Union of two rows. Fields of `other` replace equal labels in `self`.
    pub fn union(mut self, other: &Row) -> Row {
        for (label, value) in &other.fields {
            self.fields.insert(label.clone(), value.clone());
        }
        self
    }
}

impl FromIterator<(String, FieldValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
