//! JSON documents as query items

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::{FieldQuery, FieldValue, SortDirection, SortKey};

/// A JSON object stored as one repository item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    body: Value,
}

impl Document {
    /// Wraps a JSON value
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The document body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Raw JSON value of a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Values of a field, one per row.
    ///
    /// Arrays yield one value per element; missing and null fields yield
    /// nothing; any other value yields itself.
    pub fn values(&self, field: &str) -> Vec<FieldValue> {
        match self.body.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(elements)) => elements.iter().map(to_field_value).collect(),
            Some(other) => vec![to_field_value(other)],
        }
    }

    /// True if the field has no non-empty value
    pub fn is_unpopulated(&self, field: &str) -> bool {
        match self.body.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(elements)) => elements.iter().all(|v| match v {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            }),
            Some(_) => false,
        }
    }
}

/// Converts a JSON value to a field value
pub fn to_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Empty,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => FieldValue::Text(value.to_string()),
    }
}

/// Leaf query over one top-level document field
pub fn field_query(name: &str, order: SortDirection) -> FieldQuery<Document> {
    let label = format!("Field({},{})", name, order.as_str());
    let extract_name = name.to_string();
    let check_name = name.to_string();

    FieldQuery::new(label, SortKey::new(name, order.comparator()), move |doc: &Document| {
        doc.values(&extract_name)
    })
    .with_unpopulated_check(move |doc: &Document| doc.is_unpopulated(&check_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use serde_json::json;

    #[test]
    fn test_array_field_yields_one_value_per_element() {
        let doc = Document::new(json!({"gloss": ["dog", "hound"]}));
        assert_eq!(
            doc.values("gloss"),
            vec![FieldValue::from("dog"), FieldValue::from("hound")]
        );
    }

    #[test]
    fn test_scalar_and_missing_fields() {
        let doc = Document::new(json!({"rank": 3, "note": null}));
        assert_eq!(doc.values("rank"), vec![FieldValue::Int(3)]);
        assert!(doc.values("note").is_empty());
        assert!(doc.values("absent").is_empty());
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(to_field_value(&json!(2.5)), FieldValue::Float(2.5));
        assert_eq!(to_field_value(&json!(-4)), FieldValue::Int(-4));
        assert_eq!(to_field_value(&json!({"a": 1})), FieldValue::from("{\"a\":1}"));
    }

    #[test]
    fn test_unpopulated() {
        assert!(Document::new(json!({})).is_unpopulated("gloss"));
        assert!(Document::new(json!({"gloss": []})).is_unpopulated("gloss"));
        assert!(Document::new(json!({"gloss": ["", null]})).is_unpopulated("gloss"));
        assert!(!Document::new(json!({"gloss": ["dog"]})).is_unpopulated("gloss"));
        assert!(!Document::new(json!({"gloss": 0})).is_unpopulated("gloss"));
    }

    #[test]
    fn test_field_query_label_and_rows() {
        let query = field_query("gloss", SortDirection::Desc);
        assert_eq!(query.unique_label(), "Field(gloss,desc)");

        let doc = Document::new(json!({"gloss": ["dog", "hound"]}));
        assert_eq!(query.results(&doc).unwrap().len(), 2);
        assert!(!query.would_produce_unpopulated_row(&doc).unwrap());
    }
}
