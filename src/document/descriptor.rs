//! Query descriptors
//!
//! A descriptor is the serializable form of a document query tree. Building
//! it runs the same validation as composing the queries by hand, so a bad
//! key map is rejected before any document is read.

use serde::{Deserialize, Serialize};

use crate::query::{GetAlternative, JoinInner, KeyMap, Merge, Query, QueryResult, SortDirection};

use super::model::{field_query, Document};

/// A boxed document query
pub type DocumentQuery = Box<dyn Query<Document>>;

/// Serializable description of a document query.
///
/// ```json
/// {"merge": {
///     "primary": {"field": {"name": "gloss", "order": "asc"}},
///     "secondary": {"field": {"name": "definition"}},
///     "key_map": {"definition": "gloss"}
/// }}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDescriptor {
    /// One top-level document field
    Field {
        name: String,
        #[serde(default)]
        order: SortDirection,
    },
    /// Per-document Cartesian product
    JoinInner(Box<QueryDescriptor>, Box<QueryDescriptor>),
    /// Primary rows followed by relabeled secondary rows
    Merge {
        primary: Box<QueryDescriptor>,
        secondary: Box<QueryDescriptor>,
        key_map: KeyMap,
    },
    /// Primary rows, or relabeled secondary rows when the primary is empty
    Alternative {
        primary: Box<QueryDescriptor>,
        secondary: Box<QueryDescriptor>,
        key_map: KeyMap,
    },
}

impl QueryDescriptor {
    /// Shorthand for a field descriptor
    pub fn field(name: impl Into<String>, order: SortDirection) -> Self {
        QueryDescriptor::Field {
            name: name.into(),
            order,
        }
    }

    /// Builds the query tree, validating every combinator bottom-up
    pub fn build(&self) -> QueryResult<DocumentQuery> {
        match self {
            QueryDescriptor::Field { name, order } => Ok(Box::new(field_query(name, *order))),
            QueryDescriptor::JoinInner(primary, secondary) => {
                let join = JoinInner::new::<Document>(primary.build()?, secondary.build()?)?;
                Ok(Box::new(join))
            }
            QueryDescriptor::Merge {
                primary,
                secondary,
                key_map,
            } => {
                let merge =
                    Merge::new::<Document>(primary.build()?, secondary.build()?, key_map.clone())?;
                Ok(Box::new(merge))
            }
            QueryDescriptor::Alternative {
                primary,
                secondary,
                key_map,
            } => {
                let alternative = GetAlternative::new::<Document>(
                    primary.build()?,
                    secondary.build()?,
                    key_map.clone(),
                )?;
                Ok(Box::new(alternative))
            }
        }
    }

    /// Number of leaf fields in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            QueryDescriptor::Field { .. } => 1,
            QueryDescriptor::JoinInner(primary, secondary)
            | QueryDescriptor::Merge {
                primary, secondary, ..
            }
            | QueryDescriptor::Alternative {
                primary, secondary, ..
            } => primary.leaf_count() + secondary.leaf_count(),
        }
    }
}
