//! Document subsystem for rowquery
//!
//! Items are JSON objects; leaf queries read one top-level field each.
//! Query trees are described in JSON and built into validated queries.
//!
//! # Field extraction
//!
//! - Array: one row per element
//! - Missing or null: no rows
//! - Any other value: one row

mod descriptor;
mod model;

pub use descriptor::{DocumentQuery, QueryDescriptor};
pub use model::{field_query, to_field_value, Document};
