//! Document module.
//!
//! # Core Components
//!
//! - [`document::Document`] - Ordered field entries, possibly multi-valued
//! - [`document::DocumentBuilder`] - Builds documents checked against a [`Schema`](crate::schema::Schema)
//! - [`field_value::FieldValue`] - Tagged value: text, keyword or numeric
//! - [`converter`] - Converts JSONL files into documents

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

pub use document::{Document, DocumentBuilder, DocumentField};
pub use field_value::FieldValue;
