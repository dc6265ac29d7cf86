//! Schema definitions.
//!
//! A [`Schema`] maps each field name to a [`FieldOption`]: the field's
//! [`FieldKind`] and whether its raw value is stored for retrieval.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use field::{FieldKind, FieldOption};
pub use schema::Schema;
