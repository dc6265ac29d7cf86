//! Field value types for documents.
//!
//! A [`FieldValue`] carries the tag that must agree with the schema's
//! [`FieldKind`](crate::schema::FieldKind) declaration for its field.
//!
//! ```
//! use pilum::document::field_value::FieldValue;
//! use pilum::schema::FieldKind;
//!
//! let price = FieldValue::Numeric(39.99);
//! assert_eq!(price.kind(), FieldKind::NumericPoint);
//! assert_eq!(price.as_numeric(), Some(39.99));
//! assert_eq!(price.as_text(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::FieldKind;

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free text, analyzed at index time
    Text(String),
    /// Exact-match string, indexed verbatim
    Keyword(String),
    /// Numeric point value
    Numeric(f64),
}

impl FieldValue {
    /// The field kind this value is compatible with.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Keyword(_) => FieldKind::Keyword,
            FieldValue::Numeric(_) => FieldKind::NumericPoint,
        }
    }

    /// Get the text value, if this is a Text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the keyword value, if this is a Keyword value.
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            FieldValue::Keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Get the string content of either a Text or a Keyword value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Keyword(s) => Some(s),
            FieldValue::Numeric(_) => None,
        }
    }

    /// Get the numeric value, if this is a Numeric value.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FieldValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::Keyword(s) => f.write_str(s),
            FieldValue::Numeric(n) => write!(f, "{n}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Numeric(value)
    }
}
