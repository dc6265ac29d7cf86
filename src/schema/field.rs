//! Field declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a field's values are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, run through the field's analysis pipeline.
    Text,
    /// Exact-match string, indexed as a single untouched term.
    Keyword,
    /// Numeric value, indexed in an ordered point structure for range queries.
    NumericPoint,
}

impl FieldKind {
    /// Whether values of this kind produce postings in the inverted index.
    pub fn is_inverted(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Keyword)
    }

    /// Name used in configuration files and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Keyword => "keyword",
            FieldKind::NumericPoint => "numeric_point",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of a single field: its kind and whether raw values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Determines analysis vs. numeric-structure insertion.
    pub kind: FieldKind,

    /// Whether the raw value is retrievable after a query.
    #[serde(default)]
    pub stored: bool,
}

impl FieldOption {
    /// Create a new field option.
    pub fn new(kind: FieldKind, stored: bool) -> Self {
        FieldOption { kind, stored }
    }

    /// An analyzed text field.
    pub fn text() -> Self {
        Self::new(FieldKind::Text, false)
    }

    /// An exact-match keyword field.
    pub fn keyword() -> Self {
        Self::new(FieldKind::Keyword, false)
    }

    /// A numeric point field.
    pub fn numeric_point() -> Self {
        Self::new(FieldKind::NumericPoint, false)
    }

    /// Set whether the raw value is stored.
    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_option_builders() {
        let option = FieldOption::text().stored(true);
        assert_eq!(option.kind, FieldKind::Text);
        assert!(option.stored);

        let option = FieldOption::numeric_point();
        assert_eq!(option.kind, FieldKind::NumericPoint);
        assert!(!option.stored);
    }

    #[test]
    fn test_field_kind_serde() {
        let json = serde_json::to_string(&FieldKind::NumericPoint).unwrap();
        assert_eq!(json, "\"numeric_point\"");

        let option: FieldOption = serde_json::from_str(r#"{"kind": "keyword"}"#).unwrap();
        assert_eq!(option, FieldOption::keyword());
    }

    #[test]
    fn test_is_inverted() {
        assert!(FieldKind::Text.is_inverted());
        assert!(FieldKind::Keyword.is_inverted());
        assert!(!FieldKind::NumericPoint.is_inverted());
    }
}
