//! Documents and the schema-checked document builder.

use std::sync::Arc;

use crate::document::field_value::FieldValue;
use crate::error::{PilumError, Result};
use crate::schema::Schema;

/// One `(name, value, stored)` entry of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentField {
    pub name: String,
    pub value: FieldValue,
    pub stored: bool,
}

/// An ordered sequence of field entries.
///
/// Several entries may share a field name (multi-valued fields). Documents
/// are produced by [`DocumentBuilder`], which checks every entry against the
/// schema, and are immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<DocumentField>,
}

impl Document {
    /// Create a builder for documents conforming to `schema`.
    pub fn builder(schema: Arc<Schema>) -> DocumentBuilder {
        DocumentBuilder::new(schema)
    }

    /// Reassemble a document from entries that were already checked, such as
    /// stored fields read back from a segment.
    pub(crate) fn from_fields(fields: Vec<DocumentField>) -> Self {
        Document { fields }
    }

    /// All entries in insertion order.
    pub fn fields(&self) -> &[DocumentField] {
        &self.fields
    }

    /// The first value recorded for a field.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Every value recorded for a field, in insertion order.
    pub fn get_all(&self, name: &str) -> impl Iterator<Item = &FieldValue> {
        self.fields
            .iter()
            .filter(move |field| field.name == name)
            .map(|field| &field.value)
    }

    /// Check if the document has at least one entry for a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// Distinct field names in first-seen order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !names.contains(&field.name.as_str()) {
                names.push(&field.name);
            }
        }
        names
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for Document {
    type Item = DocumentField;
    type IntoIter = std::vec::IntoIter<DocumentField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// A builder for constructing documents in a fluent manner.
///
/// The `stored` flag of each entry comes from the schema. The first schema
/// violation is remembered and reported by [`build`](Self::build), so calls
/// can be chained without intermediate error handling.
///
/// ```
/// use std::sync::Arc;
/// use pilum::document::document::Document;
/// use pilum::schema::{FieldOption, Schema};
///
/// let schema = Arc::new(
///     Schema::new()
///         .with_field("title", FieldOption::keyword().stored(true)).unwrap()
///         .with_field("price", FieldOption::numeric_point()).unwrap(),
/// );
///
/// let doc = Document::builder(schema.clone())
///     .add_keyword("title", "rust-book")
///     .add_numeric("price", 39.99)
///     .build()
///     .unwrap();
/// assert_eq!(doc.len(), 2);
///
/// let err = Document::builder(schema)
///     .add_text("price", "cheap")
///     .build();
/// assert!(err.is_err());
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    schema: Arc<Schema>,
    fields: Vec<DocumentField>,
    error: Option<PilumError>,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new(schema: Arc<Schema>) -> Self {
        DocumentBuilder {
            schema,
            fields: Vec::new(),
            error: None,
        }
    }

    /// Add a text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.add_value(name, FieldValue::Text(value.into()))
    }

    /// Add a keyword field.
    pub fn add_keyword<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.add_value(name, FieldValue::Keyword(value.into()))
    }

    /// Add a numeric point field.
    pub fn add_numeric<S: Into<String>>(self, name: S, value: f64) -> Self {
        self.add_value(name, FieldValue::Numeric(value))
    }

    /// Add a field with an explicit value.
    pub fn add_value<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        if let Err(err) = self.push(name.into(), value) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Add a field, reporting a schema violation immediately.
    pub fn try_add<S: Into<String>>(&mut self, name: S, value: FieldValue) -> Result<()> {
        self.push(name.into(), value)
    }

    fn push(&mut self, name: String, value: FieldValue) -> Result<()> {
        let stored = self.schema.validate(&name, &value)?.stored;
        self.fields.push(DocumentField {
            name,
            value,
            stored,
        });
        Ok(())
    }

    /// Build the document, failing with the first schema violation seen.
    pub fn build(self) -> Result<Document> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Document {
                fields: self.fields,
            }),
        }
    }
}
