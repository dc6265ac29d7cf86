//! Schema management for document structure definition.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::error::{PilumError, Result};
use crate::schema::field::{FieldKind, FieldOption};

/// A schema declares, per field name, the field's kind and whether it is stored.
///
/// Schemas serialize to a plain JSON object:
///
/// ```
/// use pilum::schema::{FieldKind, Schema};
///
/// let schema = Schema::from_json_str(r#"{
///     "title":   { "kind": "keyword" },
///     "content": { "kind": "text", "stored": true },
///     "price":   { "kind": "numeric_point", "stored": true }
/// }"#).unwrap();
///
/// assert_eq!(schema.kind("price"), Some(FieldKind::NumericPoint));
/// assert!(schema.is_stored("content"));
/// assert!(!schema.is_stored("title"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldOption>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Schema {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the schema.
    pub fn add_field<S: Into<String>>(&mut self, name: S, option: FieldOption) -> Result<()> {
        let name = name.into();

        if name.is_empty() {
            return Err(PilumError::schema("Field name cannot be empty"));
        }

        if self.fields.contains_key(&name) {
            return Err(PilumError::schema(format!("Field '{name}' already exists")));
        }

        self.fields.insert(name, option);
        Ok(())
    }

    /// Builder-style variant of [`add_field`](Self::add_field).
    pub fn with_field<S: Into<String>>(mut self, name: S, option: FieldOption) -> Result<Self> {
        self.add_field(name, option)?;
        Ok(self)
    }

    /// Get the declaration for a field.
    pub fn get(&self, name: &str) -> Option<&FieldOption> {
        self.fields.get(name)
    }

    /// Get the kind of a field.
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).map(|option| option.kind)
    }

    /// Whether a field's raw values are stored.
    pub fn is_stored(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|option| option.stored)
    }

    /// Check if the schema declares a field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|name| name.as_str())
    }

    /// Iterate over all declarations.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldOption)> {
        self.fields.iter().map(|(name, option)| (name.as_str(), option))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check a value against the declaration for `name`.
    ///
    /// Fails with `SchemaViolation` if the field is undeclared, if the value's
    /// tag disagrees with the declared kind, or if a numeric value is NaN.
    pub fn validate(&self, name: &str, value: &FieldValue) -> Result<&FieldOption> {
        let option = self.fields.get(name).ok_or_else(|| {
            PilumError::schema_violation(format!("field '{name}' is not declared in the schema"))
        })?;

        if value.kind() != option.kind {
            return Err(PilumError::schema_violation(format!(
                "field '{name}' is declared as {} but got a {} value",
                option.kind,
                value.kind()
            )));
        }

        if let FieldValue::Numeric(number) = value {
            if number.is_nan() {
                return Err(PilumError::schema_violation(format!(
                    "field '{name}' cannot index NaN"
                )));
            }
        }

        Ok(option)
    }

    /// Parse a schema from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    /// Load a schema from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the schema to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check(&self) -> Result<()> {
        if self.fields.keys().any(|name| name.is_empty()) {
            return Err(PilumError::schema("Field name cannot be empty"));
        }
        Ok(())
    }
}
