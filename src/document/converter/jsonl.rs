//! JSONL format document converter.
//!
//! Each non-empty line holds one JSON object whose keys are schema fields:
//! ```jsonl
//! {"path": "docs/intro.txt", "contents": "Rust is fast", "modified": 1700000000}
//! {"path": "docs/guide.txt", "contents": ["chapter one", "chapter two"]}
//! ```
//!
//! Strings become `Text` or `Keyword` values according to the declared field
//! kind, numbers become `Numeric`, and arrays become multi-valued fields.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::document::converter::DocumentConverter;
use crate::document::document::{Document, DocumentBuilder};
use crate::document::field_value::FieldValue;
use crate::error::{PilumError, Result};
use crate::schema::{FieldKind, Schema};

/// A document converter for JSONL format.
#[derive(Debug, Clone)]
pub struct JsonlDocumentConverter {
    schema: Arc<Schema>,
}

impl JsonlDocumentConverter {
    /// Create a converter producing documents for `schema`.
    pub fn new(schema: Arc<Schema>) -> Self {
        JsonlDocumentConverter { schema }
    }

    /// Parse a single JSON line into a Document.
    pub fn parse_line(&self, line: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(line)?;

        let Value::Object(map) = value else {
            return Err(PilumError::schema_violation("expected a JSON object"));
        };

        let mut builder = DocumentBuilder::new(self.schema.clone());
        for (key, val) in map {
            match val {
                Value::Array(items) => {
                    for item in items {
                        let field_value = self.to_field_value(&key, item)?;
                        builder.try_add(key.as_str(), field_value)?;
                    }
                }
                val => {
                    let field_value = self.to_field_value(&key, val)?;
                    builder.try_add(key, field_value)?;
                }
            }
        }

        builder.build()
    }

    fn to_field_value(&self, key: &str, val: Value) -> Result<FieldValue> {
        let kind = self.schema.kind(key).ok_or_else(|| {
            PilumError::schema_violation(format!("field '{key}' is not declared in the schema"))
        })?;

        match (kind, val) {
            (FieldKind::Text, Value::String(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Keyword, Value::String(s)) => Ok(FieldValue::Keyword(s)),
            (FieldKind::NumericPoint, Value::Number(n)) => n
                .as_f64()
                .map(FieldValue::Numeric)
                .ok_or_else(|| PilumError::schema_violation(format!("field '{key}': {n}"))),
            (kind, val) => Err(PilumError::schema_violation(format!(
                "field '{key}' is declared as {kind} but got {val}"
            ))),
        }
    }
}

/// Iterator over JSONL documents.
pub struct JsonlDocumentIterator {
    reader: BufReader<File>,
    converter: JsonlDocumentConverter,
    line_number: usize,
}

impl Iterator for JsonlDocumentIterator {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let line_number = self.line_number;
                    return Some(self.converter.parse_line(line).map_err(|e| match e {
                        PilumError::SchemaViolation(msg) => {
                            PilumError::schema_violation(format!("line {line_number}: {msg}"))
                        }
                        PilumError::Json(err) => PilumError::schema_violation(format!(
                            "line {line_number}: invalid JSON: {err}"
                        )),
                        other => other,
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl DocumentConverter for JsonlDocumentConverter {
    type Iter = JsonlDocumentIterator;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let file = File::open(path.as_ref())?;

        Ok(JsonlDocumentIterator {
            reader: BufReader::new(file),
            converter: self.clone(),
            line_number: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOption;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn converter() -> JsonlDocumentConverter {
        let schema = Schema::new()
            .with_field("path", FieldOption::keyword().stored(true))
            .unwrap()
            .with_field("contents", FieldOption::text())
            .unwrap()
            .with_field("modified", FieldOption::numeric_point().stored(true))
            .unwrap();
        JsonlDocumentConverter::new(Arc::new(schema))
    }

    #[test]
    fn test_kinds_follow_schema() {
        let doc = converter()
            .parse_line(r#"{"path": "a.txt", "contents": "Hello", "modified": 12}"#)
            .unwrap();

        assert_eq!(
            doc.get_field("path"),
            Some(&FieldValue::Keyword("a.txt".into()))
        );
        assert_eq!(
            doc.get_field("contents"),
            Some(&FieldValue::Text("Hello".into()))
        );
        assert_eq!(doc.get_field("modified"), Some(&FieldValue::Numeric(12.0)));
    }

    #[test]
    fn test_arrays_become_multi_valued() {
        let doc = converter()
            .parse_line(r#"{"contents": ["one", "two"]}"#)
            .unwrap();
        assert_eq!(doc.get_all("contents").count(), 2);
    }

    #[test]
    fn test_mismatch_reports_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"path": "a.txt"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"modified": "yesterday"}}"#).unwrap();
        file.flush().unwrap();

        let results: Vec<_> = converter().convert(file.path()).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(PilumError::SchemaViolation(msg)) => assert!(msg.starts_with("line 3")),
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(converter().parse_line("[1, 2]").is_err());
        assert!(converter().parse_line(r#"{"path": true}"#).is_err());
    }
}
