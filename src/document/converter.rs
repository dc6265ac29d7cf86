//! Turning files of records into documents.

use std::path::Path;

use crate::document::document::Document;
use crate::error::Result;

pub mod jsonl;

/// Reads a file lazily as a sequence of schema-checked documents.
///
/// A bad record yields an `Err` item without ending the iteration, so callers
/// can skip it and keep going.
pub trait DocumentConverter {
    type Iter: Iterator<Item = Result<Document>>;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}
