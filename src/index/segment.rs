//! Immutable segments and their binary format.
//!
//! Each commit produces one segment holding the documents buffered since the
//! previous commit. The encoded layout is:
//!
//! ```text
//! "PSEG" | version u32
//! doc ids            (count + delta varints)
//! inverted index     (fields -> terms -> postings)
//! numeric points     (fields -> (f64 value, doc id) sorted by value)
//! stored fields      (per doc: count, then name + tag + payload)
//! crc32 trailer
//! ```
//!
//! Stored values carry a one-byte tag: 0 = text, 1 = keyword, 2 = numeric.

use std::io::{Read, Write};

use ahash::AHashMap;

use crate::document::{DocumentField, FieldValue};
use crate::error::Result;
use crate::index::point_tree::{NumericEntry, NumericPointTree};
use crate::index::posting::{InvertedIndex, PostingList};
use crate::storage::StorageError;
use crate::storage::structured::{StructReader, StructWriter};

const SEGMENT_MAGIC: &[u8; 4] = b"PSEG";
const SEGMENT_VERSION: u32 = 1;

const TAG_TEXT: u8 = 0;
const TAG_KEYWORD: u8 = 1;
const TAG_NUMERIC: u8 = 2;

/// A document after analysis, ready to be buffered by the writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzedDocument {
    /// `(field, term, frequency)` with one entry per distinct term.
    pub terms: Vec<(String, String, u32)>,
    /// `(field, value)` for every numeric point.
    pub numerics: Vec<(String, f64)>,
    /// Entries whose raw value is retained for retrieval.
    pub stored: Vec<DocumentField>,
}

impl AnalyzedDocument {
    /// Number of term occurrences across all fields.
    pub fn token_count(&self) -> u64 {
        self.terms.iter().map(|(_, _, freq)| *freq as u64).sum()
    }
}

/// Accumulates analyzed documents into a [`Segment`].
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    doc_ids: Vec<u64>,
    postings: InvertedIndex,
    numeric: AHashMap<String, Vec<NumericEntry>>,
    stored: Vec<Vec<DocumentField>>,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. Doc ids must be strictly increasing.
    pub fn add_document(&mut self, doc_id: u64, doc: &AnalyzedDocument) -> Result<()> {
        if let Some(&last) = self.doc_ids.last() {
            if doc_id <= last {
                return Err(StorageError::Corrupt(format!(
                    "doc id {doc_id} added after {last}"
                ))
                .into());
            }
        }

        self.doc_ids.push(doc_id);
        for (field, term, frequency) in &doc.terms {
            self.postings.add(field, term, doc_id, *frequency);
        }
        for (field, value) in &doc.numerics {
            self.numeric
                .entry(field.clone())
                .or_default()
                .push(NumericEntry::new(*value, doc_id));
        }
        self.stored.push(doc.stored.clone());

        Ok(())
    }

    pub fn doc_count(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn build(self) -> Segment {
        Segment {
            doc_ids: self.doc_ids,
            postings: self.postings,
            numeric: self
                .numeric
                .into_iter()
                .map(|(field, entries)| (field, NumericPointTree::new(entries)))
                .collect(),
            stored: self.stored,
        }
    }
}

/// One committed batch of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    doc_ids: Vec<u64>,
    postings: InvertedIndex,
    numeric: AHashMap<String, NumericPointTree>,
    /// Stored entries, aligned with `doc_ids`.
    stored: Vec<Vec<DocumentField>>,
}

impl Segment {
    /// Doc ids in this segment, ascending.
    pub fn doc_ids(&self) -> &[u64] {
        &self.doc_ids
    }

    pub fn doc_count(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn max_doc_id(&self) -> Option<u64> {
        self.doc_ids.last().copied()
    }

    pub fn contains_doc(&self, doc_id: u64) -> bool {
        self.doc_ids.binary_search(&doc_id).is_ok()
    }

    pub fn postings(&self, field: &str, term: &str) -> Option<&PostingList> {
        self.postings.postings(field, term)
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.postings
    }

    pub fn numeric(&self, field: &str) -> Option<&NumericPointTree> {
        self.numeric.get(field)
    }

    /// Stored entries of a document, if it lives in this segment.
    pub fn stored_fields(&self, doc_id: u64) -> Option<&[DocumentField]> {
        let index = self.doc_ids.binary_search(&doc_id).ok()?;
        self.stored.get(index).map(Vec::as_slice)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = StructWriter::new(Vec::new());
        writer.write_raw(SEGMENT_MAGIC)?;
        writer.write_u32(SEGMENT_VERSION)?;

        writer.write_delta_u64s(&self.doc_ids)?;
        self.postings.encode(&mut writer)?;

        let mut numeric_fields: Vec<&String> = self.numeric.keys().collect();
        numeric_fields.sort();
        writer.write_varint(numeric_fields.len() as u64)?;
        for field in numeric_fields {
            writer.write_string(field)?;
            self.numeric[field].encode(&mut writer)?;
        }

        for fields in &self.stored {
            writer.write_varint(fields.len() as u64)?;
            for field in fields {
                writer.write_string(&field.name)?;
                write_value(&mut writer, &field.value)?;
            }
        }

        writer.finish()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = StructReader::new(bytes);

        let magic = reader.read_raw(SEGMENT_MAGIC.len())?;
        if magic != SEGMENT_MAGIC {
            return Err(StorageError::Corrupt("not a segment file".into()).into());
        }
        let version = reader.read_u32()?;
        if version != SEGMENT_VERSION {
            return Err(
                StorageError::Corrupt(format!("unsupported segment version {version}")).into(),
            );
        }

        let doc_ids = reader.read_delta_u64s()?;
        if !doc_ids.is_sorted_by(|a, b| a < b) {
            return Err(StorageError::Corrupt("doc ids out of order".into()).into());
        }

        let postings = InvertedIndex::decode(&mut reader)?;

        let numeric_count = reader.read_len()?;
        let mut numeric = AHashMap::with_capacity(numeric_count.min(1024));
        for _ in 0..numeric_count {
            let field = reader.read_string()?;
            numeric.insert(field, NumericPointTree::decode(&mut reader)?);
        }

        let mut stored = Vec::with_capacity(doc_ids.len());
        for _ in 0..doc_ids.len() {
            let count = reader.read_len()?;
            let mut fields = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let name = reader.read_string()?;
                let value = read_value(&mut reader)?;
                fields.push(DocumentField {
                    name,
                    value,
                    stored: true,
                });
            }
            stored.push(fields);
        }

        reader.verify_checksum()?;

        Ok(Segment {
            doc_ids,
            postings,
            numeric,
            stored,
        })
    }
}

fn write_value<W: Write>(writer: &mut StructWriter<W>, value: &FieldValue) -> Result<()> {
    match value {
        FieldValue::Text(text) => {
            writer.write_u8(TAG_TEXT)?;
            writer.write_string(text)
        }
        FieldValue::Keyword(keyword) => {
            writer.write_u8(TAG_KEYWORD)?;
            writer.write_string(keyword)
        }
        FieldValue::Numeric(number) => {
            writer.write_u8(TAG_NUMERIC)?;
            writer.write_f64(*number)
        }
    }
}

fn read_value<R: Read>(reader: &mut StructReader<R>) -> Result<FieldValue> {
    match reader.read_u8()? {
        TAG_TEXT => Ok(FieldValue::Text(reader.read_string()?)),
        TAG_KEYWORD => Ok(FieldValue::Keyword(reader.read_string()?)),
        TAG_NUMERIC => Ok(FieldValue::Numeric(reader.read_f64()?)),
        tag => Err(StorageError::Corrupt(format!("unknown value tag {tag}")).into()),
    }
}
