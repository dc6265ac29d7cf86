//! Immutable point-in-time views of the committed index.
//!
//! A [`Snapshot`] is never modified once built. Publishing a commit creates a
//! new snapshot that shares the previous one's segments and appends the new
//! segment, so readers holding the old snapshot keep a consistent view.

use std::sync::Arc;

use crate::document::Document;
use crate::index::point_tree::NumericEntry;
use crate::index::posting::Posting;
use crate::index::segment::Segment;
use crate::schema::Schema;

/// One committed state of the index.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    schema: Arc<Schema>,
    segments: Vec<Arc<Segment>>,
    doc_count: u64,
}

impl Snapshot {
    /// The snapshot of an index with no commits.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Snapshot {
            generation: 0,
            schema,
            segments: Vec::new(),
            doc_count: 0,
        }
    }

    /// Build a snapshot from segments loaded in commit order.
    pub fn from_segments(schema: Arc<Schema>, segments: Vec<Arc<Segment>>) -> Self {
        let doc_count = segments.iter().map(|s| s.doc_count() as u64).sum();
        Snapshot {
            generation: segments.len() as u64,
            schema,
            segments,
            doc_count,
        }
    }

    /// A successor snapshot with `segment` appended.
    pub fn with_segment(&self, segment: Arc<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        let doc_count = self.doc_count + segment.doc_count() as u64;
        segments.push(segment);

        Snapshot {
            generation: self.generation + 1,
            schema: Arc::clone(&self.schema),
            segments,
            doc_count,
        }
    }

    /// Number of commits this snapshot reflects.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// The doc id the next committed document will receive.
    pub fn next_doc_id(&self) -> u64 {
        self.segments
            .iter()
            .rev()
            .find_map(|s| s.max_doc_id())
            .map_or(0, |max| max + 1)
    }

    /// Every doc id, ascending.
    pub fn all_doc_ids(&self) -> Vec<u64> {
        let mut doc_ids = Vec::with_capacity(self.doc_count as usize);
        for segment in &self.segments {
            doc_ids.extend_from_slice(segment.doc_ids());
        }
        doc_ids
    }

    /// Postings of a term across all segments, ordered by doc id.
    pub fn postings(&self, field: &str, term: &str) -> Vec<Posting> {
        let mut postings = Vec::new();
        for segment in &self.segments {
            if let Some(list) = segment.postings(field, term) {
                postings.extend_from_slice(list.postings());
            }
        }
        postings
    }

    /// Number of documents containing a term.
    pub fn doc_frequency(&self, field: &str, term: &str) -> u64 {
        self.segments
            .iter()
            .filter_map(|s| s.postings(field, term))
            .map(|list| list.doc_frequency())
            .sum()
    }

    /// Numeric entries of a field within `[low, high]`, grouped by segment.
    pub fn numeric_range(&self, field: &str, low: f64, high: f64) -> Vec<NumericEntry> {
        let mut entries = Vec::new();
        for segment in &self.segments {
            if let Some(tree) = segment.numeric(field) {
                entries.extend_from_slice(tree.range(low, high));
            }
        }
        entries
    }

    /// The stored fields of a document, or `None` if it is not in this snapshot.
    pub fn document(&self, doc_id: u64) -> Option<Document> {
        let fields = self
            .segments
            .iter()
            .filter(|s| s.max_doc_id().is_some_and(|max| max >= doc_id))
            .find_map(|s| s.stored_fields(doc_id))?;
        Some(Document::from_fields(fields.to_vec()))
    }
}
