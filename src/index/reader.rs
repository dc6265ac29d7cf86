//! Readers over published snapshots.

use std::sync::Arc;

use crate::document::Document;
use crate::index::snapshot::Snapshot;
use crate::query::evaluator::Searcher;

/// A handle on one published [`Snapshot`].
///
/// The view never changes, whatever is committed after the reader was opened.
/// The snapshot is released when the reader is closed or dropped.
#[derive(Debug, Clone)]
pub struct IndexReader {
    snapshot: Arc<Snapshot>,
}

impl IndexReader {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        IndexReader { snapshot }
    }

    pub fn generation(&self) -> u64 {
        self.snapshot.generation()
    }

    pub fn doc_count(&self) -> u64 {
        self.snapshot.doc_count()
    }

    /// The stored fields of a document.
    ///
    /// Fields not declared as stored are absent from the returned document.
    pub fn document(&self, doc_id: u64) -> Option<Document> {
        self.snapshot.document(doc_id)
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// A searcher over this reader's snapshot.
    pub fn searcher(&self) -> Searcher {
        Searcher::new(Arc::clone(&self.snapshot))
    }

    /// Release the snapshot reference.
    pub fn close(self) {
        log::debug!("closed reader on generation {}", self.snapshot.generation());
    }
}
