//! The index writer.
//!
//! Documents added through [`IndexWriter`] are analyzed, given a doc id and
//! buffered in memory. Nothing buffered is visible to readers until
//! [`commit`](IndexWriter::commit) encodes the buffer as a segment, writes it
//! to the segment store and publishes a new snapshot.

use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::document::{Document, DocumentField, FieldValue};
use crate::error::{PilumError, Result};
use crate::index::index::Index;
use crate::index::segment::{AnalyzedDocument, SegmentBuilder};

/// Counters describing a writer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    /// Documents buffered since the last commit.
    pub pending_docs: u64,
    /// The doc id the next added document will receive.
    pub next_doc_id: u64,
    /// Successful commits in this session.
    pub commits: u64,
    /// Failed commit attempts in this session.
    pub failed_commits: u64,
}

#[derive(Debug)]
struct WriterState {
    next_doc_id: u64,
    pending: Vec<(u64, AnalyzedDocument)>,
    commits: u64,
    failed_commits: u64,
}

/// Writes documents into an [`Index`].
///
/// The writer is `Send + Sync`: `add_document` and `commit` can be called
/// from several threads at once. Analysis runs outside the writer lock; doc id
/// assignment, buffering and publication run under it.
///
/// ```
/// use pilum::index::Index;
/// use pilum::document::Document;
/// use pilum::schema::{FieldOption, Schema};
///
/// # fn main() -> pilum::error::Result<()> {
/// let schema = Schema::new().with_field("body", FieldOption::text())?;
/// let index = Index::in_memory(schema)?;
///
/// let writer = index.writer()?;
/// let doc = Document::builder(index.schema().clone())
///     .add_text("body", "Hello search")
///     .build()?;
/// let doc_id = writer.add_document(doc)?;
/// assert_eq!(doc_id, 0);
/// assert_eq!(index.reader().doc_count(), 0);
///
/// writer.commit()?;
/// assert_eq!(index.reader().doc_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IndexWriter {
    index: Index,
    state: Mutex<WriterState>,
    closed: AtomicBool,
}

impl IndexWriter {
    pub(crate) fn new(index: Index) -> Self {
        let next_doc_id = index.snapshot().next_doc_id();
        IndexWriter {
            index,
            state: Mutex::new(WriterState {
                next_doc_id,
                pending: Vec::new(),
                commits: 0,
                failed_commits: 0,
            }),
            closed: AtomicBool::new(false),
        }
    }

    /// Analyze and buffer a document, returning its doc id.
    pub fn add_document(&self, doc: Document) -> Result<u64> {
        self.ensure_open()?;
        let analyzed = self.analyze(&doc)?;

        let mut state = self.state.lock();
        self.ensure_open()?;

        let doc_id = state.next_doc_id;
        state.next_doc_id += 1;
        state.pending.push((doc_id, analyzed));

        Ok(doc_id)
    }

    /// Publish all buffered documents as a new snapshot.
    ///
    /// Committing an empty buffer publishes nothing. If the segment store
    /// fails, the buffer is kept and no snapshot is published, so the commit
    /// can be retried.
    pub fn commit(&self) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        self.commit_locked(&mut state)
    }

    /// Discard buffered documents and rewind doc id assignment.
    pub fn rollback(&self) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state.lock();

        let discarded = state.pending.len();
        state.pending.clear();
        state.next_doc_id = self.index.snapshot().next_doc_id();

        log::debug!("rolled back {discarded} pending documents");
        Ok(())
    }

    /// Number of documents buffered since the last commit.
    pub fn pending_docs(&self) -> u64 {
        self.state.lock().pending.len() as u64
    }

    pub fn stats(&self) -> WriterStats {
        let state = self.state.lock();
        WriterStats {
            pending_docs: state.pending.len() as u64,
            next_doc_id: state.next_doc_id,
            commits: state.commits,
            failed_commits: state.failed_commits,
        }
    }

    /// Commit any buffered documents and release the index's writer slot.
    ///
    /// Calling `close` again after it succeeded does nothing. If the final
    /// commit fails the writer stays open.
    pub fn close(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }

        let mut state = self.state.lock();
        if self.is_closed() {
            return Ok(());
        }

        self.commit_locked(&mut state)?;
        self.closed.store(true, Ordering::Release);
        self.index.release_writer();

        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PilumError::invalid_operation("writer is closed"));
        }
        Ok(())
    }

    fn commit_locked(&self, state: &mut WriterState) -> Result<()> {
        if state.pending.is_empty() {
            return Ok(());
        }

        let mut builder = SegmentBuilder::new();
        for (doc_id, doc) in &state.pending {
            builder.add_document(*doc_id, doc)?;
        }
        let segment = builder.build();

        let handle = match segment
            .encode()
            .and_then(|bytes| self.index.store().write(&bytes))
        {
            Ok(handle) => handle,
            Err(e) => {
                state.failed_commits += 1;
                log::warn!(
                    "commit of {} documents failed, buffer kept: {e}",
                    state.pending.len()
                );
                return Err(e);
            }
        };

        let docs = state.pending.len();
        let snapshot = self.index.publish(segment);
        state.pending.clear();
        state.commits += 1;

        log::info!(
            "committed {docs} documents as {handle}, generation {}",
            snapshot.generation()
        );
        Ok(())
    }

    fn analyze(&self, doc: &Document) -> Result<AnalyzedDocument> {
        let schema = self.index.schema();
        let analyzers = self.index.analyzers();

        let mut frequencies: AHashMap<(String, String), u32> = AHashMap::new();
        let mut analyzed = AnalyzedDocument::default();

        for field in doc.fields() {
            let option = schema.validate(&field.name, &field.value)?;

            match &field.value {
                FieldValue::Text(text) => {
                    for token in analyzers.analyze(&field.name, text)? {
                        if token.is_stopped() {
                            continue;
                        }
                        *frequencies
                            .entry((field.name.clone(), token.text))
                            .or_insert(0) += 1;
                    }
                }
                FieldValue::Keyword(keyword) => {
                    *frequencies
                        .entry((field.name.clone(), keyword.clone()))
                        .or_insert(0) += 1;
                }
                FieldValue::Numeric(number) => {
                    analyzed.numerics.push((field.name.clone(), *number));
                }
            }

            if option.stored {
                analyzed.stored.push(DocumentField {
                    name: field.name.clone(),
                    value: field.value.clone(),
                    stored: true,
                });
            }
        }

        analyzed.terms = frequencies
            .into_iter()
            .map(|((field, term), frequency)| (field, term, frequency))
            .collect();

        Ok(analyzed)
    }
}

impl Drop for IndexWriter {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }

        if let Err(e) = self.close() {
            log::warn!("final commit on drop failed, pending documents lost: {e}");
            self.closed.store(true, Ordering::Release);
            self.index.release_writer();
        }
    }
}
