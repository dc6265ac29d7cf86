//! Index management and coordination.
//!
//! [`Index`] ties together the schema, the analyzer registry, the segment
//! store and the current [`Snapshot`]. It is a cheap `Clone` handle; every
//! clone sees the same committed state.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::analysis::AnalyzerRegistry;
use crate::error::{PilumError, Result};
use crate::index::reader::IndexReader;
use crate::index::segment::Segment;
use crate::index::snapshot::Snapshot;
use crate::index::writer::IndexWriter;
use crate::schema::Schema;
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::memory::MemoryStorage;
use crate::storage::segment::{SegmentHandle, SegmentStore};
use crate::storage::Storage;

/// Name of the file holding the index schema.
pub const SCHEMA_FILE: &str = "schema.json";

/// How [`Index::create`] treats data already present in the storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Discard any existing index and start empty.
    Create,
    /// Append to an existing index, or create one if none exists.
    #[default]
    CreateOrAppend,
    /// Append to an existing index; fail if there is none.
    Append,
}

/// Configuration for index creation and management.
#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    /// Per-field analyzers used by writers of this index.
    pub analyzers: AnalyzerRegistry,

    /// Treatment of existing data on creation.
    pub open_mode: OpenMode,
}

impl IndexConfig {
    pub fn with_analyzers(mut self, analyzers: AnalyzerRegistry) -> Self {
        self.analyzers = analyzers;
        self
    }

    pub fn with_open_mode(mut self, open_mode: OpenMode) -> Self {
        self.open_mode = open_mode;
        self
    }
}

/// Statistics about an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    /// Number of documents in the current snapshot.
    pub doc_count: u64,

    /// Number of commits published.
    pub generation: u64,

    /// Number of segments in the current snapshot.
    pub segment_count: usize,

    /// Number of distinct (field, term) pairs, summed over segments.
    pub term_count: usize,
}

#[derive(Debug)]
pub(crate) struct IndexInner {
    schema: Arc<Schema>,
    analyzers: AnalyzerRegistry,
    store: SegmentStore,
    current: RwLock<Arc<Snapshot>>,
    writer_open: AtomicBool,
}

/// A searchable document index.
#[derive(Debug, Clone)]
pub struct Index {
    inner: Arc<IndexInner>,
}

impl Index {
    /// Create or open an index in `storage`, according to `config.open_mode`.
    ///
    /// When an index already exists and is kept, its stored schema must equal
    /// `schema`.
    pub fn create(storage: Arc<dyn Storage>, schema: Schema, config: IndexConfig) -> Result<Self> {
        let exists = storage.file_exists(SCHEMA_FILE);

        match (config.open_mode, exists) {
            (OpenMode::Append, false) => {
                return Err(PilumError::index("no index found to append to"));
            }
            (OpenMode::Create, _) | (OpenMode::CreateOrAppend, false) => {
                let store = SegmentStore::new(Arc::clone(&storage))?;
                store.clear()?;
                write_schema(storage.as_ref(), &schema)?;
                log::info!("created index with {} fields", schema.len());
                return Self::load(storage, Arc::new(schema), config);
            }
            (OpenMode::CreateOrAppend, true) | (OpenMode::Append, true) => {}
        }

        let existing = read_schema(storage.as_ref())?;
        if existing != schema {
            return Err(PilumError::schema(
                "schema does not match the existing index",
            ));
        }
        Self::load(storage, Arc::new(existing), config)
    }

    /// Open an existing index, reading its schema from storage.
    pub fn open(storage: Arc<dyn Storage>, config: IndexConfig) -> Result<Self> {
        if !storage.file_exists(SCHEMA_FILE) {
            return Err(PilumError::index("no index found"));
        }
        let schema = read_schema(storage.as_ref())?;
        Self::load(storage, Arc::new(schema), config)
    }

    /// Create or open an index in a directory on disk.
    pub fn create_in_dir<P: AsRef<Path>>(
        path: P,
        schema: Schema,
        config: IndexConfig,
    ) -> Result<Self> {
        let storage = FileStorage::new(&path, FileStorageConfig::new(&path))?;
        Self::create(Arc::new(storage), schema, config)
    }

    /// Open an existing index in a directory on disk.
    pub fn open_in_dir<P: AsRef<Path>>(path: P, config: IndexConfig) -> Result<Self> {
        let storage = FileStorage::new(&path, FileStorageConfig::new(&path))?;
        Self::open(Arc::new(storage), config)
    }

    /// Create an empty index held entirely in memory.
    pub fn in_memory(schema: Schema) -> Result<Self> {
        Self::create(
            Arc::new(MemoryStorage::new_default()),
            schema,
            IndexConfig::default(),
        )
    }

    fn load(storage: Arc<dyn Storage>, schema: Arc<Schema>, config: IndexConfig) -> Result<Self> {
        let store = SegmentStore::new(storage)?;

        let handles = store.list()?;
        let mut segments = Vec::with_capacity(handles.len());
        for handle in &handles {
            segments.push(Arc::new(load_segment(&store, *handle)?));
        }

        let snapshot = Snapshot::from_segments(Arc::clone(&schema), segments);
        log::info!(
            "opened index: {} segments, {} documents",
            handles.len(),
            snapshot.doc_count()
        );

        Ok(Index {
            inner: Arc::new(IndexInner {
                schema,
                analyzers: config.analyzers,
                store,
                current: RwLock::new(Arc::new(snapshot)),
                writer_open: AtomicBool::new(false),
            }),
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.inner.schema
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.inner.analyzers
    }

    /// Open the writer of this index.
    ///
    /// Only one writer may be open at a time; the slot is released when the
    /// writer is closed or dropped.
    pub fn writer(&self) -> Result<IndexWriter> {
        if self
            .inner
            .writer_open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PilumError::invalid_operation(
                "another writer is already open on this index",
            ));
        }

        Ok(IndexWriter::new(self.clone()))
    }

    /// Open a reader on the currently published snapshot.
    pub fn reader(&self) -> IndexReader {
        IndexReader::new(self.snapshot())
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.inner.current.read())
    }

    pub fn stats(&self) -> IndexStats {
        let snapshot = self.snapshot();
        IndexStats {
            doc_count: snapshot.doc_count(),
            generation: snapshot.generation(),
            segment_count: snapshot.segments().len(),
            term_count: snapshot
                .segments()
                .iter()
                .map(|s| s.inverted_index().total_terms())
                .sum(),
        }
    }

    pub(crate) fn store(&self) -> &SegmentStore {
        &self.inner.store
    }

    /// Swap in the successor of the current snapshot.
    pub(crate) fn publish(&self, segment: Segment) -> Arc<Snapshot> {
        let mut current = self.inner.current.write();
        let next = Arc::new(current.with_segment(Arc::new(segment)));
        *current = Arc::clone(&next);
        next
    }

    pub(crate) fn release_writer(&self) {
        self.inner.writer_open.store(false, Ordering::Release);
    }
}

fn load_segment(store: &SegmentStore, handle: SegmentHandle) -> Result<Segment> {
    let bytes = store.read(handle)?;
    Segment::decode(&bytes)
        .map_err(|e| PilumError::storage(format!("failed to load {handle}: {e}")))
}

fn write_schema(storage: &dyn Storage, schema: &Schema) -> Result<()> {
    let mut output = storage.create_output(SCHEMA_FILE)?;
    output.write_all(schema.to_json_string()?.as_bytes())?;
    output.close()
}

fn read_schema(storage: &dyn Storage) -> Result<Schema> {
    let mut input = storage.open_input(SCHEMA_FILE)?;
    let mut json = String::new();
    input.read_to_string(&mut json)?;
    Schema::from_json_str(&json)
}
