//! Indexing: the write path, committed segments and published snapshots.
//!
//! An [`Index`] owns a segment store and the current [`Snapshot`]. An
//! [`IndexWriter`] buffers analyzed documents and turns each commit into an
//! immutable [`Segment`]; an [`IndexReader`] holds one snapshot for as long as
//! it lives.

#[allow(clippy::module_inception)]
pub mod index;
pub mod point_tree;
pub mod posting;
pub mod reader;
pub mod segment;
pub mod snapshot;
pub mod writer;

pub use index::{Index, IndexConfig, IndexStats, OpenMode};
pub use point_tree::{NumericEntry, NumericPointTree};
pub use posting::{InvertedIndex, Posting, PostingList};
pub use reader::IndexReader;
pub use segment::Segment;
pub use snapshot::Snapshot;
pub use writer::{IndexWriter, WriterStats};
