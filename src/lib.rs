//! # Pilum
//!
//! A small embeddable document search engine.
//!
//! Documents are built against a [`schema::Schema`], analyzed per field and
//! written through an [`index::IndexWriter`]. Each commit writes one immutable
//! segment and publishes a new snapshot; readers keep the snapshot they were
//! opened on, so searches never observe a half-finished commit.
//!
//! ## Features
//!
//! - Text, keyword and numeric point fields, optionally stored
//! - Per-field analysis pipelines (standard, simple, whitespace, keyword)
//! - Term, inclusive numeric range and boolean queries
//! - Pluggable scoring and top-N collection with paging
//! - File and in-memory storage backends
//!
//! ## Example
//!
//! ```
//! use pilum::document::Document;
//! use pilum::index::Index;
//! use pilum::query::{RangeQuery, TfIdfScorer};
//! use pilum::schema::{FieldOption, Schema};
//!
//! # fn main() -> pilum::error::Result<()> {
//! let schema = Schema::new()
//!     .with_field("title", FieldOption::text().stored(true))?
//!     .with_field("price", FieldOption::numeric_point())?;
//! let index = Index::in_memory(schema)?;
//!
//! let writer = index.writer()?;
//! for (title, price) in [("cheap", 50.0), ("fair", 150.0), ("steep", 400.0)] {
//!     let doc = Document::builder(index.schema().clone())
//!         .add_text("title", title)
//!         .add_numeric("price", price)
//!         .build()?;
//!     writer.add_document(doc)?;
//! }
//! writer.commit()?;
//!
//! let searcher = index.reader().searcher();
//! let top = searcher.search(&RangeQuery::new("price", 100.0, 300.0).into(), &TfIdfScorer::new(), 10)?;
//! assert_eq!(top.total_hits, 1);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod schema;
pub mod storage;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
