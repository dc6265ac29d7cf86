//! Query system for searching documents.
//!
//! Queries arrive already parsed as a [`Query`] value. A [`Searcher`]
//! evaluates them against one snapshot, scoring matches with an injected
//! [`Scorer`], and a [`PagingCursor`] walks the ranked hits page by page.

pub mod boolean;
pub mod collector;
pub mod evaluator;
pub mod paging;
#[allow(clippy::module_inception)]
pub mod query;
pub mod range;
pub mod scorer;
pub mod term;

pub use self::boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use self::collector::{Hit, TopDocs, TopDocsCollector};
pub use self::evaluator::{Searcher, UnknownFieldPolicy, evaluate};
pub use self::paging::{CursorState, Page, PagingConfig, PagingCursor};
pub use self::query::Query;
pub use self::range::RangeQuery;
pub use self::scorer::{ConstantScorer, MatchKind, MatchStats, Scorer, TfIdfScorer};
pub use self::term::TermQuery;
