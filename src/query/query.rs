//! The query type accepted by the evaluator.

use std::fmt;

use crate::query::boolean::BooleanQuery;
use crate::query::range::RangeQuery;
use crate::query::term::TermQuery;

/// An already-parsed query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Exact term lookup in a text or keyword field.
    Term(TermQuery),
    /// Inclusive numeric range over a point field.
    Range(RangeQuery),
    /// AND/OR/NOT composition.
    Boolean(BooleanQuery),
}

impl Query {
    /// The field this query targets, for single-field queries.
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Term(query) => Some(query.field()),
            Query::Range(query) => Some(query.field()),
            Query::Boolean(_) => None,
        }
    }
}

impl From<TermQuery> for Query {
    fn from(query: TermQuery) -> Self {
        Query::Term(query)
    }
}

impl From<RangeQuery> for Query {
    fn from(query: RangeQuery) -> Self {
        Query::Range(query)
    }
}

impl From<BooleanQuery> for Query {
    fn from(query: BooleanQuery) -> Self {
        Query::Boolean(query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term(query) => query.fmt(f),
            Query::Range(query) => query.fmt(f),
            Query::Boolean(query) => query.fmt(f),
        }
    }
}
