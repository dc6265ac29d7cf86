//! Boolean query implementation for combining multiple queries.

use std::fmt;

use crate::query::query::Query;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

/// A clause in a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanClause {
    pub query: Query,
    pub occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Query, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }
}

/// AND/OR/NOT composition of queries.
///
/// The matching set is the intersection of the `must` clauses (every document
/// if there are none), intersected with the union of the `should` clauses
/// (every document if there are none), minus the union of the `must_not`
/// clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> BooleanQueryBuilder {
        BooleanQueryBuilder::new()
    }

    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    pub fn add_must<Q: Into<Query>>(&mut self, query: Q) {
        self.add_clause(BooleanClause::new(query.into(), Occur::Must));
    }

    pub fn add_should<Q: Into<Query>>(&mut self, query: Q) {
        self.add_clause(BooleanClause::new(query.into(), Occur::Should));
    }

    pub fn add_must_not<Q: Into<Query>>(&mut self, query: Q) {
        self.add_clause(BooleanClause::new(query.into(), Occur::MustNot));
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Clauses with the given occurrence, in insertion order.
    pub fn clauses_with(&self, occur: Occur) -> impl Iterator<Item = &Query> {
        self.clauses
            .iter()
            .filter(move |clause| clause.occur == occur)
            .map(|clause| &clause.query)
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            match clause.occur {
                Occur::Must => write!(f, "+")?,
                Occur::MustNot => write!(f, "-")?,
                Occur::Should => {}
            }
            match &clause.query {
                Query::Boolean(inner) => write!(f, "({inner})")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

/// Builder for [`BooleanQuery`].
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must<Q: Into<Query>>(mut self, query: Q) -> Self {
        self.query.add_must(query);
        self
    }

    pub fn should<Q: Into<Query>>(mut self, query: Q) -> Self {
        self.query.add_should(query);
        self
    }

    pub fn must_not<Q: Into<Query>>(mut self, query: Q) -> Self {
        self.query.add_must_not(query);
        self
    }

    pub fn build(self) -> BooleanQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::range::RangeQuery;
    use crate::query::term::TermQuery;

    #[test]
    fn test_clause_grouping() {
        let query = BooleanQuery::builder()
            .must(TermQuery::new("body", "rust"))
            .should(TermQuery::new("tag", "lang"))
            .must_not(RangeQuery::new("price", 0.0, 10.0))
            .must(TermQuery::new("body", "search"))
            .build();

        assert_eq!(query.clauses().len(), 4);
        assert_eq!(query.clauses_with(Occur::Must).count(), 2);
        assert_eq!(query.clauses_with(Occur::Should).count(), 1);
        assert_eq!(query.clauses_with(Occur::MustNot).count(), 1);
    }

    #[test]
    fn test_display() {
        let inner = BooleanQuery::builder()
            .should(TermQuery::new("tag", "a"))
            .should(TermQuery::new("tag", "b"))
            .build();
        let query = BooleanQuery::builder()
            .must(TermQuery::new("body", "rust"))
            .must(inner)
            .must_not(RangeQuery::new("price", 0.0, 10.0))
            .build();

        assert_eq!(
            query.to_string(),
            "+body:rust +(tag:a tag:b) -price:[0 TO 10]"
        );
    }
}
