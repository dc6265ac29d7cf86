//! Query evaluation against a snapshot.
//!
//! Every clause is evaluated to a list of `(doc_id, score)` pairs ordered by
//! doc id. Boolean composition merges those lists; the final list is fed to a
//! [`TopDocsCollector`].

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{PilumError, Result};
use crate::index::snapshot::Snapshot;
use crate::query::boolean::{BooleanQuery, Occur};
use crate::query::collector::{TopDocs, TopDocsCollector};
use crate::query::paging::{PagingConfig, PagingCursor};
use crate::query::query::Query;
use crate::query::range::RangeQuery;
use crate::query::scorer::{MatchKind, MatchStats, Scorer};
use crate::query::term::TermQuery;
use crate::schema::FieldKind;

/// Scored matches ordered by doc id, without duplicates.
type Matches = Vec<(u64, f64)>;

/// What to do when a query names a field the snapshot cannot search.
///
/// A field is unsearchable for a query when it is not declared in the schema,
/// or when its kind does not fit the query (a term query on a numeric field,
/// a range query on a text field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Treat the clause as matching nothing.
    #[default]
    Empty,
    /// Fail with `UnknownField`.
    Error,
}

/// Evaluates queries against one snapshot.
///
/// Searchers are cheap to clone and never block writers: the snapshot is
/// immutable.
#[derive(Debug, Clone)]
pub struct Searcher {
    snapshot: Arc<Snapshot>,
    unknown_field_policy: UnknownFieldPolicy,
}

impl Searcher {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Searcher {
            snapshot,
            unknown_field_policy: UnknownFieldPolicy::default(),
        }
    }

    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_field_policy = policy;
        self
    }

    pub fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        self.unknown_field_policy
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Evaluate `query`, returning at most `limit` hits plus the total count.
    ///
    /// Hits are ordered by score descending, then doc id ascending.
    pub fn search(&self, query: &Query, scorer: &dyn Scorer, limit: usize) -> Result<TopDocs> {
        let matches = self.matches(query, scorer)?;

        let mut collector = TopDocsCollector::new(limit);
        for (doc_id, score) in matches {
            collector.collect(doc_id, score);
        }

        let top_docs = collector.into_top_docs();
        log::debug!(
            "query `{query}`: {} total hits, {} returned",
            top_docs.total_hits,
            top_docs.hits.len()
        );
        Ok(top_docs)
    }

    /// Count matching documents without ranking them.
    pub fn count(&self, query: &Query) -> Result<u64> {
        let unit = |_: &str, _: &MatchStats| 0.0;
        Ok(self.matches(query, &unit)?.len() as u64)
    }

    /// Start a paging cursor over the results of `query`.
    pub fn paginate(
        &self,
        query: Query,
        scorer: Arc<dyn Scorer>,
        config: PagingConfig,
    ) -> Result<PagingCursor> {
        PagingCursor::new(self.clone(), query, scorer, config)
    }

    fn matches(&self, query: &Query, scorer: &dyn Scorer) -> Result<Matches> {
        match query {
            Query::Term(term) => self.term_matches(term, scorer),
            Query::Range(range) => self.range_matches(range, scorer),
            Query::Boolean(boolean) => self.boolean_matches(boolean, scorer),
        }
    }

    fn term_matches(&self, query: &TermQuery, scorer: &dyn Scorer) -> Result<Matches> {
        let kind = self.snapshot.schema().kind(query.field());
        if !kind.is_some_and(|kind| kind.is_inverted()) {
            return self.unknown_field(query.field(), "term");
        }

        let postings = self.snapshot.postings(query.field(), query.term());
        let doc_frequency = postings.len() as u64;
        let doc_count = self.snapshot.doc_count();

        Ok(postings
            .iter()
            .map(|posting| {
                let stats = MatchStats {
                    kind: MatchKind::Term,
                    term_frequency: posting.frequency,
                    doc_frequency,
                    doc_count,
                };
                (posting.doc_id, scorer.score(query.field(), &stats))
            })
            .collect())
    }

    fn range_matches(&self, query: &RangeQuery, scorer: &dyn Scorer) -> Result<Matches> {
        if self.snapshot.schema().kind(query.field()) != Some(FieldKind::NumericPoint) {
            return self.unknown_field(query.field(), "range");
        }
        if query.is_empty_range() {
            return Ok(Vec::new());
        }

        let mut doc_ids: Vec<u64> = self
            .snapshot
            .numeric_range(query.field(), query.low(), query.high())
            .iter()
            .map(|entry| entry.doc_id)
            .collect();
        doc_ids.sort_unstable();

        // Collapse multi-valued documents, counting values in range.
        let mut counts: Vec<(u64, u32)> = Vec::with_capacity(doc_ids.len());
        for doc_id in doc_ids {
            match counts.last_mut() {
                Some((last, count)) if *last == doc_id => *count += 1,
                _ => counts.push((doc_id, 1)),
            }
        }

        let doc_frequency = counts.len() as u64;
        let doc_count = self.snapshot.doc_count();
        Ok(counts
            .into_iter()
            .map(|(doc_id, term_frequency)| {
                let stats = MatchStats {
                    kind: MatchKind::Range,
                    term_frequency,
                    doc_frequency,
                    doc_count,
                };
                (doc_id, scorer.score(query.field(), &stats))
            })
            .collect())
    }

    fn boolean_matches(&self, query: &BooleanQuery, scorer: &dyn Scorer) -> Result<Matches> {
        let mut required: Option<Matches> = None;
        for clause in query.clauses_with(Occur::Must) {
            let matches = self.matches(clause, scorer)?;
            required = Some(match required {
                Some(acc) => intersect(&acc, &matches),
                None => matches,
            });
        }

        let mut optional: Option<Matches> = None;
        for clause in query.clauses_with(Occur::Should) {
            let matches = self.matches(clause, scorer)?;
            optional = Some(match optional {
                Some(acc) => union(&acc, &matches),
                None => matches,
            });
        }

        let mut excluded: Matches = Vec::new();
        for clause in query.clauses_with(Occur::MustNot) {
            excluded = union(&excluded, &self.matches(clause, scorer)?);
        }

        let combined = match (required, optional) {
            (Some(required), Some(optional)) => intersect(&required, &optional),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => self.all_documents(),
        };

        Ok(difference(&combined, &excluded))
    }

    fn all_documents(&self) -> Matches {
        self.snapshot
            .all_doc_ids()
            .into_iter()
            .map(|doc_id| (doc_id, 0.0))
            .collect()
    }

    fn unknown_field(&self, field: &str, query_kind: &str) -> Result<Matches> {
        match self.unknown_field_policy {
            UnknownFieldPolicy::Empty => {
                log::debug!("{query_kind} query on unsearchable field '{field}', no matches");
                Ok(Vec::new())
            }
            UnknownFieldPolicy::Error => Err(PilumError::unknown_field(field)),
        }
    }
}

/// Evaluate `query` against `snapshot` with the default unknown-field policy.
pub fn evaluate(
    snapshot: &Arc<Snapshot>,
    query: &Query,
    scorer: &dyn Scorer,
    limit: usize,
) -> Result<TopDocs> {
    Searcher::new(Arc::clone(snapshot)).search(query, scorer, limit)
}

/// Documents in both lists; scores are summed.
fn intersect(left: &[(u64, f64)], right: &[(u64, f64)]) -> Matches {
    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result.push((left[i].0, left[i].1 + right[j].1));
                i += 1;
                j += 1;
            }
        }
    }
    result
}

/// Documents in either list; scores of documents in both are summed.
fn union(left: &[(u64, f64)], right: &[(u64, f64)]) -> Matches {
    let mut result = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            Ordering::Less => {
                result.push(left[i]);
                i += 1;
            }
            Ordering::Greater => {
                result.push(right[j]);
                j += 1;
            }
            Ordering::Equal => {
                result.push((left[i].0, left[i].1 + right[j].1));
                i += 1;
                j += 1;
            }
        }
    }
    result.extend_from_slice(&left[i..]);
    result.extend_from_slice(&right[j..]);
    result
}

/// Documents of `left` not in `right`.
fn difference(left: &[(u64, f64)], right: &[(u64, f64)]) -> Matches {
    let mut result = Vec::with_capacity(left.len());
    let mut j = 0;
    for &(doc_id, score) in left {
        while j < right.len() && right[j].0 < doc_id {
            j += 1;
        }
        if j < right.len() && right[j].0 == doc_id {
            continue;
        }
        result.push((doc_id, score));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::Index;
    use crate::query::scorer::ConstantScorer;
    use crate::schema::{FieldOption, Schema};

    fn build_index() -> Index {
        let schema = Schema::new()
            .with_field("body", FieldOption::text())
            .unwrap()
            .with_field("tag", FieldOption::keyword())
            .unwrap()
            .with_field("price", FieldOption::numeric_point())
            .unwrap();
        let index = Index::in_memory(schema).unwrap();
        let writer = index.writer().unwrap();

        let docs = [
            ("rust search engine", "lang", 100.0),
            ("rust book", "book", 102.3),
            ("java search", "lang", 300.4),
            ("search search search", "misc", 50.0),
        ];
        for (body, tag, price) in docs {
            let doc = Document::builder(Arc::clone(index.schema()))
                .add_text("body", body)
                .add_keyword("tag", tag)
                .add_numeric("price", price)
                .build()
                .unwrap();
            writer.add_document(doc).unwrap();
        }
        writer.close().unwrap();
        index
    }

    fn ids(top: &TopDocs) -> Vec<u64> {
        top.hits.iter().map(|h| h.doc_id).collect()
    }

    #[test]
    fn test_term_query() {
        let index = build_index();
        let searcher = index.reader().searcher();
        let scorer = ConstantScorer::default();

        let top = searcher
            .search(&TermQuery::new("body", "rust").into(), &scorer, 10)
            .unwrap();
        assert_eq!(ids(&top), vec![0, 1]);

        let top = searcher
            .search(&TermQuery::new("tag", "lang").into(), &scorer, 10)
            .unwrap();
        assert_eq!(ids(&top), vec![0, 2]);
    }

    #[test]
    fn test_scores_follow_term_frequency() {
        let index = build_index();
        let searcher = index.reader().searcher();
        let scorer = |_: &str, stats: &MatchStats| stats.term_frequency as f64;

        let top = searcher
            .search(&TermQuery::new("body", "search").into(), &scorer, 10)
            .unwrap();
        assert_eq!(ids(&top), vec![3, 0, 2]);
        assert_eq!(top.hits[0].score, 3.0);
    }

    #[test]
    fn test_range_query() {
        let index = build_index();
        let snapshot = index.snapshot();
        let scorer = ConstantScorer::default();

        let top = evaluate(
            &snapshot,
            &RangeQuery::new("price", 100.0, 300.0).into(),
            &scorer,
            10,
        )
        .unwrap();
        assert_eq!(ids(&top), vec![0, 1]);

        let top = evaluate(&snapshot, &RangeQuery::exact("price", 102.3).into(), &scorer, 10)
            .unwrap();
        assert_eq!(ids(&top), vec![1]);

        let top = evaluate(
            &snapshot,
            &RangeQuery::new("price", 300.0, 100.0).into(),
            &scorer,
            10,
        )
        .unwrap();
        assert_eq!(top.total_hits, 0);
    }

    #[test]
    fn test_boolean_query() {
        let index = build_index();
        let searcher = index.reader().searcher();
        let scorer = ConstantScorer::default();

        let query = BooleanQuery::builder()
            .must(TermQuery::new("body", "search"))
            .must_not(TermQuery::new("tag", "misc"))
            .build();
        let top = searcher.search(&query.into(), &scorer, 10).unwrap();
        assert_eq!(ids(&top), vec![0, 2]);

        let query = BooleanQuery::builder()
            .should(TermQuery::new("body", "rust"))
            .should(TermQuery::new("body", "search"))
            .build();
        let top = searcher.search(&query.into(), &scorer, 10).unwrap();
        assert_eq!(ids(&top), vec![0, 1, 2, 3]);
        assert_eq!(top.hits[0].score, 2.0);

        let query = BooleanQuery::builder()
            .must_not(RangeQuery::new("price", 0.0, 101.0))
            .build();
        let top = searcher.search(&query.into(), &scorer, 10).unwrap();
        assert_eq!(ids(&top), vec![1, 2]);
        assert!(top.hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_limit_keeps_total() {
        let index = build_index();
        let searcher = index.reader().searcher();
        let top = searcher
            .search(
                &TermQuery::new("body", "search").into(),
                &ConstantScorer::default(),
                1,
            )
            .unwrap();
        assert_eq!(top.total_hits, 3);
        assert_eq!(ids(&top), vec![0]);
        assert_eq!(searcher.count(&TermQuery::new("body", "search").into()).unwrap(), 3);
    }

    #[test]
    fn test_unknown_field_policy() {
        let index = build_index();
        let scorer = ConstantScorer::default();
        let queries: Vec<Query> = vec![
            TermQuery::new("color", "red").into(),
            TermQuery::new("price", "100").into(),
            RangeQuery::new("body", 0.0, 1.0).into(),
        ];

        let lenient = index.reader().searcher();
        let strict = lenient
            .clone()
            .with_unknown_field_policy(UnknownFieldPolicy::Error);
        for query in &queries {
            assert_eq!(lenient.search(query, &scorer, 10).unwrap().total_hits, 0);
            assert!(matches!(
                strict.search(query, &scorer, 10),
                Err(PilumError::UnknownField(_))
            ));
        }
    }

    #[test]
    fn test_merge_helpers() {
        let a = vec![(1, 1.0), (3, 1.0), (5, 1.0)];
        let b = vec![(3, 2.0), (4, 2.0), (5, 2.0)];
        assert_eq!(intersect(&a, &b), vec![(3, 3.0), (5, 3.0)]);
        assert_eq!(
            union(&a, &b),
            vec![(1, 1.0), (3, 3.0), (4, 2.0), (5, 3.0)]
        );
        assert_eq!(difference(&a, &b), vec![(1, 1.0)]);
    }
}
