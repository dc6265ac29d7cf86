//! Top-N collection of scored hits.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A matching document with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub doc_id: u64,
    pub score: f64,
}

impl Hit {
    pub fn new(doc_id: u64, score: f64) -> Self {
        Hit { doc_id, score }
    }

    /// Ranking order: higher score first, then lower doc id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// The best hits of a search plus the uncapped match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopDocs {
    /// Number of documents that matched, regardless of the limit.
    pub total_hits: u64,
    /// The retrieved hits in ranking order.
    pub hits: Vec<Hit>,
}

impl TopDocs {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn max_score(&self) -> Option<f64> {
        self.hits.first().map(|hit| hit.score)
    }

    /// Whether the limit cut off some matching documents.
    pub fn is_truncated(&self) -> bool {
        (self.hits.len() as u64) < self.total_hits
    }
}

/// Heap entry ordered so that the worst-ranked hit is the greatest.
#[derive(Debug, Clone, Copy)]
struct RankedHit(Hit);

impl PartialEq for RankedHit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedHit {}

impl PartialOrd for RankedHit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedHit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// A collector that keeps the top N documents.
///
/// Ties on score are broken by doc id, so the kept set and its order are the
/// same whatever order documents are collected in.
#[derive(Debug)]
pub struct TopDocsCollector {
    max_docs: usize,
    hits: BinaryHeap<RankedHit>,
    total_hits: u64,
}

impl TopDocsCollector {
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024) + 1),
            total_hits: 0,
        }
    }

    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn collect(&mut self, doc_id: u64, score: f64) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        let candidate = RankedHit(Hit::new(doc_id, score));
        if self.hits.len() < self.max_docs {
            self.hits.push(candidate);
        } else if let Some(worst) = self.hits.peek() {
            if candidate < *worst {
                self.hits.pop();
                self.hits.push(candidate);
            }
        }
    }

    pub fn into_top_docs(self) -> TopDocs {
        TopDocs {
            total_hits: self.total_hits,
            hits: self
                .hits
                .into_sorted_vec()
                .into_iter()
                .map(|ranked| ranked.0)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_best_hits_in_order() {
        let mut collector = TopDocsCollector::new(3);
        collector.collect(1, 0.5);
        collector.collect(2, 2.0);
        collector.collect(3, 1.0);
        collector.collect(4, 3.0);
        collector.collect(5, 0.1);

        let top = collector.into_top_docs();
        assert_eq!(top.total_hits, 5);
        let ids: Vec<u64> = top.hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![4, 2, 3]);
        assert_eq!(top.max_score(), Some(3.0));
        assert!(top.is_truncated());
    }

    #[test]
    fn test_ties_break_on_doc_id() {
        let mut forward = TopDocsCollector::new(2);
        let mut backward = TopDocsCollector::new(2);
        for doc_id in 0..5 {
            forward.collect(doc_id, 1.0);
            backward.collect(4 - doc_id, 1.0);
        }

        let forward = forward.into_top_docs();
        let backward = backward.into_top_docs();
        assert_eq!(forward, backward);
        let ids: Vec<u64> = forward.hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_zero_limit_still_counts() {
        let mut collector = TopDocsCollector::new(0);
        collector.collect(1, 1.0);
        collector.collect(2, 1.0);
        let top = collector.into_top_docs();
        assert_eq!(top.total_hits, 2);
        assert!(top.is_empty());
    }
}
