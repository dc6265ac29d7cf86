//! Scoring of individual matches.
//!
//! The evaluator performs no ranking math itself: for every document a
//! term or range clause matches, it hands a [`MatchStats`] to the injected
//! [`Scorer`] and uses the returned value. Any
//! `Fn(&str, &MatchStats) -> f64` closure is a scorer.

/// What kind of clause produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Term,
    Range,
}

/// Statistics describing one document's match against one clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchStats {
    pub kind: MatchKind,
    /// Occurrences of the term (or values in range) in the document.
    pub term_frequency: u32,
    /// Number of documents the clause matches.
    pub doc_frequency: u64,
    /// Number of documents in the snapshot.
    pub doc_count: u64,
}

/// Trait for match scorers.
pub trait Scorer: Send + Sync {
    /// Score a match in `field`.
    fn score(&self, field: &str, stats: &MatchStats) -> f64;

    /// Get the name of this scorer.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Scorer for F
where
    F: Fn(&str, &MatchStats) -> f64 + Send + Sync,
{
    fn score(&self, field: &str, stats: &MatchStats) -> f64 {
        self(field, stats)
    }
}

/// Gives every match the same score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantScorer {
    score: f64,
}

impl ConstantScorer {
    pub fn new(score: f64) -> Self {
        ConstantScorer { score }
    }
}

impl Default for ConstantScorer {
    fn default() -> Self {
        ConstantScorer { score: 1.0 }
    }
}

impl Scorer for ConstantScorer {
    fn score(&self, _field: &str, _stats: &MatchStats) -> f64 {
        self.score
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Classic TF-IDF: `sqrt(tf) * idf^2` with `idf = 1 + ln(N / (df + 1))`.
///
/// Range matches get a flat score of `range_score`, as numeric points carry
/// no meaningful frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfIdfScorer {
    range_score: f64,
}

impl TfIdfScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range_score(mut self, range_score: f64) -> Self {
        self.range_score = range_score;
        self
    }

    fn idf(doc_frequency: u64, doc_count: u64) -> f64 {
        1.0 + (doc_count as f64 / (doc_frequency as f64 + 1.0)).ln()
    }
}

impl Default for TfIdfScorer {
    fn default() -> Self {
        TfIdfScorer { range_score: 1.0 }
    }
}

impl Scorer for TfIdfScorer {
    fn score(&self, _field: &str, stats: &MatchStats) -> f64 {
        match stats.kind {
            MatchKind::Range => self.range_score,
            MatchKind::Term => {
                if stats.term_frequency == 0 || stats.doc_count == 0 {
                    return 0.0;
                }
                let idf = Self::idf(stats.doc_frequency, stats.doc_count);
                (stats.term_frequency as f64).sqrt() * idf * idf
            }
        }
    }

    fn name(&self) -> &'static str {
        "tf-idf"
    }
}
