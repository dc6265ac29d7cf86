//! Standard analyzer: word characters, lowercased, English stop words removed.
//!
//! The default analyzer for text fields.
//!
//! ```
//! use pilum::analysis::analyzer::analyzer::Analyzer;
//! use pilum::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let words: Vec<_> = analyzer.analyze("The Rust Book").unwrap().map(|t| t.text).collect();
//! assert_eq!(words, vec!["rust", "book"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    pipeline: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Standard analysis with the default English stop word list.
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Standard analysis removing `words` instead of the English list.
    ///
    /// An empty list keeps every token.
    pub fn with_stop_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_stop_filter(StopFilter::from_words(words))
    }

    fn with_stop_filter(stop: StopFilter) -> Result<Self> {
        let pipeline = PipelineAnalyzer::new("standard", Arc::new(RegexTokenizer::new()?))
            .then(Arc::new(LowercaseFilter::new()))
            .then(Arc::new(stop));
        Ok(StandardAnalyzer { pipeline })
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        self.pipeline.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(analyzer: &StandardAnalyzer, text: &str) -> Vec<String> {
        analyzer.analyze(text).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_punctuation_and_stop_words() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert_eq!(
            words(&analyzer, "Lucene-style Search, with SNAPSHOTS!"),
            vec!["lucene", "style", "search", "snapshots"]
        );
        assert_eq!(analyzer.name(), "standard");
    }

    #[test]
    fn test_custom_stop_words() {
        let analyzer = StandardAnalyzer::with_stop_words(["rust"]).unwrap();
        assert_eq!(words(&analyzer, "The Rust Book"), vec!["the", "book"]);

        let keep_all = StandardAnalyzer::with_stop_words(Vec::<String>::new()).unwrap();
        assert_eq!(words(&keep_all, "Hello the World").len(), 3);
    }
}
