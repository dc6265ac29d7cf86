//! Simple analyzer: letters and digits only, lowercased.
//!
//! Splits on every character that is neither a letter nor a digit, so
//! punctuation, underscores and symbols all act as separators. No stop words
//! are removed.
//!
//! ```
//! use pilum::analysis::analyzer::analyzer::Analyzer;
//! use pilum::analysis::analyzer::simple::SimpleAnalyzer;
//!
//! let analyzer = SimpleAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("The_Rust-Book 2nd").unwrap().collect();
//!
//! let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(words, vec!["the", "rust", "book", "2nd"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

const ALPHANUMERIC_RUN: &str = r"[\p{L}\p{N}]+";

/// Split on non-alphanumeric characters, then lowercase.
#[derive(Clone, Debug)]
pub struct SimpleAnalyzer {
    pipeline: PipelineAnalyzer,
}

impl SimpleAnalyzer {
    /// Create a new simple analyzer.
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(ALPHANUMERIC_RUN)?);
        let pipeline =
            PipelineAnalyzer::new("simple", tokenizer).then(Arc::new(LowercaseFilter::new()));

        Ok(SimpleAnalyzer { pipeline })
    }
}

impl Analyzer for SimpleAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}
