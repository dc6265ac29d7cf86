//! Whitespace analyzer: split on whitespace, then lowercase.
//!
//! This is the minimal pipeline: punctuation stays attached to words.

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Whitespace tokenizer followed by lowercasing.
#[derive(Clone, Debug)]
pub struct WhitespaceAnalyzer {
    pipeline: PipelineAnalyzer,
}

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        let pipeline = PipelineAnalyzer::new("whitespace", Arc::new(WhitespaceTokenizer::new()))
            .then(Arc::new(LowercaseFilter::new()));

        WhitespaceAnalyzer { pipeline }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.pipeline.analyze(text)
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
