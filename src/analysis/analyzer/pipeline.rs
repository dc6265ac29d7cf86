//! An analyzer assembled from a tokenizer and an ordered filter chain.
//!
//! ```
//! use std::sync::Arc;
//! use pilum::analysis::analyzer::analyzer::Analyzer;
//! use pilum::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use pilum::analysis::token_filter::lowercase::LowercaseFilter;
//! use pilum::analysis::token_filter::stop::StopFilter;
//! use pilum::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new("titles", Arc::new(RegexTokenizer::new().unwrap()))
//!     .then(Arc::new(LowercaseFilter::new()))
//!     .then(Arc::new(StopFilter::from_words(vec!["of"])));
//!
//! let words: Vec<_> = analyzer
//!     .analyze("Lord OF the Rings")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(words, vec!["lord", "the", "rings"]);
//! assert_eq!(analyzer.name(), "titles");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Tokenizer output threaded through each filter in turn.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    name: &'static str,
    tokenizer: Arc<dyn Tokenizer>,
    stages: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    pub fn new(name: &'static str, tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name,
            tokenizer,
            stages: Vec::new(),
        }
    }

    /// Append a filter stage.
    pub fn then(mut self, filter: Arc<dyn Filter>) -> Self {
        self.stages.push(filter);
        self
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn stages(&self) -> &[Arc<dyn Filter>] {
        &self.stages
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.stages
            .iter()
            .try_fold(self.tokenizer.tokenize(text)?, |tokens, stage| {
                stage.filter(tokens)
            })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field("stages", &stages)
            .finish()
    }
}
