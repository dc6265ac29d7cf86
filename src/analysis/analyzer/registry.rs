//! Per-field analyzer registry.
//!
//! The registry maps field names to analysis pipelines and falls back to a
//! default pipeline for unmapped fields. It is a plain lookup plus an
//! `Arc<dyn Analyzer>`; there is no analyzer hierarchy to walk.
//!
//! ```
//! use std::sync::Arc;
//! use pilum::analysis::analyzer::registry::AnalyzerRegistry;
//! use pilum::analysis::analyzer::simple::SimpleAnalyzer;
//!
//! let registry = AnalyzerRegistry::default()
//!     .with_analyzer("title", Arc::new(SimpleAnalyzer::new().unwrap()));
//!
//! // "title" keeps stop words, everything else uses the standard analyzer.
//! let title: Vec<_> = registry.analyze("title", "The Book").unwrap().map(|t| t.text).collect();
//! let body: Vec<_> = registry.analyze("body", "The Book").unwrap().map(|t| t.text).collect();
//! assert_eq!(title, vec!["the", "book"]);
//! assert_eq!(body, vec!["book"]);
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};

use ahash::AHashMap;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::analyzer::simple::SimpleAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;
use crate::analysis::token::TokenStream;
use crate::error::{PilumError, Result};

/// Shared standard analyzer backing every default registry.
///
/// Construction only fails on an invalid tokenizer pattern, which the fixed
/// `\w+` pattern never is; a failure leaves default registries without a
/// fallback so lookups report `UnknownFieldKind`.
static STANDARD_ANALYZER: LazyLock<Option<Arc<dyn Analyzer>>> =
    LazyLock::new(|| match StandardAnalyzer::new() {
        Ok(analyzer) => Some(Arc::new(analyzer)),
        Err(e) => {
            log::error!("standard analyzer unavailable: {e}");
            None
        }
    });

/// Maps field names to analyzers, with an optional default.
#[derive(Clone)]
pub struct AnalyzerRegistry {
    /// Analyzer for fields not in the map.
    default_analyzer: Option<Arc<dyn Analyzer>>,

    /// Field-specific analyzers.
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    /// Create a registry with the given default analyzer.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        AnalyzerRegistry {
            default_analyzer: Some(default_analyzer),
            field_analyzers: AHashMap::new(),
        }
    }

    /// Create a registry with no fallback.
    ///
    /// Analyzing an unmapped field through it fails with `UnknownFieldKind`.
    pub fn without_default() -> Self {
        AnalyzerRegistry {
            default_analyzer: None,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Add a field-specific analyzer, replacing any previous mapping.
    pub fn add_analyzer(&mut self, field: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Builder-style variant of [`add_analyzer`](Self::add_analyzer).
    pub fn with_analyzer(mut self, field: impl Into<String>, analyzer: Arc<dyn Analyzer>) -> Self {
        self.add_analyzer(field, analyzer);
        self
    }

    /// Get the default analyzer, if any.
    pub fn default_analyzer(&self) -> Option<&Arc<dyn Analyzer>> {
        self.default_analyzer.as_ref()
    }

    /// Resolve the analyzer for a field.
    pub fn resolve(&self, field: &str) -> Result<&Arc<dyn Analyzer>> {
        self.field_analyzers
            .get(field)
            .or(self.default_analyzer.as_ref())
            .ok_or_else(|| {
                PilumError::unknown_field_kind(format!("no analyzer resolvable for field '{field}'"))
            })
    }

    /// Analyze text with the analyzer for the given field.
    pub fn analyze(&self, field: &str, text: &str) -> Result<TokenStream> {
        self.resolve(field)?.analyze(text)
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        AnalyzerRegistry {
            default_analyzer: STANDARD_ANALYZER.clone(),
            field_analyzers: AHashMap::new(),
        }
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<(&str, &str)> = self
            .field_analyzers
            .iter()
            .map(|(field, analyzer)| (field.as_str(), analyzer.name()))
            .collect();
        fields.sort_unstable();

        f.debug_struct("AnalyzerRegistry")
            .field("default", &self.default_analyzer.as_ref().map(|a| a.name()))
            .field("fields", &fields)
            .finish()
    }
}

/// Build one of the bundled analyzers by name.
///
/// Recognized names are `standard`, `simple`, `whitespace` and `keyword`.
pub fn analyzer_by_name(name: &str) -> Result<Arc<dyn Analyzer>> {
    let analyzer: Arc<dyn Analyzer> = match name {
        "standard" => Arc::new(StandardAnalyzer::new()?),
        "simple" => Arc::new(SimpleAnalyzer::new()?),
        "whitespace" => Arc::new(WhitespaceAnalyzer::new()),
        "keyword" => Arc::new(KeywordAnalyzer::new()),
        other => {
            return Err(PilumError::invalid_argument(format!(
                "unknown analyzer '{other}' (expected standard, simple, whitespace or keyword)"
            )));
        }
    };
    Ok(analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_field_dispatch() {
        let mut registry = AnalyzerRegistry::default();
        registry.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        let tokens: Vec<_> = registry.analyze("title", "Hello World").unwrap().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");

        let tokens: Vec<_> = registry.analyze("id", "Hello World").unwrap().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "Hello World");
    }

    #[test]
    fn test_default_falls_back_to_standard() {
        let registry = AnalyzerRegistry::default();
        assert_eq!(registry.resolve("anything").unwrap().name(), "standard");
        assert_eq!(registry.default_analyzer().map(|a| a.name()), Some("standard"));

        let words: Vec<_> = registry
            .analyze("body", "The Snapshot")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(words, vec!["snapshot"]);
    }

    #[test]
    fn test_without_default() {
        let registry = AnalyzerRegistry::without_default()
            .with_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        assert!(registry.resolve("id").is_ok());
        assert!(matches!(
            registry.analyze("body", "text"),
            Err(PilumError::UnknownFieldKind(_))
        ));
    }

    #[test]
    fn test_analyzer_by_name() {
        for name in ["standard", "simple", "whitespace", "keyword"] {
            assert_eq!(analyzer_by_name(name).unwrap().name(), name);
        }
        assert!(analyzer_by_name("english").is_err());
    }

    #[test]
    fn test_debug_lists_fields() {
        let registry =
            AnalyzerRegistry::default().with_analyzer("id", Arc::new(KeywordAnalyzer::new()));
        let debug = format!("{registry:?}");
        assert!(debug.contains("standard"));
        assert!(debug.contains("keyword"));
    }
}
