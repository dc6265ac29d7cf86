//! Analyzer implementations that combine tokenizers and filters.
//!
//! - [`standard::StandardAnalyzer`] - Word tokenizer, lowercase, English stop words (the default)
//! - [`simple::SimpleAnalyzer`] - Split on non-alphanumerics, lowercase
//! - [`whitespace::WhitespaceAnalyzer`] - Split on whitespace, lowercase
//! - [`keyword::KeywordAnalyzer`] - Entire input as one token
//! - [`pipeline::PipelineAnalyzer`] - Any tokenizer plus a filter chain
//! - [`registry::AnalyzerRegistry`] - Per-field analyzer dispatch

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod keyword;
pub mod pipeline;
pub mod registry;
pub mod simple;
pub mod standard;
pub mod whitespace;

pub use analyzer::Analyzer;
