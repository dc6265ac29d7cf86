//! Text analysis module for Pilum.
//!
//! This module provides tokenization, token filtering and the per-field
//! analyzer registry used by the index writer for `Text` fields.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use analyzer::registry::AnalyzerRegistry;
pub use token::{Token, TokenStream};
