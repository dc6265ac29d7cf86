//! Tokenizers: the first stage of an analysis pipeline.
//!
//! A tokenizer turns field text into a lazy [`TokenStream`]. The stream owns
//! a copy of the input, so it can outlive the borrowed text.
//!
//! - [`regex::RegexTokenizer`] - one token per regex match, `\w+` by default
//! - [`whitespace::WhitespaceTokenizer`] - runs of non-whitespace
//!
//! ```
//! use pilum::analysis::tokenizer::Tokenizer;
//! use pilum::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let count = WhitespaceTokenizer::new().tokenize("split  on\tspaces").unwrap().count();
//! assert_eq!(count, 3);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod regex;
pub mod whitespace;

/// Splits text into tokens. Shared across indexing threads.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Short identifier shown in debug output.
    fn name(&self) -> &'static str;
}
