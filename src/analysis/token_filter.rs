//! Token filters: the stages after tokenization.
//!
//! A filter maps one [`TokenStream`] to another by wrapping it, so a whole
//! pipeline stays lazy.
//!
//! - [`lowercase::LowercaseFilter`] - Unicode lowercasing
//! - [`stop::StopFilter`] - drops (or marks) stop words
//!
//! ```
//! use pilum::analysis::token::Token;
//! use pilum::analysis::token_filter::Filter;
//! use pilum::analysis::token_filter::lowercase::LowercaseFilter;
//!
//! let input = vec![Token::new("Snapshot", 0), Token::new("ISOLATION", 1)];
//! let words: Vec<_> = LowercaseFilter::new()
//!     .filter(Box::new(input.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(words, vec!["snapshot", "isolation"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod lowercase;
pub mod stop;

/// One stage of an analysis pipeline.
pub trait Filter: Send + Sync {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Short identifier shown in debug output.
    fn name(&self) -> &'static str;
}
