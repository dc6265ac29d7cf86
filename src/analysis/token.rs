//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline, and a
//! [`TokenStream`] is a boxed iterator of tokens. Streams are produced lazily:
//! tokenizers yield tokens on demand and filters wrap the upstream iterator.
//!
//! ```
//! use pilum::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert!(!token.is_stopped());
//! ```

use std::fmt;

/// One term candidate cut from a field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,

    /// 0-based index in the tokenizer's output.
    pub position: usize,

    /// Byte range `start_offset..end_offset` in the analyzed text.
    pub start_offset: usize,
    pub end_offset: usize,

    /// Whether this token has been marked as stopped by a filter.
    ///
    /// Stopped tokens keep their position but produce no postings.
    pub stopped: bool,
}

impl Token {
    /// A token spanning the whole of `text`.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
            stopped: false,
        }
    }

    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.text, self.position)
    }
}

/// Lazily produced tokens, owned by the stream.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;
