//! Whitespace tokenizer implementation.

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(WhitespaceTokens {
            text: text.to_owned(),
            cursor: 0,
            position: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

struct WhitespaceTokens {
    text: String,
    cursor: usize,
    position: usize,
}

impl Iterator for WhitespaceTokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = &self.text[self.cursor..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = self.cursor + skipped;
        if start >= self.text.len() {
            self.cursor = self.text.len();
            return None;
        }

        let end = self.text[start..]
            .find(char::is_whitespace)
            .map_or(self.text.len(), |offset| start + offset);

        let token = Token::with_offsets(&self.text[start..end], self.position, start, end);
        self.cursor = end;
        self.position += 1;
        Some(token)
    }
}
