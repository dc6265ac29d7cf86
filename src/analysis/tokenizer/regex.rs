//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{PilumError, Result};

/// A regex-based tokenizer that extracts every match of a pattern as a token.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default pattern.
    ///
    /// The default pattern `r"\w+"` matches sequences of word characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| PilumError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(RegexTokens {
            pattern: Arc::clone(&self.pattern),
            text: text.to_owned(),
            cursor: 0,
            position: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

struct RegexTokens {
    pattern: Arc<Regex>,
    text: String,
    cursor: usize,
    position: usize,
}

impl Iterator for RegexTokens {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.cursor > self.text.len() {
                return None;
            }
            let mat = self.pattern.find_at(&self.text, self.cursor)?;

            // Step past empty matches so the scan always advances.
            if mat.is_empty() {
                self.cursor = self.text[mat.end()..]
                    .chars()
                    .next()
                    .map_or(self.text.len() + 1, |c| mat.end() + c.len_utf8());
                continue;
            }

            self.cursor = mat.end();
            let token = Token::with_offsets(mat.as_str(), self.position, mat.start(), mat.end());
            self.position += 1;
            return Some(token);
        }
    }
}
