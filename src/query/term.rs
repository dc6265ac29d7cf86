//! Term query implementation for exact term matching.

use std::fmt;

/// A query that matches documents containing a specific term.
///
/// The term is matched exactly and is not analyzed. For text fields, pass
/// the normalized form the field's analyzer produces (e.g. lowercased); for
/// keyword fields, the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    field: String,
    term: String,
}

impl TermQuery {
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl fmt::Display for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.term.is_empty() || self.term.contains(char::is_whitespace) {
            write!(f, "{}:\"{}\"", self.field, self.term)
        } else {
            write!(f, "{}:{}", self.field, self.term)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_query() {
        let query = TermQuery::new("contents", "run");
        assert_eq!(query.field(), "contents");
        assert_eq!(query.term(), "run");
        assert_eq!(query.to_string(), "contents:run");
        assert_eq!(
            TermQuery::new("title", "Rust Book").to_string(),
            "title:\"Rust Book\""
        );
    }
}
