//! Numeric range queries over point fields.

use std::fmt;

/// Matches documents with a numeric value in `[low, high]`, both inclusive.
///
/// A range with `low > high`, or with a NaN bound, matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    field: String,
    low: f64,
    high: f64,
}

impl RangeQuery {
    pub fn new<S: Into<String>>(field: S, low: f64, high: f64) -> Self {
        RangeQuery {
            field: field.into(),
            low,
            high,
        }
    }

    /// Match documents whose value equals `value` exactly.
    pub fn exact<S: Into<String>>(field: S, value: f64) -> Self {
        Self::new(field, value, value)
    }

    /// All values at or above `low`.
    pub fn at_least<S: Into<String>>(field: S, low: f64) -> Self {
        Self::new(field, low, f64::INFINITY)
    }

    /// All values at or below `high`.
    pub fn at_most<S: Into<String>>(field: S, high: f64) -> Self {
        Self::new(field, f64::NEG_INFINITY, high)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether the bounds select no value at all.
    pub fn is_empty_range(&self) -> bool {
        self.low.is_nan() || self.high.is_nan() || self.low > self.high
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

impl fmt::Display for RangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |value: f64| {
            if value == f64::NEG_INFINITY || value == f64::INFINITY {
                "*".to_string()
            } else {
                value.to_string()
            }
        };
        write!(
            f,
            "{}:[{} TO {}]",
            self.field,
            bound(self.low),
            bound(self.high)
        )
    }
}
