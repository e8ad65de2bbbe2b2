//! # Range Parsing and Formatting
//!
//! Price brackets are typed as free text. This module turns that text into
//! `(min, max)` pairs and back.
//!
//! ## Grammar (input is trimmed first)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quantity column                                                        │
//! │    ">= N"    → (N, 0)     at least N, no upper bound (N > 0)            │
//! │    "N - M"   → (N, M)     exactly two parts, N < M                      │
//! │    "N"       → (N, N)     N > 0                                         │
//! │                                                                         │
//! │  Price columns                                                          │
//! │    "N - M"   → (N, M)     exactly two parts, N < M                      │
//! │    "N"       → (N, N)     zero allowed                                  │
//! │                                                                         │
//! │  Display                                                                │
//! │    (0, 0)    → ""                                                       │
//! │    (N, N)    → "N"                                                      │
//! │    (N, 0)    → ">= N"                                                   │
//! │    (N, M)    → "N - M"                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Largest number accepted in a range. Storage keeps signed 64-bit integers.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

const AT_LEAST_PREFIX: &str = ">=";

/// An inclusive `(min, max)` pair. `max == 0` with `min > 0` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Range {
    pub min: u64,
    pub max: u64,
}

impl Range {
    /// Creates a range from both bounds.
    #[inline]
    pub const fn new(min: u64, max: u64) -> Self {
        Range { min, max }
    }

    /// A single value on both sides.
    #[inline]
    pub const fn exactly(value: u64) -> Self {
        Range {
            min: value,
            max: value,
        }
    }

    /// `value` or more, no upper bound.
    #[inline]
    pub const fn at_least(value: u64) -> Self {
        Range { min: value, max: 0 }
    }

    /// True when both bounds are zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            Ok(())
        } else if self.min == self.max {
            write!(f, "{}", self.min)
        } else if self.max == 0 {
            write!(f, "{} {}", AT_LEAST_PREFIX, self.min)
        } else {
            write!(f, "{} - {}", self.min, self.max)
        }
    }
}

/// Parses the quantity column.
///
/// ## Example
/// ```rust
/// use catalog_core::range::{parse_quantity_range, Range};
///
/// assert_eq!(parse_quantity_range(">= 100").unwrap(), Range::at_least(100));
/// assert_eq!(parse_quantity_range("10 - 20").unwrap(), Range::new(10, 20));
/// assert_eq!(parse_quantity_range("5").unwrap(), Range::exactly(5));
/// assert!(parse_quantity_range("0").is_err());
/// ```
pub fn parse_quantity_range(text: &str) -> ValidationResult<Range> {
    const FIELD: &str = "quantity";

    let text = non_empty(FIELD, text)?;

    if let Some(rest) = text.strip_prefix(AT_LEAST_PREFIX) {
        let min = parse_amount(FIELD, rest)?;
        if min == 0 {
            return Err(ValidationError::must_be_positive(FIELD));
        }
        return Ok(Range::at_least(min));
    }

    if text.contains('-') {
        return parse_two_sided(FIELD, text);
    }

    let value = parse_amount(FIELD, text)?;
    if value == 0 {
        return Err(ValidationError::must_be_positive(FIELD));
    }
    Ok(Range::exactly(value))
}

/// Parses one of the price columns. Zero is a valid price.
///
/// ## Example
/// ```rust
/// use catalog_core::range::{parse_price_range, Range};
///
/// assert_eq!(parse_price_range("5000").unwrap(), Range::exactly(5000));
/// assert_eq!(parse_price_range("0").unwrap(), Range::exactly(0));
/// assert!(parse_price_range("1 - 2 - 3").is_err());
/// ```
pub fn parse_price_range(text: &str) -> ValidationResult<Range> {
    const FIELD: &str = "price";

    let text = non_empty(FIELD, text)?;

    if text.contains('-') {
        return parse_two_sided(FIELD, text);
    }

    Ok(Range::exactly(parse_amount(FIELD, text)?))
}

fn non_empty<'a>(field: &str, text: &'a str) -> ValidationResult<&'a str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(text)
}

fn parse_two_sided(field: &str, text: &str) -> ValidationResult<Range> {
    let parts: Vec<&str> = text.split('-').collect();
    let [min, max] = parts.as_slice() else {
        return Err(ValidationError::invalid_format(
            field,
            "a range needs exactly one '-' between two numbers",
        ));
    };

    let min = parse_amount(field, min)?;
    let max = parse_amount(field, max)?;
    if min >= max {
        return Err(ValidationError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(Range::new(min, max))
}

/// Parses a non-negative whole number no larger than [`MAX_AMOUNT`].
pub(crate) fn parse_amount(field: &str, text: &str) -> ValidationResult<u64> {
    let text = text.trim();
    let value: u64 = text
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, format!("'{}' is not a number", text)))?;

    if value > MAX_AMOUNT {
        return Err(ValidationError::invalid_format(field, "number is too large"));
    }

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
