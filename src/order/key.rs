//! Order keys and their segments
//!
//! Key format: numeric segments joined by `-`
//! - Top-level positions: `1`, `2`, `3`
//! - Children of `1`: `1-1`, `1-2`
//! - A fractional segment slots between neighbours until the next
//!   normalization: `1-2.5` sits between `1-2` and `1-3`
//!
//! Segments are exact decimals held as scaled integers, never binary floats,
//! so chains of insertions like `1.5`, `1.25`, `1.125` compare exactly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between the levels of an order key
pub const SEPARATOR: &str = "-";

/// Maximum number of significant fractional digits in a segment
const MAX_SCALE: u32 = 18;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderKeyError {
    #[error("Order key is empty")]
    Empty,

    #[error("Invalid order segment '{segment}' in '{key}': expected a non-negative number such as 2 or 1.5")]
    InvalidSegment { key: String, segment: String },

    #[error("Order segment '{segment}' in '{key}' is too large or too precise")]
    OutOfRange { key: String, segment: String },
}

/// One level of an order key, valued `units / 10^scale`
///
/// Trailing fractional zeros are stripped when parsing, so `1.50` and `1.5`
/// (or `2.0` and `2`) are the same segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    units: u64,
    scale: u32,
}

impl Segment {
    /// Creates an integer segment
    pub const fn integer(value: u64) -> Self {
        Self {
            units: value,
            scale: 0,
        }
    }

    /// Returns true if the segment has no fractional part
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    /// Returns the integer value, or None for fractional segments
    pub fn as_integer(&self) -> Option<u64> {
        self.is_integer().then_some(self.units)
    }

    /// Value scaled up to `scale` fractional digits (`scale >= self.scale`)
    fn widened(&self, scale: u32) -> u128 {
        u128::from(self.units) * 10u128.pow(scale - self.scale)
    }

    /// Parses one segment; `key` is the full key, used for error messages
    fn parse_in(key: &str, text: &str) -> Result<Self, OrderKeyError> {
        let invalid = || OrderKeyError::InvalidSegment {
            key: key.to_string(),
            segment: text.to_string(),
        };
        let out_of_range = || OrderKeyError::OutOfRange {
            key: key.to_string(),
            segment: text.to_string(),
        };

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text, None),
        };

        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || fraction.is_some_and(|f| !is_digits(f)) {
            return Err(invalid());
        }

        let fraction = fraction.map(|f| f.trim_end_matches('0')).unwrap_or("");
        if fraction.len() > MAX_SCALE as usize {
            return Err(out_of_range());
        }

        let mut units: u64 = 0;
        for digit in whole.bytes().chain(fraction.bytes()) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(u64::from(digit - b'0')))
                .ok_or_else(out_of_range)?;
        }

        Ok(Self {
            units,
            scale: fraction.len() as u32,
        })
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.widened(scale).cmp(&other.widened(scale))
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let divisor = 10u64.pow(self.scale);
        write!(
            f,
            "{}.{:0width$}",
            self.units / divisor,
            self.units % divisor,
            width = self.scale as usize
        )
    }
}

impl FromStr for Segment {
    type Err = OrderKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_in(s, s.trim())
    }
}

/// Parses an order key into its segments
///
/// Empty (or all-whitespace) input yields no segments. Any malformed segment
/// rejects the whole key.
pub fn parse_order(text: &str) -> Result<Vec<Segment>, OrderKeyError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(SEPARATOR)
        .map(|part| Segment::parse_in(text, part))
        .collect()
}

/// Formats segments back into key text (`[]` formats as `""`)
pub fn format_order(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::to_string)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// A present order key: a non-empty path of segments
///
/// Ordering is hierarchical: segments compare numerically left to right and
/// a key sorts before every key it is a prefix of, so
/// `1 < 1-1 < 1-2 < 1-10 < 2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey {
    segments: Vec<Segment>,
}

impl OrderKey {
    /// Parses a present key; empty input is an error
    pub fn parse(text: &str) -> Result<Self, OrderKeyError> {
        Self::from_segments(parse_order(text)?).ok_or(OrderKeyError::Empty)
    }

    /// Parses an optional key, treating `None` and empty text alike as absent
    pub fn parse_optional(text: Option<&str>) -> Result<Option<Self>, OrderKeyError> {
        match text {
            Some(text) => Ok(Self::from_segments(parse_order(text)?)),
            None => Ok(None),
        }
    }

    /// Wraps a segment path, or None if the path is empty
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        (!segments.is_empty()).then_some(Self { segments })
    }

    /// Creates a top-level key with an integer position
    pub fn top(position: u64) -> Self {
        Self {
            segments: vec![Segment::integer(position)],
        }
    }

    /// Returns the segments, outermost first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of levels in the key (`1-2-3` has depth 3)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the last segment, the position among siblings
    pub fn position(&self) -> Segment {
        // Non-empty by construction
        self.segments[self.segments.len() - 1]
    }

    /// Returns the parent key, or None for a top-level key
    pub fn parent(&self) -> Option<OrderKey> {
        Self::from_segments(self.segments[..self.segments.len() - 1].to_vec())
    }

    /// Creates a child key one level below this one
    pub fn child(&self, position: Segment) -> OrderKey {
        let mut segments = self.segments.clone();
        segments.push(position);
        OrderKey { segments }
    }

    /// Returns true if this key is a strict prefix of `other`
    pub fn is_ancestor_of(&self, other: &OrderKey) -> bool {
        self.depth() < other.depth() && other.segments.starts_with(&self.segments)
    }

    /// Returns true if every segment is an integer of at least 1
    pub fn is_canonical(&self) -> bool {
        self.segments
            .iter()
            .all(|s| s.as_integer().is_some_and(|n| n >= 1))
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_order(&self.segments))
    }
}

impl FromStr for OrderKey {
    type Err = OrderKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderKey {
    type Error = OrderKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.to_string()
    }
}
