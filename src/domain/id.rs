//! Task and review identifiers
//!
//! ID Formats:
//! - Task: `TASK-{n}` (e.g., `TASK-12`)
//! - Review: `REVIEW-{n}` (e.g., `REVIEW-3`)
//!
//! Both are numbered from 1 in creation order. A bare number is accepted
//! wherever an ID is parsed, so `12` and `TASK-12` name the same task.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of every displayed task ID
pub const TASK_PREFIX: &str = "TASK-";

/// Prefix of every displayed review ID
pub const REVIEW_PREFIX: &str = "REVIEW-";

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID format: expected 'TASK-{{n}}' or '{{n}}', got '{0}'")]
    InvalidTaskId(String),

    #[error("Invalid review ID format: expected 'REVIEW-{{n}}' or '{{n}}', got '{0}'")]
    InvalidReviewId(String),
}

/// Reads `{prefix}{n}` or a bare `{n}`
fn parse_number(s: &str, prefix: &str) -> Option<u64> {
    let digits = s.strip_prefix(prefix).unwrap_or(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Task ID in the format `TASK-{n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task ID from its number
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// Returns the numeric part of the ID
    pub fn number(&self) -> u64 {
        self.0
    }

    /// Returns the ID following the highest of `ids` (`TASK-1` if there are none)
    pub fn next_after<'a>(ids: impl IntoIterator<Item = &'a TaskId>) -> TaskId {
        let max = ids.into_iter().map(TaskId::number).max().unwrap_or(0);
        TaskId(max.saturating_add(1))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TASK_PREFIX, self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_number(s, TASK_PREFIX)
            .map(TaskId)
            .ok_or_else(|| IdError::InvalidTaskId(s.to_string()))
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

/// Review ID in the format `REVIEW-{n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewId(u64);

impl ReviewId {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    /// Returns the ID following the highest of `ids` (`REVIEW-1` if there are none)
    pub fn next_after<'a>(ids: impl IntoIterator<Item = &'a ReviewId>) -> ReviewId {
        let max = ids.into_iter().map(ReviewId::number).max().unwrap_or(0);
        ReviewId(max.saturating_add(1))
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", REVIEW_PREFIX, self.0)
    }
}

impl FromStr for ReviewId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_number(s, REVIEW_PREFIX)
            .map(ReviewId)
            .ok_or_else(|| IdError::InvalidReviewId(s.to_string()))
    }
}

impl TryFrom<String> for ReviewId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReviewId> for String {
    fn from(id: ReviewId) -> Self {
        id.to_string()
    }
}
