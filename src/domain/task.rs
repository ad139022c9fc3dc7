//! Task domain model
//!
//! Tasks move through a closed set of lifecycle states. Only `todo` and `wip`
//! tasks take part in ordering; leaving those states drops the order key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::id::TaskId;
use crate::order::OrderKey;

#[derive(Debug, Error, PartialEq)]
pub enum StatusError {
    #[error("Invalid status '{0}'. Allowed: todo, wip, done, pending, long, closed")]
    Unknown(String),

    #[error("Invalid review status '{0}'. Allowed: todo, wip, checking, closed, done, pending")]
    UnknownReview(String),
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    /// Work in progress
    Wip,
    Done,
    /// Waiting on something outside the task
    Pending,
    /// Long-running, parked outside the working order
    Long,
    Closed,
}

impl TaskStatus {
    /// Every status, in lifecycle order
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Todo,
        TaskStatus::Wip,
        TaskStatus::Done,
        TaskStatus::Pending,
        TaskStatus::Long,
        TaskStatus::Closed,
    ];

    /// Returns true if tasks in this status carry an order key
    pub fn is_ordered(&self) -> bool {
        matches!(self, TaskStatus::Todo | TaskStatus::Wip)
    }

    /// Returns true if this status ends the task's life
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Closed)
    }

    /// Returns true if the task still needs attention at some point
    pub fn is_open(&self) -> bool {
        !self.is_finished()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Wip => "wip",
            TaskStatus::Done => "done",
            TaskStatus::Pending => "pending",
            TaskStatus::Long => "long",
            TaskStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::Unknown(s.to_string()))
    }
}

/// A timestamped note appended to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBody {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TaskBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Files a task works on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFiles {
    /// Files read for context
    #[serde(default)]
    pub read: Vec<String>,

    /// Files being edited
    #[serde(default)]
    pub edit: Vec<String>,
}

impl TaskFiles {
    /// Adds a file to read, returning false if already listed
    pub fn add_read(&mut self, path: impl Into<String>) -> bool {
        push_unique(&mut self.read, path.into())
    }

    /// Adds a file to edit, returning false if already listed
    pub fn add_edit(&mut self, path: impl Into<String>) -> bool {
        push_unique(&mut self.edit, path.into())
    }

    /// Removes a file from the edit list, returning true if it was there
    pub fn remove_edit(&mut self, path: &str) -> bool {
        let len_before = self.edit.len();
        self.edit.retain(|p| p != path);
        self.edit.len() != len_before
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.edit.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, path: String) -> bool {
    if list.contains(&path) {
        false
    } else {
        list.push(path);
        true
    }
}

/// Reads a stored order, treating `null` and `""` alike as no order
fn deserialize_order<'de, D>(deserializer: D) -> Result<Option<OrderKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    OrderKey::parse_optional(raw.as_deref()).map_err(serde::de::Error::custom)
}

/// A task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Current status
    pub status: TaskStatus,

    /// One-line description
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// What "done" looks like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Release the task ships in (`tbd` until known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Notes, oldest first
    #[serde(default)]
    pub bodies: Vec<TaskBody>,

    #[serde(default)]
    pub files: TaskFiles,

    /// Position in the working order; only set while the status is ordered
    #[serde(default, deserialize_with = "deserialize_order")]
    pub order: Option<OrderKey>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `todo` task with the given ID and summary
    pub fn new(id: TaskId, summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: TaskStatus::Todo,
            summary: summary.into(),
            priority: None,
            goal: None,
            version: None,
            bodies: Vec::new(),
            files: TaskFiles::default(),
            order: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the task as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Changes the status, dropping the order key when leaving the ordered states
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.clear_ineligible_order();
        self.touch();
    }

    /// Sets or clears the order key
    ///
    /// The key is kept only while the status is ordered; see
    /// [`clear_ineligible_order`](Self::clear_ineligible_order).
    pub fn set_order(&mut self, order: Option<OrderKey>) {
        self.order = order;
        self.touch();
    }

    /// Clears the order key if the status does not take part in ordering
    ///
    /// Returns true if a key was removed.
    pub fn clear_ineligible_order(&mut self) -> bool {
        if !self.status.is_ordered() && self.order.is_some() {
            self.order = None;
            true
        } else {
            false
        }
    }

    pub fn set_priority(&mut self, priority: impl Into<String>) {
        self.priority = Some(priority.into());
        self.touch();
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = Some(goal.into());
        self.touch();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
        self.touch();
    }

    /// Appends a note
    pub fn add_body(&mut self, text: impl Into<String>) {
        self.bodies.push(TaskBody::new(text));
        self.touch();
    }

    /// Returns the most recent note
    pub fn latest_body(&self) -> Option<&TaskBody> {
        self.bodies.last()
    }

    pub fn add_edit_file(&mut self, path: impl Into<String>) {
        if self.files.add_edit(path) {
            self.touch();
        }
    }

    pub fn remove_edit_file(&mut self, path: &str) {
        if self.files.remove_edit(path) {
            self.touch();
        }
    }

    pub fn add_read_file(&mut self, path: impl Into<String>) {
        if self.files.add_read(path) {
            self.touch();
        }
    }
}
