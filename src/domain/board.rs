//! In-memory task board
//!
//! [`TaskBoard`] holds one batch of tasks between a load and a save. Every
//! mutation that can touch the ordered set ends by dropping keys of tasks
//! outside it and renormalizing the rest, so the batch handed back to the
//! caller for persisting is always in normal form.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::id::TaskId;
use super::task::{Task, TaskStatus};
use crate::config::Config;
use crate::order::{normalize_keys, sort_by_order, OrderKey, OrderKeyError};

/// Version placeholder cleared when a task is closed
const VERSION_TBD: &str = "tbd";

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("Task summary is required")]
    EmptySummary,

    #[error("No task IDs specified")]
    NoTargets,

    #[error("No changes specified")]
    NoEdits,

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error(transparent)]
    Order(#[from] OrderKeyError),
}

/// Which tasks a listing includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    /// Tasks in the working order (`todo`, `wip`)
    #[default]
    Ordered,
    /// Everything not done or closed
    Open,
    /// Every task
    Everything,
}

impl ListFilter {
    pub fn includes(&self, status: TaskStatus) -> bool {
        match self {
            ListFilter::Ordered => status.is_ordered(),
            ListFilter::Open => status.is_open(),
            ListFilter::Everything => true,
        }
    }
}

/// Fields of a task to create
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub summary: String,
    /// Falls back to the configured default status
    pub status: Option<TaskStatus>,
    pub priority: Option<String>,
    pub goal: Option<String>,
    /// Falls back to the configured default version
    pub version: Option<String>,
    pub bodies: Vec<String>,
    pub edit_files: Vec<String>,
    pub read_files: Vec<String>,
    pub order: Option<OrderKey>,
}

impl NewTask {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_order(mut self, order: OrderKey) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_body(mut self, text: impl Into<String>) -> Self {
        self.bodies.push(text.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }
}

/// One change applied by [`TaskBoard::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEdit {
    Status(TaskStatus),
    Priority(String),
    Goal(String),
    Version(String),
    Body(String),
    AddEditFile(String),
    RemoveEditFile(String),
    AddReadFile(String),
    /// `None` clears the key
    Order(Option<OrderKey>),
}

impl TaskEdit {
    /// Parses an order assignment; `null` or an empty value clears the key
    pub fn order_from_str(value: &str) -> Result<Self, OrderKeyError> {
        let value = value.trim();
        if value == "null" {
            return Ok(TaskEdit::Order(None));
        }
        Ok(TaskEdit::Order(OrderKey::parse_optional(Some(value))?))
    }

    fn apply(&self, task: &mut Task) {
        match self {
            TaskEdit::Status(status) => task.set_status(*status),
            TaskEdit::Priority(priority) => task.set_priority(priority.clone()),
            TaskEdit::Goal(goal) => task.set_goal(goal.clone()),
            TaskEdit::Version(version) => task.set_version(version.clone()),
            TaskEdit::Body(text) => task.add_body(text.clone()),
            TaskEdit::AddEditFile(path) => task.add_edit_file(path.clone()),
            TaskEdit::RemoveEditFile(path) => task.remove_edit_file(path),
            TaskEdit::AddReadFile(path) => task.add_read_file(path.clone()),
            TaskEdit::Order(order) => task.set_order(order.clone()),
        }
    }
}

/// A batch of tasks with the operations that keep its order keys canonical
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    config: Config,
}

impl TaskBoard {
    /// Creates an empty board
    pub fn new(config: Config) -> Self {
        Self {
            tasks: Vec::new(),
            config,
        }
    }

    /// Wraps a loaded batch as-is; call [`renormalize`](Self::renormalize) to
    /// repair a batch written by something else
    pub fn from_tasks(tasks: Vec<Task>, config: Config) -> Self {
        Self { tasks, config }
    }

    /// Tasks in storage order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Hands the batch back for persisting
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Resolves every ID to an index before anything is touched
    fn resolve(&self, ids: &[TaskId]) -> Result<Vec<usize>, BoardError> {
        if ids.is_empty() {
            return Err(BoardError::NoTargets);
        }

        let mut indices = Vec::with_capacity(ids.len());
        for id in ids {
            let index = self
                .tasks
                .iter()
                .position(|t| &t.id == id)
                .ok_or(BoardError::NotFound(*id))?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(indices)
    }

    /// Creates a task and renormalizes the batch
    pub fn create(&mut self, new: NewTask) -> Result<&Task, BoardError> {
        let summary = new.summary.trim();
        if summary.is_empty() {
            return Err(BoardError::EmptySummary);
        }

        let id = TaskId::next_after(self.tasks.iter().map(|t| &t.id));
        let mut task = Task::new(id, summary);
        task.status = new
            .status
            .unwrap_or(self.config.tasks.default_status);
        task.priority = new.priority;
        task.goal = new.goal;
        task.version = Some(
            new.version
                .unwrap_or_else(|| self.config.tasks.default_version.clone()),
        );
        for text in new.bodies {
            task.add_body(text);
        }
        for path in new.edit_files {
            task.add_edit_file(path);
        }
        for path in new.read_files {
            task.add_read_file(path);
        }

        task.order = new.order;
        if task.clear_ineligible_order() {
            warn!(task = %id, status = %task.status, "ignoring order for a task outside the working order");
        }

        debug!(task = %id, status = %task.status, "created task");
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        self.renormalize();
        Ok(&self.tasks[index])
    }

    /// Applies `edits`, in order, to every task in `ids`
    ///
    /// An unknown ID or an empty edit list rejects the whole call before any
    /// task changes. Returns the number of tasks updated.
    pub fn update(&mut self, ids: &[TaskId], edits: &[TaskEdit]) -> Result<usize, BoardError> {
        let indices = self.resolve(ids)?;
        if edits.is_empty() {
            return Err(BoardError::NoEdits);
        }

        let assigns_order = edits
            .iter()
            .any(|edit| matches!(edit, TaskEdit::Order(Some(_))));

        for &index in &indices {
            let task = &mut self.tasks[index];
            for edit in edits {
                edit.apply(task);
            }
            if task.clear_ineligible_order() && assigns_order {
                warn!(task = %task.id, status = %task.status, "ignoring order for a task outside the working order");
            }
            debug!(task = %task.id, edits = edits.len(), "updated task");
        }

        self.renormalize();
        Ok(indices.len())
    }

    /// Marks tasks as done
    pub fn finish(&mut self, ids: &[TaskId]) -> Result<usize, BoardError> {
        self.update(ids, &[TaskEdit::Status(TaskStatus::Done)])
    }

    /// Closes tasks, optionally appending a closing note
    ///
    /// A version still at the `tbd` placeholder is cleared.
    pub fn close(&mut self, ids: &[TaskId], body: Option<&str>) -> Result<usize, BoardError> {
        let indices = self.resolve(ids)?;

        for &index in &indices {
            let task = &mut self.tasks[index];
            task.set_status(TaskStatus::Closed);
            if task.version.as_deref() == Some(VERSION_TBD) {
                task.version = None;
            }
            if let Some(text) = body {
                task.add_body(text);
            }
            debug!(task = %task.id, "closed task");
        }

        self.renormalize();
        Ok(indices.len())
    }

    /// Sets the release version of tasks
    pub fn release(&mut self, ids: &[TaskId], version: &str) -> Result<usize, BoardError> {
        self.update(ids, &[TaskEdit::Version(version.to_string())])
    }

    /// Lists tasks matching `filter`, in working order
    pub fn list(&self, filter: ListFilter) -> Vec<&Task> {
        sort_by_order(
            self.tasks.iter().filter(|t| filter.includes(t.status)),
            |t| t.order.as_ref(),
            |t| t.id.to_string(),
        )
    }

    /// Lists tasks with the configured default filter
    pub fn list_default(&self) -> Vec<&Task> {
        self.list(self.config.list.default_filter)
    }

    /// Drops keys outside the working order and renumbers the rest
    pub fn renormalize(&mut self) {
        for task in &mut self.tasks {
            if task.clear_ineligible_order() {
                debug!(task = %task.id, status = %task.status, "dropped order key");
            }
        }

        let keys: Vec<Option<OrderKey>> = self.tasks.iter().map(|t| t.order.clone()).collect();
        let mut changed = 0usize;
        for (task, key) in self.tasks.iter_mut().zip(normalize_keys(&keys)) {
            if task.order != key {
                task.order = key;
                changed += 1;
            }
        }

        debug!(tasks = self.tasks.len(), changed, "renormalized board");
    }
}
