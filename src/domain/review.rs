//! Review requests
//!
//! A review is a question or proposal handed to someone else, answered in a
//! thread of notes. The first note is the description; later notes are
//! replies. Accepting a review can spawn tasks on a [`TaskBoard`], whose IDs
//! are recorded on the review.
//!
//! Reviews carry no order keys and never take part in normalization.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::board::{BoardError, NewTask, TaskBoard};
use super::id::{ReviewId, TaskId};
use super::task::{StatusError, TaskBody};

#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("Review title is required")]
    EmptyTitle,

    #[error("Review not found: {0}")]
    NotFound(ReviewId),

    #[error(transparent)]
    Task(#[from] BoardError),
}

/// Status of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Todo,
    Wip,
    /// Answered and waiting for the requester to look again
    Checking,
    /// Rejected
    Closed,
    /// Accepted
    Done,
    Pending,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 6] = [
        ReviewStatus::Todo,
        ReviewStatus::Wip,
        ReviewStatus::Checking,
        ReviewStatus::Closed,
        ReviewStatus::Done,
        ReviewStatus::Pending,
    ];

    /// Returns true until the review is accepted or rejected
    pub fn is_active(&self) -> bool {
        !matches!(self, ReviewStatus::Closed | ReviewStatus::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Todo => "todo",
            ReviewStatus::Wip => "wip",
            ReviewStatus::Checking => "checking",
            ReviewStatus::Closed => "closed",
            ReviewStatus::Done => "done",
            ReviewStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::UnknownReview(s.to_string()))
    }
}

/// A review request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,

    pub title: String,

    /// Text of the most recent note
    #[serde(default)]
    pub body: String,

    /// Description first, then replies
    #[serde(default)]
    pub bodies: Vec<TaskBody>,

    pub status: ReviewStatus,

    /// Tasks created when the review was accepted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_task_ids: Vec<TaskId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Creates a `todo` review whose description is `body`
    pub fn new(id: ReviewId, title: impl Into<String>, body: impl Into<String>) -> Self {
        let body = TaskBody::new(body);
        Self {
            id,
            title: title.into(),
            body: body.text.clone(),
            created_at: body.created_at,
            updated_at: body.created_at,
            bodies: vec![body],
            status: ReviewStatus::Todo,
            related_task_ids: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Appends a reply and makes it the current body
    pub fn add_body(&mut self, text: impl Into<String>) {
        let body = TaskBody::new(text);
        self.body = body.text.clone();
        self.bodies.push(body);
        self.touch();
    }

    /// The original description
    pub fn description(&self) -> &str {
        self.bodies
            .first()
            .map(|b| b.text.as_str())
            .unwrap_or(self.body.as_str())
    }

    /// Replies after the description, oldest first
    pub fn answers(&self) -> &[TaskBody] {
        self.bodies.get(1..).unwrap_or_default()
    }
}

/// A batch of reviews between a load and a save
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    reviews: Vec<Review>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self { reviews }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Returns a review with its full note history
    pub fn get(&self, id: &ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.id == id)
    }

    fn get_mut(&mut self, id: &ReviewId) -> Result<&mut Review, ReviewError> {
        self.reviews
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or(ReviewError::NotFound(*id))
    }

    /// Opens a review with the next free ID
    pub fn create(&mut self, title: &str, body: &str) -> Result<&Review, ReviewError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ReviewError::EmptyTitle);
        }

        let id = ReviewId::next_after(self.reviews.iter().map(|r| &r.id));
        debug!(review = %id, "created review");
        self.reviews.push(Review::new(id, title, body));
        let index = self.reviews.len() - 1;
        Ok(&self.reviews[index])
    }

    /// Reviews not yet accepted or rejected, in creation order
    pub fn list_active(&self) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|r| r.status.is_active())
            .collect()
    }

    /// Sets the status and appends a reply; an empty body is ignored
    ///
    /// Returns false if there was nothing to change.
    pub fn update(
        &mut self,
        id: &ReviewId,
        status: Option<ReviewStatus>,
        body: Option<&str>,
    ) -> Result<bool, ReviewError> {
        let review = self.get_mut(id)?;
        let body = body.filter(|b| !b.is_empty());
        if status.is_none() && body.is_none() {
            return Ok(false);
        }

        if let Some(status) = status {
            review.status = status;
        }
        if let Some(text) = body {
            review.add_body(text);
        }
        review.touch();
        debug!(review = %review.id, status = %review.status, "updated review");
        Ok(true)
    }

    /// Hands a review back to the requester, `checking` unless told otherwise
    pub fn return_review(
        &mut self,
        id: &ReviewId,
        status: Option<ReviewStatus>,
        body: Option<&str>,
    ) -> Result<bool, ReviewError> {
        self.update(id, Some(status.unwrap_or(ReviewStatus::Checking)), body)
    }

    /// Accepts a review, creating `new_tasks` on `tasks`
    ///
    /// Entries without a summary are skipped. The created IDs are appended
    /// to the review's related tasks and returned.
    pub fn accept(
        &mut self,
        id: &ReviewId,
        new_tasks: Vec<NewTask>,
        tasks: &mut TaskBoard,
    ) -> Result<Vec<TaskId>, ReviewError> {
        let review = self.get_mut(id)?;

        let mut created = Vec::new();
        for new in new_tasks {
            if new.summary.trim().is_empty() {
                warn!(review = %review.id, "skipping task without a summary");
                continue;
            }
            created.push(tasks.create(new)?.id);
        }

        review.related_task_ids.extend(created.iter().copied());
        review.status = ReviewStatus::Done;
        review.touch();
        debug!(review = %review.id, tasks = created.len(), "accepted review");
        Ok(created)
    }

    /// Rejects a review
    pub fn reject(&mut self, id: &ReviewId) -> Result<(), ReviewError> {
        let review = self.get_mut(id)?;
        review.status = ReviewStatus::Closed;
        review.touch();
        debug!(review = %review.id, "rejected review");
        Ok(())
    }
}
