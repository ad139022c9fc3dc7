//! Domain models for task memory
//!
//! Tasks, reviews, their identifiers, and the in-memory boards that hold
//! them. The task board keeps order keys canonical. No I/O happens here.

mod board;
mod id;
mod review;
mod task;

pub use board::{BoardError, ListFilter, NewTask, TaskBoard, TaskEdit};
pub use id::{IdError, ReviewId, TaskId, REVIEW_PREFIX, TASK_PREFIX};
pub use review::{Review, ReviewBoard, ReviewError, ReviewStatus};
pub use task::{StatusError, Task, TaskBody, TaskFiles, TaskStatus};
