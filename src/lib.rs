//! Task memory - hierarchical ordering for a local-first task list
//!
//! Tasks in the working states (`todo`, `wip`) carry order keys such as `1`,
//! `1-1` or `1-2.5`. The [`order`] module parses, compares, sorts and
//! normalizes those keys; [`domain::TaskBoard`] applies task edits and keeps
//! every key in normal form between a load and a save. Review requests live
//! on a [`domain::ReviewBoard`] and can spawn tasks when accepted.

pub mod config;
pub mod domain;
pub mod order;

pub use config::{Config, ConfigError};
pub use domain::{Review, ReviewBoard, ReviewId, ReviewStatus, Task, TaskBoard, TaskId, TaskStatus};
pub use order::{OrderKey, OrderKeyError};
