//! # Hierarchical Order Keys
//!
//! Order keys place tasks in a tree of siblings (`1`, `1-1`, `1-2`, `2`, ...).
//! This module is pure: no I/O and no shared state.
//!
//! | Piece | Purpose |
//! |-------|---------|
//! | [`parse_order`] / [`format_order`] | Text to segments and back |
//! | [`compare_keys`] / [`compare_orders`] | Hierarchical order, absent keys last |
//! | [`normalize_keys`] / [`normalize_orders`] | Renumber a batch into `1..N` per level |
//! | [`sort_by_order`] | Stable sort by key with an ID tie-break |
//!
//! ## Normal Form
//!
//! After normalization every segment is an integer starting at 1, each level
//! under each parent counts up without gaps, and keys that were ancestors of
//! one another still are.
//!
//! ```
//! use task_memory::order::normalize_orders;
//!
//! let out = normalize_orders(&[Some("1"), Some("1-3"), None, Some("4")]).unwrap();
//! assert_eq!(
//!     out,
//!     [Some("1".to_string()), Some("1-1".to_string()), None, Some("2".to_string())]
//! );
//! ```

mod compare;
mod key;
mod normalize;
mod sort;

pub use compare::{compare_keys, compare_orders};
pub use key::{format_order, parse_order, OrderKey, OrderKeyError, Segment, SEPARATOR};
pub use normalize::{normalize_keys, normalize_orders};
pub use sort::sort_by_order;
