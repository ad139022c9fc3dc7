//! Sorting items by order key

use std::cmp::Ordering;

use super::compare::compare_keys;
use super::key::OrderKey;

/// The digits embedded in an identifier, read as one non-negative integer
///
/// `TASK-12` reads as 12 and an identifier without digits reads as 0. Digits
/// are kept as text so arbitrarily long runs compare exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdNumber(String);

impl IdNumber {
    fn extract(id: &str) -> Self {
        let digits: String = id.chars().filter(char::is_ascii_digit).collect();
        Self(digits.trim_start_matches('0').to_string())
    }
}

impl Ord for IdNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for IdNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sorts items by order key, breaking ties by the number in their identifier
///
/// Items without a key come last. Items with equal keys and equal identifier
/// numbers keep their input order. Pass `slice.iter()` to sort references
/// and leave the original collection untouched.
///
/// ```
/// use task_memory::order::{sort_by_order, OrderKey};
///
/// let tasks = vec![
///     ("TASK-2", Some(OrderKey::top(1))),
///     ("TASK-1", None),
///     ("TASK-3", "1-1".parse().ok()),
/// ];
/// let sorted = sort_by_order(tasks.iter(), |t| t.1.as_ref(), |t| t.0);
/// let ids: Vec<_> = sorted.iter().map(|t| t.0).collect();
/// assert_eq!(ids, ["TASK-2", "TASK-3", "TASK-1"]);
/// ```
pub fn sort_by_order<T, It, K, I, S>(items: It, key_of: K, id_of: I) -> Vec<T>
where
    It: IntoIterator<Item = T>,
    K: Fn(&T) -> Option<&OrderKey>,
    I: Fn(&T) -> S,
    S: AsRef<str>,
{
    let mut decorated: Vec<(IdNumber, T)> = items
        .into_iter()
        .map(|item| (IdNumber::extract(id_of(&item).as_ref()), item))
        .collect();

    // `sort_by` is stable
    decorated.sort_by(|(a_id, a), (b_id, b)| {
        compare_keys(key_of(a), key_of(b)).then_with(|| a_id.cmp(b_id))
    });

    decorated.into_iter().map(|(_, item)| item).collect()
}
