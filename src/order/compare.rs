//! Total order over optional order keys
//!
//! Present keys compare hierarchically (see [`OrderKey`]); an absent key sorts
//! after every present key, and two absent keys are equal. Equal keys are not
//! tie-broken here; [`sort_by_order`](super::sort_by_order) adds the
//! identifier tie-break.

use std::cmp::Ordering;

use super::key::{OrderKey, OrderKeyError};

/// Compares two optional keys, absent last
pub fn compare_keys(a: Option<&OrderKey>, b: Option<&OrderKey>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compares two optional key strings
///
/// Empty strings count as absent. Malformed keys are reported instead of
/// being given an arbitrary position.
pub fn compare_orders(a: Option<&str>, b: Option<&str>) -> Result<Ordering, OrderKeyError> {
    let a = OrderKey::parse_optional(a)?;
    let b = OrderKey::parse_optional(b)?;
    Ok(compare_keys(a.as_ref(), b.as_ref()))
}
