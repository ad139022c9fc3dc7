//! Renumbering of order keys into canonical form
//!
//! Normalization relabels a batch of keys so that every level counts
//! `1, 2, 3, ...` without gaps or fractions, while keeping every parent/child
//! relationship and every relative position.
//!
//! The keys are loaded into a prefix tree. Each node is a scope: the siblings
//! under one original parent prefix. A node's children are the distinct
//! segment values seen at that level, both from keys ending there and from
//! deeper keys passing through (an implicit ancestor with no task of its own
//! still holds its slot). Children are kept sorted, so a child's rank among
//! its siblings is its new label. Because scopes are keyed by the original
//! prefix, two parents that end up with coinciding labels never share a
//! scope, and a descendant is always renumbered through the same scopes as
//! its ancestors.
//!
//! ```text
//! input          tree                  output
//! 1              1 ─┬─ 1               1
//! 1-1               ├─ 2 ── 1          1-1
//! 1-2-1             └─ 4               1-2-1
//! 1-4            2                     1-3
//! 2              3 ─── 2               2
//! 3-2                                  3-1
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::key::{OrderKey, OrderKeyError, Segment};

/// Siblings sharing one original parent prefix
#[derive(Debug, Default)]
struct Scope {
    /// Distinct child positions in ascending order
    children: BTreeMap<Segment, Scope>,
    /// Input indices whose key ends at this node
    entries: Vec<usize>,
}

impl Scope {
    /// Registers a key path, creating implicit ancestors along the way
    fn insert(&mut self, path: &[Segment], index: usize) {
        let mut node = self;
        for segment in path {
            node = node.children.entry(*segment).or_default();
        }
        node.entries.push(index);
    }
}

/// Normalizes a batch of optional keys
///
/// The output has the same length as the input and is index-aligned with it.
/// Absent entries stay absent; identical keys stay identical.
pub fn normalize_keys(keys: &[Option<OrderKey>]) -> Vec<Option<OrderKey>> {
    let mut root = Scope::default();
    for (index, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            root.insert(key.segments(), index);
        }
    }

    let mut normalized = vec![None; keys.len()];
    let mut scopes = 0usize;

    // Explicit stack: key depth is unbounded
    let mut pending = vec![(&root, Vec::new())];
    while let Some((scope, prefix)) = pending.pop() {
        if scope.children.is_empty() {
            continue;
        }
        scopes += 1;

        for (rank, child) in scope.children.values().enumerate() {
            let mut path = prefix.clone();
            path.push(Segment::integer(rank as u64 + 1));

            for &index in &child.entries {
                normalized[index] = OrderKey::from_segments(path.clone());
            }
            pending.push((child, path));
        }
    }

    debug!(
        keys = keys.len(),
        present = keys.iter().filter(|k| k.is_some()).count(),
        scopes,
        "normalized order keys"
    );

    normalized
}

/// Normalizes a batch of optional key strings
///
/// Empty strings are treated as absent and come back as `None`. Every entry
/// is validated before any renumbering, so one malformed key rejects the
/// whole batch.
pub fn normalize_orders<S: AsRef<str>>(
    orders: &[Option<S>],
) -> Result<Vec<Option<String>>, OrderKeyError> {
    let keys = orders
        .iter()
        .map(|order| OrderKey::parse_optional(order.as_ref().map(|s| s.as_ref())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(normalize_keys(&keys)
        .into_iter()
        .map(|key| key.map(|key| key.to_string()))
        .collect())
}
