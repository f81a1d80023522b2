#![forbid(unsafe_code)]

//! Cascade resolution: locate a value in an option tree and rebuild the
//! columns and active path that lead to it.
//!
//! # Algorithm
//!
//! [`locate`] runs a depth-first, pre-order search. At each level the
//! siblings are visited in order; a sibling is compared against the target
//! before its children are searched, and the first successful branch stops
//! the iteration at every level above it. The search records the sibling
//! index of each hop in an accumulator that is built innermost-first and
//! reversed once the search unwinds.
//!
//! [`resolve`] then walks that index trail from the root, normalizing one
//! sibling list per depth into a [`Column`] and flagging the node on the
//! trail as active. Only the sibling lists along the trail are normalized;
//! the rest of the tree is inspected through borrowed values.
//!
//! # Invariants
//!
//! 1. Column 0 is always the root sibling list, even when nothing matches.
//! 2. A match at depth `d` yields `d + 1` columns and a `d + 1` node path.
//! 3. Column `k` (k >= 1) is the children list of the active node in
//!    column `k - 1`, and every node in it has `parent == Some(that index)`.
//! 4. At most one node per column is active.
//! 5. The input tree is never mutated.

use crate::node::{FieldKeys, NormalizedNode, normalize};
use serde_json::Value;
use web_time::Instant;

/// An ordered sibling list displayed at one depth of the picker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    nodes: Vec<NormalizedNode>,
}

impl Column {
    /// Normalize a raw sibling list into a column.
    ///
    /// Every node gets `parent` set to `parent`; none is active.
    #[must_use]
    pub fn from_raw(siblings: &[Value], parent: Option<usize>, keys: &FieldKeys) -> Self {
        let nodes = siblings
            .iter()
            .map(|raw| {
                let mut node = normalize(raw, keys);
                node.parent = parent;
                node
            })
            .collect();
        Self { nodes }
    }

    /// The nodes of this column in display order.
    #[must_use]
    pub fn nodes(&self) -> &[NormalizedNode] {
        &self.nodes
    }

    /// Node at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NormalizedNode> {
        self.nodes.get(index)
    }

    /// Number of nodes in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the column has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the nodes in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedNode> {
        self.nodes.iter()
    }

    /// Index of the active node, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.nodes.iter().position(NormalizedNode::is_active)
    }

    /// The active node, if any.
    #[must_use]
    pub fn active(&self) -> Option<&NormalizedNode> {
        self.nodes.iter().find(|node| node.is_active())
    }

    /// Flag the node at `index` as active and clear every other flag.
    ///
    /// An out-of-range index leaves the column with no active node.
    pub fn set_active(&mut self, index: Option<usize>) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.active = Some(i) == index;
        }
    }

    /// Whether any node in this column has the given value.
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        self.nodes.iter().any(|node| node.matches(value))
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a NormalizedNode;
    type IntoIter = std::slice::Iter<'a, NormalizedNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Output of [`resolve`]: the columns to display and the path of active
/// nodes from the root to the matched node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Columns from root to the matched depth.
    pub columns: Vec<Column>,
    /// Active node per column, root first. Empty when nothing matched.
    pub active_path: Vec<NormalizedNode>,
    /// Sibling index of each active node, root first.
    pub trail: Vec<usize>,
}

impl Resolution {
    /// Whether the target was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.active_path.is_empty()
    }

    /// The matched (deepest) node.
    #[must_use]
    pub fn matched(&self) -> Option<&NormalizedNode> {
        self.active_path.last()
    }

    /// Depth of the match (0 = root level).
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.trail.len().checked_sub(1)
    }

    /// Column exposing the matched node's children.
    ///
    /// `None` when nothing matched or the node has no children field.
    #[must_use]
    pub fn matched_children(&self, keys: &FieldKeys) -> Option<Column> {
        let node = self.matched()?;
        let index = *self.trail.last()?;
        children_column(node, index, keys)
    }
}

/// Find the sibling-index trail from the root to the first node whose value
/// equals `target`.
#[must_use]
pub fn locate(tree: &[Value], target: &Value, keys: &FieldKeys) -> Option<Vec<usize>> {
    let mut trail = Vec::new();
    if search(tree, target, keys, &mut trail) {
        trail.reverse();
        Some(trail)
    } else {
        None
    }
}

fn search(siblings: &[Value], target: &Value, keys: &FieldKeys, trail: &mut Vec<usize>) -> bool {
    for (index, raw) in siblings.iter().enumerate() {
        if keys.value_of(raw) == Some(target) {
            trail.push(index);
            return true;
        }
        if let Some(children) = keys.children_of(raw)
            && search(children, target, keys, trail)
        {
            trail.push(index);
            return true;
        }
    }
    false
}

/// Resolve `target` against `tree`.
///
/// A `None` target, or one that is not present, yields only the root column
/// and an empty path. That is a normal outcome, not an error.
#[must_use]
pub fn resolve(tree: &[Value], target: Option<&Value>, keys: &FieldKeys) -> Resolution {
    let span = tracing::debug_span!(
        "cascade.resolve",
        roots = tree.len(),
        depth = tracing::field::Empty,
        found = tracing::field::Empty,
        resolve_duration_us = tracing::field::Empty,
    );
    let _guard = span.enter();
    let start = Instant::now();

    let trail = target
        .and_then(|target| locate(tree, target, keys))
        .unwrap_or_default();

    let mut columns = vec![Column::from_raw(tree, None, keys)];
    let mut active_path = Vec::with_capacity(trail.len());
    let mut siblings = tree;
    let mut parent = None;

    for (depth, &index) in trail.iter().enumerate() {
        if depth > 0 {
            columns.push(Column::from_raw(siblings, parent, keys));
        }
        if let Some(column) = columns.last_mut() {
            column.set_active(Some(index));
            if let Some(node) = column.get(index) {
                active_path.push(node.clone());
            }
        }
        siblings = siblings
            .get(index)
            .and_then(|raw| keys.children_of(raw))
            .unwrap_or_default();
        parent = Some(index);
    }

    let elapsed_us = start.elapsed().as_micros() as u64;
    span.record("depth", trail.len());
    span.record("found", !trail.is_empty());
    span.record("resolve_duration_us", elapsed_us);

    Resolution {
        columns,
        active_path,
        trail,
    }
}

/// Build the column that exposes `node`'s children.
///
/// `parent_index` is the node's index in its own column. Returns `None` when
/// the node has no children field and an empty column when the list is empty.
#[must_use]
pub fn children_column(
    node: &NormalizedNode,
    parent_index: usize,
    keys: &FieldKeys,
) -> Option<Column> {
    node.children()
        .map(|children| Column::from_raw(children, Some(parent_index), keys))
}
