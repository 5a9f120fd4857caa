// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree mutation operations: cascade, child change, flatten, expand, order.
//!
//! Nodes are treated as values. [`toggle`] and [`apply_child_change`] take a
//! node and return its replacement; callers store the result where the old
//! node lived.

use core::cmp::Ordering;
use core::slice;

use smallvec::SmallVec;

use crate::keyed::KeyedMap;
use crate::node::{CheckboxMapNode, CheckboxNode, NodeState, Selectable};
use crate::reconcile::reconcile;

/// Set `selected` on `node` and every descendant, clearing `indeterminate`.
///
/// Equivalent to [`toggle_with`] with a no-op callback.
pub fn toggle(node: CheckboxMapNode, selected: bool) -> CheckboxMapNode {
    toggle_with(node, selected, |_, _| {})
}

/// Set `selected` on `node` and every descendant, clearing `indeterminate`,
/// and report each assignment to `on_change`.
///
/// The cascade is unconditional: every descendant ends up with the same
/// `selected` value whatever it held before. `on_change` runs once per node in
/// pre-order and observes the node after its own flags were assigned but
/// before its children were.
///
/// ```rust
/// use understory_checkbox_tree::{CheckboxMapNode, Selectable, toggle_with};
///
/// let root = CheckboxMapNode::new("p", "Parent").with_children([
///     CheckboxMapNode::new("a", "A"),
///     CheckboxMapNode::new("b", "B"),
/// ]);
///
/// let mut visited = Vec::new();
/// let root = toggle_with(root, true, |_, node| visited.push(node.id.clone()));
///
/// assert_eq!(visited, ["p", "a", "b"]);
/// assert!(root.children.values().all(Selectable::is_selected));
/// ```
pub fn toggle_with<F>(node: CheckboxMapNode, selected: bool, mut on_change: F) -> CheckboxMapNode
where
    F: FnMut(bool, &CheckboxMapNode),
{
    cascade(node, selected, &mut on_change)
}

fn cascade<F>(mut node: CheckboxMapNode, selected: bool, on_change: &mut F) -> CheckboxMapNode
where
    F: FnMut(bool, &CheckboxMapNode),
{
    node.state.set(NodeState::SELECTED, selected);
    node.state.remove(NodeState::INDETERMINATE);
    tracing::trace!(id = %node.id, selected, "toggled");
    on_change(selected, &node);
    for child in node.children.values_mut() {
        *child = cascade(core::mem::take(child), selected, on_change);
    }
    node
}

/// Store `child` under `child_key` in `parent` and recompute the parent's flags
/// from its full set of children.
///
/// Only `parent` is recomputed; propagating further up is left to the caller,
/// one level per call. Applying the same change twice gives the same result as
/// applying it once.
pub fn apply_child_change(
    mut parent: CheckboxMapNode,
    child_key: &str,
    child: CheckboxMapNode,
) -> CheckboxMapNode {
    parent.children.insert(child_key, child);
    reconcile(&mut parent);
    parent
}

/// Flip a node's `expanded` flag and return the new value.
pub fn toggle_expand<N: Selectable + ?Sized>(node: &mut N) -> bool {
    let state = node.state_mut();
    state.toggle(NodeState::EXPANDED);
    state.contains(NodeState::EXPANDED)
}

/// Leaves reachable from `node`, depth-first with children before siblings.
///
/// A node with no children yields itself. Parents yield nothing of their own.
/// The iterator is lazy and borrows the tree; calling [`flatten`] again starts
/// a fresh walk.
///
/// ```rust
/// use understory_checkbox_tree::{CheckboxNode, flatten};
///
/// let root = CheckboxNode::new("r", "R").with_children([
///     CheckboxNode::new("a", "A").with_children([CheckboxNode::new("a1", "A1")]),
///     CheckboxNode::new("b", "B"),
/// ]);
/// let ids: Vec<_> = flatten(&root).map(|n| n.id.as_str()).collect();
/// assert_eq!(ids, ["a1", "b"]);
/// ```
pub fn flatten(node: &CheckboxNode) -> Leaves<'_> {
    flatten_all(slice::from_ref(node))
}

/// Leaves of every tree in `nodes`, in order.
pub fn flatten_all(nodes: &[CheckboxNode]) -> Leaves<'_> {
    let mut stack = SmallVec::new();
    stack.push(nodes.iter());
    Leaves { stack }
}

/// Iterator returned by [`flatten`] and [`flatten_all`].
#[derive(Clone, Debug)]
pub struct Leaves<'a> {
    stack: SmallVec<[slice::Iter<'a, CheckboxNode>; 8]>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a CheckboxNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                None => {
                    self.stack.pop();
                }
                Some(node) if node.children.is_empty() => return Some(node),
                Some(node) => self.stack.push(node.children.iter()),
            }
        }
    }
}

impl core::iter::FusedIterator for Leaves<'_> {}

/// Nodes carrying an order come first, ascending; unordered nodes keep their
/// relative position after them.
fn by_order(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stably reorder every sibling group of a list tree by `order`.
pub fn sort_list_by_order(nodes: &mut [CheckboxNode]) {
    nodes.sort_by(|a, b| by_order(a.order, b.order));
    for node in nodes {
        sort_list_by_order(&mut node.children);
    }
}

/// Stably reorder every sibling group of a map tree by `order`.
pub fn sort_map_by_order(map: &mut KeyedMap<CheckboxMapNode>) {
    map.sort_in_place_by(|(_, a), (_, b)| by_order(a.order, b.order));
    for node in map.values_mut() {
        sort_map_by_order(&mut node.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn family() -> CheckboxMapNode {
        CheckboxMapNode::new("p", "P").with_children([
            CheckboxMapNode::new("c1", "C1"),
            CheckboxMapNode::new("c2", "C2").with_children([
                CheckboxMapNode::new("g1", "G1").with_selected(true),
                CheckboxMapNode::new("g2", "G2"),
            ]),
        ])
    }

    fn all_states(node: &CheckboxMapNode, out: &mut Vec<NodeState>) {
        out.push(node.state);
        for child in node.children.values() {
            all_states(child, out);
        }
    }

    #[test]
    fn toggle_cascades_to_every_descendant() {
        let mut states = Vec::new();
        all_states(&toggle(family(), true), &mut states);
        assert_eq!(states.len(), 5);
        assert!(states.iter().all(|s| *s == NodeState::SELECTED));

        let mut states = Vec::new();
        all_states(&toggle(family(), false), &mut states);
        assert!(states.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn toggle_clears_indeterminate_and_keeps_expanded() {
        let mut node = family();
        node.state = NodeState::INDETERMINATE | NodeState::EXPANDED;
        let node = toggle(node, true);
        assert_eq!(node.state, NodeState::SELECTED | NodeState::EXPANDED);
    }

    #[test]
    fn toggle_reports_pre_order() {
        let mut seen = Vec::new();
        let _ = toggle_with(family(), false, |selected, node| {
            assert!(!selected);
            seen.push(node.id.clone());
        });
        assert_eq!(seen, vec!["p", "c1", "c2", "g1", "g2"]);
    }

    #[test]
    fn child_change_uses_all_children() {
        let parent = toggle(family(), true);
        let updated =
            apply_child_change(parent, "c1", CheckboxMapNode::new("c1", "C1").with_selected(false));
        assert!(!updated.is_selected());
        assert!(updated.is_indeterminate());

        let restored =
            apply_child_change(updated, "c1", CheckboxMapNode::new("c1", "C1").with_selected(true));
        assert!(restored.is_selected());
        assert!(!restored.is_indeterminate());
    }

    #[test]
    fn child_change_is_idempotent() {
        let change = CheckboxMapNode::new("c1", "C1").with_selected(true);
        let once = apply_child_change(family(), "c1", change.clone());
        let twice = apply_child_change(once.clone(), "c1", change);
        assert_eq!(once, twice);
    }

    #[test]
    fn child_change_with_new_key_appends() {
        let parent = CheckboxMapNode::new("p", "P")
            .with_children([CheckboxMapNode::new("a", "A").with_selected(true)]);
        let parent = apply_child_change(parent, "b", CheckboxMapNode::new("b", "B"));
        assert_eq!(parent.children.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(parent.is_indeterminate());
    }

    #[test]
    fn flatten_yields_leaves_depth_first() {
        let root = CheckboxNode::new("r", "R").with_children([
            CheckboxNode::new("a", "A").with_children([
                CheckboxNode::new("a1", "A1"),
                CheckboxNode::new("a2", "A2").with_children([CheckboxNode::new("a2x", "A2X")]),
            ]),
            CheckboxNode::new("b", "B"),
            CheckboxNode::new("c", "C").with_children([CheckboxNode::new("c1", "C1")]),
        ]);
        let ids: Vec<_> = flatten(&root).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2x", "b", "c1"]);
        assert!(flatten(&root).all(|n| n.children.is_empty()));
        // Restartable.
        assert_eq!(flatten(&root).count(), 4);
    }

    #[test]
    fn flatten_of_leaf_is_itself() {
        let leaf = CheckboxNode::new("l", "L");
        let leaves: Vec<_> = flatten(&leaf).collect();
        assert_eq!(leaves, vec![&leaf]);
        assert_eq!(flatten_all(&[]).count(), 0);
    }

    #[test]
    fn toggle_expand_flips() {
        let mut node = CheckboxNode::new("n", "N");
        assert!(toggle_expand(&mut node));
        assert!(node.is_expanded());
        assert!(!toggle_expand(&mut node));
        assert!(!node.is_expanded());
    }

    #[test]
    fn sort_by_order_is_stable_and_recursive() {
        let mut list = vec![
            CheckboxNode::new("u1", "U1"),
            CheckboxNode::new("o2", "O2").with_order(2),
            CheckboxNode::new("u2", "U2"),
            CheckboxNode::new("o1", "O1").with_order(1).with_children([
                CheckboxNode::new("y", "Y").with_order(9),
                CheckboxNode::new("x", "X").with_order(-1),
            ]),
        ];
        let mut map = crate::convert::list_to_map(list.clone());

        sort_list_by_order(&mut list);
        let ids: Vec<_> = list.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["o1", "o2", "u1", "u2"]);
        assert_eq!(list[0].children[0].id, "x");

        sort_map_by_order(&mut map);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["o1", "o2", "u1", "u2"]);
        let o1 = map.get("o1").unwrap();
        assert_eq!(o1.children.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
