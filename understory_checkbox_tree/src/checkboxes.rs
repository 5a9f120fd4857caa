// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns one checkbox tree and reports its views.

use alloc::{borrow::ToOwned, string::String, vec::Vec};

use hashbrown::{HashMap, hash_map::Entry};
use smallvec::SmallVec;

use crate::config::CheckboxesConfig;
use crate::convert::{list_to_map, map_to_list};
use crate::keyed::KeyedMap;
use crate::node::{CheckboxMapNode, CheckboxNode};
use crate::ops;
use crate::reconcile::reconcile;

/// A `(key, node)` pair naming one node of the tree.
pub type NodeEntry = (String, CheckboxMapNode);

/// Keys from a root down to a node, inclusive.
type KeyPath = SmallVec<[String; 4]>;

/// Views of the tree emitted after every operation.
///
/// All four describe the same state. Display layers usually want the
/// hierarchy; persistence usually wants the flat leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Changes {
    /// List form, with every parent's flags derived from its leaves.
    pub hierarchy: Vec<CheckboxNode>,
    /// Map form, exactly as stored.
    pub hierarchy_map: KeyedMap<CheckboxMapNode>,
    /// Leaves of [`hierarchy`](Self::hierarchy), depth-first.
    pub flat: Vec<CheckboxNode>,
    /// The node the operation changed, or `None` if it was a no-op.
    pub changed: Option<NodeEntry>,
}

/// Controller for a checkbox tree.
///
/// This type:
/// - stores the tree in map form for keyed access,
/// - keeps an index from node id to the key path that reaches it,
/// - applies cascades ([`checkbox_change`](Self::checkbox_change)) and
///   one-level bubbling ([`on_child_change`](Self::on_child_change)),
/// - returns [`Changes`] after every operation.
///
/// Ids only need to be unique among siblings. If an id repeats elsewhere in the
/// tree, lookups by that id resolve to its first occurrence in depth-first
/// order.
///
/// It does *not* render anything; host frameworks draw the returned views and
/// forward user input back as calls.
///
/// ## Example
///
/// ```rust
/// use understory_checkbox_tree::{Checkboxes, CheckboxesConfig, CheckboxNode, Selectable};
///
/// let mut boxes = Checkboxes::from_nodes(
///     [CheckboxNode::new("p", "Parent").with_children([
///         CheckboxNode::new("c1", "Child 1"),
///         CheckboxNode::new("c2", "Child 2"),
///     ])],
///     CheckboxesConfig::default(),
/// );
///
/// // Checking the parent cascades to both children.
/// let changes = boxes.checkbox_change("p", true);
/// assert_eq!(changes.flat.iter().filter(|n| n.is_selected()).count(), 2);
///
/// // Unchecking one child and bubbling it to the parent.
/// let child = boxes.checkbox_change("c1", false).changed.unwrap();
/// let changes = boxes.on_child_change(child, "p");
/// let (key, parent) = changes.changed.unwrap();
/// assert_eq!(key, "p");
/// assert!(parent.is_indeterminate());
/// ```
#[derive(Clone, Debug)]
pub struct Checkboxes {
    nodes: KeyedMap<CheckboxMapNode>,
    config: CheckboxesConfig,
    paths: HashMap<String, KeyPath>,
}

impl Default for Checkboxes {
    fn default() -> Self {
        Self::new(CheckboxesConfig::default())
    }
}

impl Checkboxes {
    /// Create a controller with an empty tree.
    pub fn new(config: CheckboxesConfig) -> Self {
        Self::from_node_map(KeyedMap::new(), config)
    }

    /// Create a controller from list-shaped nodes.
    ///
    /// Parents are reconciled from their children during conversion.
    pub fn from_nodes(
        nodes: impl IntoIterator<Item = CheckboxNode>,
        config: CheckboxesConfig,
    ) -> Self {
        Self::from_node_map(list_to_map(nodes), config)
    }

    /// Create a controller from a map-shaped tree, stored as given.
    pub fn from_node_map(nodes: KeyedMap<CheckboxMapNode>, config: CheckboxesConfig) -> Self {
        let mut this = Self {
            nodes,
            config,
            paths: HashMap::new(),
        };
        this.reindex();
        this
    }

    /// Replace the tree with list-shaped nodes.
    pub fn set_nodes(&mut self, nodes: impl IntoIterator<Item = CheckboxNode>) {
        self.set_node_map(list_to_map(nodes));
    }

    /// Replace the tree with a map-shaped tree.
    pub fn set_node_map(&mut self, nodes: KeyedMap<CheckboxMapNode>) {
        self.nodes = nodes;
        self.reindex();
    }

    /// The stored tree.
    pub fn node_map(&self) -> &KeyedMap<CheckboxMapNode> {
        &self.nodes
    }

    /// Consume the controller, returning the stored tree.
    pub fn into_node_map(self) -> KeyedMap<CheckboxMapNode> {
        self.nodes
    }

    /// The controller's configuration.
    pub fn config(&self) -> CheckboxesConfig {
        self.config
    }

    /// Returns true if nodes can be expanded and collapsed.
    pub fn is_expandable(&self) -> bool {
        self.config.expandable
    }

    /// Look up a node anywhere in the tree by id.
    pub fn get(&self, key: &str) -> Option<&CheckboxMapNode> {
        let path = self.paths.get(key)?;
        node_at(&self.nodes, path)
    }

    /// Id of the parent of `key`, or `None` for roots and unknown ids.
    pub fn parent_key_of(&self, key: &str) -> Option<&str> {
        let path = self.paths.get(key)?;
        let parent = path.len().checked_sub(2)?;
        Some(path[parent].as_str())
    }

    /// Check or uncheck `key` and all of its descendants.
    ///
    /// Ancestors are not touched; feed [`Changes::changed`] to
    /// [`on_child_change`](Self::on_child_change) (or call
    /// [`bubble`](Self::bubble)) to update them. Unknown keys are ignored.
    pub fn checkbox_change(&mut self, key: &str, selected: bool) -> Changes {
        self.checkbox_change_with(key, selected, |_, _| {})
    }

    /// Like [`checkbox_change`](Self::checkbox_change), reporting every toggled
    /// node to `on_change` as [`toggle_with`](crate::toggle_with) does.
    pub fn checkbox_change_with<F>(&mut self, key: &str, selected: bool, on_change: F) -> Changes
    where
        F: FnMut(bool, &CheckboxMapNode),
    {
        let Some(slot) = self
            .paths
            .get(key)
            .and_then(|path| node_at_mut(&mut self.nodes, path))
        else {
            tracing::debug!(key, "checkbox change for unknown node ignored");
            return self.changes(None);
        };
        let updated = ops::toggle_with(core::mem::take(slot), selected, on_change);
        *slot = updated.clone();
        tracing::debug!(key, selected, "checkbox changed");
        self.changes(Some((key.to_owned(), updated)))
    }

    /// Store a changed child under `parent_key` and recompute that parent.
    ///
    /// The returned [`Changes::changed`] names the parent, ready to be passed
    /// to the next call with the grandparent's key. This does not recurse.
    ///
    /// If `parent_key` is not in the tree the call is a silent no-op:
    /// `changed` is `None` and the views are still emitted.
    pub fn on_child_change(&mut self, child: NodeEntry, parent_key: &str) -> Changes {
        let changed = self.apply_child_change(child, parent_key);
        self.changes(changed)
    }

    /// Bubble the current state of `key` up through every ancestor.
    ///
    /// Ancestors are recomputed one level at a time, nearest first, along the
    /// key path that reaches `key`. Ancestors are never looked up by id, so a
    /// repeated id elsewhere in the tree is not touched. `changed` names the
    /// root, or is `None` if `key` is a root or unknown.
    pub fn bubble(&mut self, key: &str) -> Changes {
        let Some(path) = self.paths.get(key).cloned() else {
            tracing::debug!(key, "bubble from unknown node ignored");
            return self.changes(None);
        };
        let mut changed = None;
        for depth in (1..path.len()).rev() {
            let Some(parent) = node_at_mut(&mut self.nodes, &path[..depth]) else {
                break;
            };
            reconcile(parent);
            tracing::debug!(
                parent_key = %path[depth - 1],
                state = ?parent.state,
                "child change bubbled"
            );
            changed = Some((path[depth - 1].clone(), parent.clone()));
        }
        self.changes(changed)
    }

    /// Flip `expanded` on `key`, returning the new value.
    ///
    /// Returns `None` if the key is unknown or the controller is not
    /// expandable.
    pub fn toggle_expand(&mut self, key: &str) -> Option<bool> {
        if !self.config.expandable {
            tracing::debug!(key, "expand ignored, controller is not expandable");
            return None;
        }
        let path = self.paths.get(key)?;
        let node = node_at_mut(&mut self.nodes, path)?;
        Some(ops::toggle_expand(node))
    }

    /// Current views without changing anything.
    pub fn emit_changes(&self) -> Changes {
        self.changes(None)
    }

    fn apply_child_change(
        &mut self,
        (child_key, child): NodeEntry,
        parent_key: &str,
    ) -> Option<NodeEntry> {
        let Some(slot) = self
            .paths
            .get(parent_key)
            .and_then(|path| node_at_mut(&mut self.nodes, path))
        else {
            tracing::debug!(
                parent_key,
                child_key = %child_key,
                "parent not found, child change ignored"
            );
            return None;
        };
        let reshaped = slot
            .children
            .get(&child_key)
            .is_none_or(|old| !same_shape(old, &child));
        let updated = ops::apply_child_change(core::mem::take(slot), &child_key, child);
        *slot = updated.clone();
        if reshaped {
            self.reindex();
        }
        tracing::debug!(
            parent_key,
            child_key = %child_key,
            state = ?updated.state,
            "child change applied"
        );
        Some((parent_key.to_owned(), updated))
    }

    fn changes(&self, changed: Option<NodeEntry>) -> Changes {
        let hierarchy = map_to_list(self.nodes.clone());
        let flat = ops::flatten_all(&hierarchy).cloned().collect();
        Changes {
            hierarchy,
            hierarchy_map: self.nodes.clone(),
            flat,
            changed,
        }
    }

    fn reindex(&mut self) {
        self.paths.clear();
        let mut prefix = KeyPath::new();
        for (key, node) in &self.nodes {
            index_subtree(&mut self.paths, &mut prefix, key, node);
        }
    }
}

fn index_subtree(
    paths: &mut HashMap<String, KeyPath>,
    prefix: &mut KeyPath,
    key: &str,
    node: &CheckboxMapNode,
) {
    prefix.push(key.to_owned());
    match paths.entry(key.to_owned()) {
        Entry::Occupied(_) => {
            tracing::warn!(id = key, "id repeats in tree, lookups resolve to its first occurrence");
        }
        Entry::Vacant(slot) => {
            slot.insert(prefix.clone());
        }
    }
    for (child_key, child) in &node.children {
        index_subtree(paths, prefix, child_key, child);
    }
    prefix.pop();
}

fn node_at<'a>(
    nodes: &'a KeyedMap<CheckboxMapNode>,
    path: &[String],
) -> Option<&'a CheckboxMapNode> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(nodes.get(first)?, |node, key| node.children.get(key))
}

fn node_at_mut<'a>(
    nodes: &'a mut KeyedMap<CheckboxMapNode>,
    path: &[String],
) -> Option<&'a mut CheckboxMapNode> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get_mut(first)?;
    for key in rest {
        node = node.children.get_mut(key)?;
    }
    Some(node)
}

/// Same keys at every level, ignoring state.
fn same_shape(a: &CheckboxMapNode, b: &CheckboxMapNode) -> bool {
    a.children.len() == b.children.len()
        && a
            .children
            .iter()
            .zip(b.children.iter())
            .all(|((ka, a), (kb, b))| ka == kb && same_shape(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeState, Selectable};
    use alloc::vec;

    fn parent_of_two() -> Checkboxes {
        Checkboxes::from_nodes(
            [CheckboxNode::new("p", "P").with_children([
                CheckboxNode::new("c1", "C1"),
                CheckboxNode::new("c2", "C2"),
            ])],
            CheckboxesConfig::default(),
        )
    }

    fn three_levels() -> Checkboxes {
        Checkboxes::from_nodes(
            [CheckboxNode::new("root", "Root").with_children([
                CheckboxNode::new("mid", "Mid").with_children([
                    CheckboxNode::new("leaf1", "Leaf 1"),
                    CheckboxNode::new("leaf2", "Leaf 2"),
                ]),
                CheckboxNode::new("other", "Other"),
            ])],
            CheckboxesConfig::default(),
        )
    }

    #[test]
    fn toggle_then_child_change_goes_indeterminate() {
        let mut boxes = parent_of_two();

        let changes = boxes.checkbox_change("p", true);
        let (key, root) = changes.changed.unwrap();
        assert_eq!(key, "p");
        assert_eq!(root.state, NodeState::SELECTED);
        assert!(root.children.values().all(|c| c.state == NodeState::SELECTED));

        let changes = boxes.on_child_change(
            ("c1".into(), CheckboxMapNode::new("c1", "C1").with_selected(false)),
            "p",
        );
        let (key, root) = changes.changed.unwrap();
        assert_eq!(key, "p");
        assert!(!root.is_selected());
        assert!(root.is_indeterminate());
        assert_eq!(boxes.get("p"), Some(&root), "stored tree is updated");
    }

    #[test]
    fn missing_parent_is_silent() {
        let mut boxes = parent_of_two();
        let before = boxes.node_map().clone();
        let stale = ("c1".into(), CheckboxMapNode::new("c1", "C1"));
        let changes = boxes.on_child_change(stale, "nope");
        assert!(changes.changed.is_none());
        assert_eq!(changes.hierarchy_map, before);
        assert_eq!(changes.flat.len(), 2, "views are still emitted");
    }

    #[test]
    fn child_change_does_not_reach_grandparent() {
        let mut boxes = three_levels();
        boxes.checkbox_change("leaf1", true);
        let changes = boxes.on_child_change(
            ("leaf1".into(), boxes.get("leaf1").unwrap().clone()),
            "mid",
        );
        assert!(changes.changed.unwrap().1.is_indeterminate());
        let root = boxes.get("root").unwrap();
        assert!(!root.is_indeterminate(), "grandparent waits for its own call");
    }

    #[test]
    fn bubble_walks_to_root() {
        let mut boxes = three_levels();
        boxes.checkbox_change("mid", true);
        let changes = boxes.bubble("mid");
        let (key, root) = changes.changed.unwrap();
        assert_eq!(key, "root");
        assert!(root.is_indeterminate());

        boxes.checkbox_change("other", true);
        let changes = boxes.bubble("other");
        assert_eq!(changes.changed.unwrap().1.state, NodeState::SELECTED);
        assert!(boxes.get("root").unwrap().is_selected());
    }

    #[test]
    fn bubble_from_root_changes_nothing() {
        let mut boxes = three_levels();
        assert!(boxes.bubble("root").changed.is_none());
        assert!(boxes.bubble("missing").changed.is_none());
    }

    #[test]
    fn bubble_follows_path_past_repeated_ancestor_id() {
        let first_x = CheckboxNode::new("x", "first x").with_children([CheckboxNode::new("m", "M")]);
        let second_x = CheckboxNode::new("x", "second x")
            .with_children([CheckboxNode::new("n", "N"), CheckboxNode::new("o", "O")]);
        let mut boxes = Checkboxes::from_nodes(
            [
                CheckboxNode::new("a", "A").with_children([first_x]),
                CheckboxNode::new("b", "B").with_children([second_x]),
            ],
            CheckboxesConfig::default(),
        );
        boxes.checkbox_change("n", true);
        let changes = boxes.bubble("n");

        let (key, _) = changes.changed.unwrap();
        assert_eq!(key, "b");
        let nodes = boxes.node_map();
        let first_x = nodes.get("a").unwrap().children.get("x").unwrap();
        assert_eq!(first_x.children.keys().collect::<Vec<_>>(), vec!["m"]);
        assert!(!first_x.is_indeterminate());
        let second_x = nodes.get("b").unwrap().children.get("x").unwrap();
        assert!(second_x.is_indeterminate());
        assert!(!second_x.is_selected());
        assert_eq!(boxes.parent_key_of("n"), Some("x"));
        assert_eq!(boxes.get("n").map(Selectable::is_selected), Some(true));
    }

    #[test]
    fn hierarchy_view_is_normalized_before_bubbling() {
        let mut boxes = three_levels();
        let changes = boxes.checkbox_change("mid", true);
        // The map still holds the stale root, the list form derives it.
        assert!(!changes.hierarchy_map.get("root").unwrap().is_indeterminate());
        assert!(changes.hierarchy[0].is_indeterminate());
        let flat: Vec<_> = changes.flat.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(flat, vec!["leaf1", "leaf2", "other"]);
    }

    #[test]
    fn unknown_key_change_is_ignored() {
        let mut boxes = parent_of_two();
        let changes = boxes.checkbox_change("ghost", true);
        assert!(changes.changed.is_none());
        assert!(changes.flat.iter().all(|n| !n.is_selected()));
    }

    #[test]
    fn callback_sees_every_toggled_node() {
        let mut boxes = three_levels();
        let mut seen = Vec::new();
        boxes.checkbox_change_with("mid", true, |_, node| seen.push(node.id.clone()));
        assert_eq!(seen, vec!["mid", "leaf1", "leaf2"]);
    }

    #[test]
    fn expand_respects_config() {
        let mut boxes = parent_of_two();
        assert_eq!(boxes.toggle_expand("p"), Some(true));
        assert!(boxes.get("p").unwrap().is_expanded());
        assert_eq!(boxes.toggle_expand("p"), Some(false));
        assert_eq!(boxes.toggle_expand("ghost"), None);

        let mut fixed = Checkboxes::from_node_map(
            boxes.into_node_map(),
            CheckboxesConfig::new().with_expandable(false),
        );
        assert_eq!(fixed.toggle_expand("p"), None);
        assert!(!fixed.get("p").unwrap().is_expanded());
    }

    #[test]
    fn new_child_is_indexed() {
        let mut boxes = parent_of_two();
        boxes.on_child_change(("c3".into(), CheckboxMapNode::new("c3", "C3")), "p");
        assert_eq!(boxes.parent_key_of("c3"), Some("p"));
        assert_eq!(boxes.parent_key_of("p"), None);
    }

    #[test]
    fn repeated_ids_resolve_to_first_occurrence() {
        let boxes = Checkboxes::from_nodes(
            [
                CheckboxNode::new("a", "A").with_children([CheckboxNode::new("x", "first")]),
                CheckboxNode::new("b", "B").with_children([CheckboxNode::new("x", "second")]),
            ],
            CheckboxesConfig::default(),
        );
        assert_eq!(boxes.get("x").map(|n| n.title.as_str()), Some("first"));
        assert_eq!(boxes.parent_key_of("x"), Some("a"));
    }
}
