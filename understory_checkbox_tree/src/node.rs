// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node types: selection state, theme colors, and the two tree representations.

use alloc::{string::String, vec::Vec};

use crate::keyed::KeyedMap;

bitflags::bitflags! {
    /// Selection and disclosure state of a node.
    ///
    /// `SELECTED` is authoritative on leaves and derived on parents.
    /// `INDETERMINATE` is always derived and never set together with `SELECTED`.
    /// `EXPANDED` is UI-only and plays no part in selection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeState: u8 {
        /// The checkbox is checked.
        const SELECTED      = 0b0000_0001;
        /// Some but not all children are checked.
        const INDETERMINATE = 0b0000_0010;
        /// The node's children are disclosed.
        const EXPANDED      = 0b0000_0100;
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Theme palette entry used to tint a checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ThemeColor {
    /// Primary brand color.
    Primary,
    /// Secondary brand color.
    Secondary,
    /// Accent color.
    Accent,
    /// Warning color.
    Warn,
    /// Informational color.
    Info,
    /// Success color.
    Success,
    /// Error color.
    Error,
}

/// Capability shared by [`CheckboxNode`] and [`CheckboxMapNode`].
///
/// Reconciliation and expansion are written against this trait so they apply
/// to either representation.
pub trait Selectable {
    /// Key of this node within its sibling container.
    fn id(&self) -> &str;

    /// Display title.
    fn title(&self) -> &str;

    /// Current state flags.
    fn state(&self) -> NodeState;

    /// Mutable access to the state flags.
    fn state_mut(&mut self) -> &mut NodeState;

    /// Optional theme color.
    fn color(&self) -> Option<ThemeColor>;

    /// Optional sort key.
    fn order(&self) -> Option<i32>;

    /// Number of direct children.
    fn child_count(&self) -> usize;

    /// The `selected` flag of each direct child, in order.
    fn child_selections(&self) -> impl Iterator<Item = bool> + '_;

    /// Returns true if the checkbox is checked.
    fn is_selected(&self) -> bool {
        self.state().contains(NodeState::SELECTED)
    }

    /// Returns true if some but not all children are checked.
    fn is_indeterminate(&self) -> bool {
        self.state().contains(NodeState::INDETERMINATE)
    }

    /// Returns true if the node's children are disclosed.
    fn is_expanded(&self) -> bool {
        self.state().contains(NodeState::EXPANDED)
    }

    /// Returns true if the node has no children.
    fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }
}

/// List-shaped node: children are an ordered sequence.
///
/// Unset fields default to unselected, collapsed, uncolored, unordered and
/// childless, so partial data can be written with struct update syntax.
///
/// ```rust
/// use understory_checkbox_tree::{CheckboxNode, Selectable};
///
/// let parent = CheckboxNode::new("p", "Parent").with_children([
///     CheckboxNode::new("c1", "Child 1").with_selected(true),
///     CheckboxNode::new("c2", "Child 2"),
/// ]);
/// assert_eq!(parent.child_count(), 2);
/// assert!(parent.children[0].is_selected());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CheckboxNode {
    /// Key within the sibling group.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Selection and disclosure state.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub state: NodeState,
    /// Optional theme color.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<ThemeColor>,
    /// Optional sort key, ascending. Integer only; fractional values are
    /// rejected on input.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub order: Option<i32>,
    /// Children in display order.
    pub children: Vec<CheckboxNode>,
}

/// Map-shaped node: children are keyed by id for direct lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CheckboxMapNode {
    /// Key within the sibling group.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Selection and disclosure state.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub state: NodeState,
    /// Optional theme color.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<ThemeColor>,
    /// Optional sort key, ascending. Integer only; fractional values are
    /// rejected on input.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub order: Option<i32>,
    /// Children keyed by id, in insertion order.
    pub children: KeyedMap<CheckboxMapNode>,
}

macro_rules! node_builders {
    ($node:ty) => {
        impl $node {
            /// Create an unselected, childless node.
            pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    title: title.into(),
                    ..Self::default()
                }
            }

            /// Set the `selected` flag.
            #[must_use]
            pub fn with_selected(mut self, selected: bool) -> Self {
                self.state.set(NodeState::SELECTED, selected);
                self
            }

            /// Set the `expanded` flag.
            #[must_use]
            pub fn with_expanded(mut self, expanded: bool) -> Self {
                self.state.set(NodeState::EXPANDED, expanded);
                self
            }

            /// Set the theme color.
            #[must_use]
            pub fn with_color(mut self, color: ThemeColor) -> Self {
                self.color = Some(color);
                self
            }

            /// Set the sort key.
            #[must_use]
            pub fn with_order(mut self, order: i32) -> Self {
                self.order = Some(order);
                self
            }
        }

        impl Selectable for $node {
            fn id(&self) -> &str {
                &self.id
            }

            fn title(&self) -> &str {
                &self.title
            }

            fn state(&self) -> NodeState {
                self.state
            }

            fn state_mut(&mut self) -> &mut NodeState {
                &mut self.state
            }

            fn color(&self) -> Option<ThemeColor> {
                self.color
            }

            fn order(&self) -> Option<i32> {
                self.order
            }

            fn child_count(&self) -> usize {
                self.children.len()
            }

            fn child_selections(&self) -> impl Iterator<Item = bool> + '_ {
                self.children_iter().map(Selectable::is_selected)
            }
        }
    };
}

node_builders!(CheckboxNode);
node_builders!(CheckboxMapNode);

impl CheckboxNode {
    /// Append children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    fn children_iter(&self) -> impl Iterator<Item = &Self> + '_ {
        self.children.iter()
    }
}

impl CheckboxMapNode {
    /// Append children, keyed by their ids. A repeated id replaces the earlier child.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children
            .extend(children.into_iter().map(|child| (child.id.clone(), child)));
        self
    }

    fn children_iter(&self) -> impl Iterator<Item = &Self> + '_ {
        self.children.values()
    }
}

#[cfg(feature = "serde")]
mod serde_state {
    use super::NodeState;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Wire shape of [`NodeState`]: three flat booleans on the node object.
    #[derive(Default, Serialize, Deserialize)]
    #[serde(default)]
    struct StateRepr {
        selected: bool,
        indeterminate: bool,
        expanded: bool,
    }

    impl Serialize for NodeState {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            StateRepr {
                selected: self.contains(Self::SELECTED),
                indeterminate: self.contains(Self::INDETERMINATE),
                expanded: self.contains(Self::EXPANDED),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for NodeState {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = StateRepr::deserialize(deserializer)?;
            let mut state = Self::empty();
            state.set(Self::SELECTED, repr.selected);
            state.set(Self::INDETERMINATE, repr.indeterminate);
            state.set(Self::EXPANDED, repr.expanded);
            Ok(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unset() {
        let node = CheckboxNode::default();
        assert!(!node.is_selected());
        assert!(!node.is_indeterminate());
        assert!(!node.is_expanded());
        assert!(node.is_leaf());
        assert_eq!(node.color, None);
        assert_eq!(node.order, None);
    }

    #[test]
    fn builders_set_fields() {
        let node = CheckboxMapNode::new("a", "A")
            .with_selected(true)
            .with_expanded(true)
            .with_color(ThemeColor::Accent)
            .with_order(3);
        assert_eq!(node.id(), "a");
        assert_eq!(node.title(), "A");
        assert_eq!(node.state(), NodeState::SELECTED | NodeState::EXPANDED);
        assert_eq!(node.color(), Some(ThemeColor::Accent));
        assert_eq!(node.order(), Some(3));
    }

    #[test]
    fn map_children_are_keyed_by_id() {
        let node = CheckboxMapNode::new("p", "P").with_children([
            CheckboxMapNode::new("a", "A").with_selected(true),
            CheckboxMapNode::new("b", "B"),
        ]);
        assert_eq!(node.child_count(), 2);
        assert!(node.children.get("a").is_some_and(Selectable::is_selected));
        let selections: alloc::vec::Vec<bool> = node.child_selections().collect();
        assert_eq!(selections, [true, false]);
    }
}
