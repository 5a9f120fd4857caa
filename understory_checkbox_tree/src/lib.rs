// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_checkbox_tree --heading-base-level=0

//! Understory Checkbox Tree: a hierarchical checkbox model with cascade and bubbling.
//!
//! This crate provides the state half of a tree of checkboxes: parents whose
//! checked state follows their children, and children that follow a parent
//! when it is toggled. It is renderer-agnostic and does not know about any
//! particular UI framework.
//!
//! ## Two shapes of the same tree
//!
//! - [`CheckboxNode`]: children as an ordered `Vec`. This is what hosts usually
//!   build and render.
//! - [`CheckboxMapNode`]: children in a [`KeyedMap`], an insertion-ordered map
//!   from id to node with a uniqueness check on merge. This is what mutations
//!   work on, since a child can be found by key.
//!
//! [`list_to_map`] and [`map_to_list`] convert between them. Both convert
//! children first and then derive each parent's `selected` and
//! `indeterminate` flags from its children, so the output is always
//! consistent whatever the input stored on parents.
//!
//! ## State rule
//!
//! For a node with children:
//! - `indeterminate` iff some but not all children are selected,
//! - `selected` iff all children are selected.
//!
//! A node without children keeps its own flags. See [`derive_state`].
//!
//! ## Operations
//!
//! - [`toggle`] / [`toggle_with`]: cascade a value down a subtree.
//! - [`apply_child_change`]: store a changed child and recompute its parent,
//!   one level only.
//! - [`flatten`] / [`flatten_all`]: lazy depth-first walk over leaves.
//! - [`toggle_expand`]: flip the UI-only `expanded` flag.
//! - [`sort_list_by_order`] / [`sort_map_by_order`]: stable reorder by `order`.
//!
//! Nodes are values: operations return the replacement node rather than
//! mutating shared state, and side effects are passed in as callbacks.
//!
//! ## Controller
//!
//! [`Checkboxes`] owns one tree and plays the role of the widget: it applies
//! toggles and child changes by key and after each one returns [`Changes`],
//! four views of the same state (hierarchy, hierarchy map, flat leaves, and the
//! single changed entry).
//!
//! ```rust
//! use understory_checkbox_tree::{Checkboxes, CheckboxesConfig, CheckboxNode, Selectable};
//!
//! let mut boxes = Checkboxes::from_nodes(
//!     [CheckboxNode::new("fruit", "Fruit").with_children([
//!         CheckboxNode::new("apple", "Apple"),
//!         CheckboxNode::new("pear", "Pear"),
//!     ])],
//!     CheckboxesConfig::default(),
//! );
//!
//! boxes.checkbox_change("apple", true);
//! let changes = boxes.bubble("apple");
//!
//! let (key, fruit) = changes.changed.unwrap();
//! assert_eq!(key, "fruit");
//! assert!(fruit.is_indeterminate());
//! assert_eq!(changes.flat.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for nodes, [`KeyedMap`], and
//!   [`CheckboxesConfig`]. Node state is written as flat `selected`,
//!   `indeterminate`, and `expanded` booleans, and every node field is
//!   optional on input.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod checkboxes;
mod config;
mod convert;
mod error;
mod keyed;
mod node;
mod ops;
mod reconcile;

pub use checkboxes::{Changes, Checkboxes, NodeEntry};
pub use config::CheckboxesConfig;
pub use convert::{list_to_map, map_to_list, try_list_to_map};
pub use error::{Error, Result};
pub use keyed::{Iter, KeyedMap};
pub use node::{CheckboxMapNode, CheckboxNode, NodeState, Selectable, ThemeColor};
pub use ops::{
    Leaves, apply_child_change, flatten, flatten_all, sort_list_by_order, sort_map_by_order,
    toggle, toggle_expand, toggle_with,
};
pub use reconcile::{derive_state, reconcile};
