// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derive a parent's `selected`/`indeterminate` flags from its children.
//!
//! The rule, given the children's `selected` flags:
//!
//! - `indeterminate` holds iff there is at least one child and the flags
//!   contain both `true` and `false`.
//! - `selected` holds iff there is at least one child and every flag is `true`.
//! - With no children there is nothing to derive from, so the node keeps its
//!   own flags. A leaf's `selected` is authoritative.
//!
//! `EXPANDED` is never touched.

use crate::node::{NodeState, Selectable};

/// Apply the reconciliation rule to `prior` given the children's `selected` flags.
///
/// ```rust
/// use understory_checkbox_tree::{NodeState, derive_state};
///
/// assert_eq!(derive_state(NodeState::empty(), [true, true]), NodeState::SELECTED);
/// assert_eq!(derive_state(NodeState::SELECTED, [true, false]), NodeState::INDETERMINATE);
/// assert_eq!(derive_state(NodeState::SELECTED, []), NodeState::SELECTED);
/// ```
pub fn derive_state(prior: NodeState, children: impl IntoIterator<Item = bool>) -> NodeState {
    let mut any_child = false;
    let mut all_selected = true;
    let mut some_selected = false;
    for selected in children {
        any_child = true;
        all_selected &= selected;
        some_selected |= selected;
    }
    if !any_child {
        return prior;
    }

    let mut next = prior;
    next.set(NodeState::INDETERMINATE, some_selected && !all_selected);
    next.set(NodeState::SELECTED, all_selected);
    next
}

/// Recompute `node`'s flags from its current direct children.
pub fn reconcile<N: Selectable + ?Sized>(node: &mut N) {
    let next = derive_state(node.state(), node.child_selections());
    if next != node.state() {
        tracing::trace!(id = node.id(), ?next, "reconciled node state");
    }
    *node.state_mut() = next;
}
