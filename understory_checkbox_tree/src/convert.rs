// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion between list-shaped and map-shaped trees.
//!
//! Both directions convert children first and then reconcile the parent from
//! the converted children, so the output is normalized: every parent's
//! `selected`/`indeterminate` flags are derived from its leaves regardless of
//! what the input stored on it.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::keyed::KeyedMap;
use crate::node::{CheckboxMapNode, CheckboxNode};
use crate::reconcile::reconcile;

/// Convert a list of nodes into a keyed container of map nodes.
///
/// Keys are node ids. A repeated id among siblings replaces the earlier
/// sibling in its original position; use [`try_list_to_map`] to reject it.
pub fn list_to_map(nodes: impl IntoIterator<Item = CheckboxNode>) -> KeyedMap<CheckboxMapNode> {
    let mut map = KeyedMap::new();
    for node in nodes {
        let node = CheckboxMapNode::from(node);
        if map.contains_key(&node.id) {
            tracing::warn!(id = %node.id, "duplicate sibling id replaces earlier node");
        }
        map.insert(node.id.clone(), node);
    }
    map
}

/// Like [`list_to_map`], but fails with [`Error::DuplicateKey`] if any sibling
/// group, at any depth, repeats an id.
pub fn try_list_to_map(
    nodes: impl IntoIterator<Item = CheckboxNode>,
) -> Result<KeyedMap<CheckboxMapNode>> {
    let mut map = KeyedMap::new();
    for mut node in nodes {
        if map.contains_key(&node.id) {
            return Err(Error::DuplicateKey(node.id));
        }
        let children = try_list_to_map(core::mem::take(&mut node.children))?;
        let converted = with_map_children(node, children);
        map.insert(converted.id.clone(), converted);
    }
    Ok(map)
}

/// Convert a keyed container of map nodes into a list, in iteration order.
pub fn map_to_list(map: KeyedMap<CheckboxMapNode>) -> Vec<CheckboxNode> {
    map.into_values().map(CheckboxNode::from).collect()
}

impl From<CheckboxNode> for CheckboxMapNode {
    fn from(mut node: CheckboxNode) -> Self {
        let children = list_to_map(core::mem::take(&mut node.children));
        with_map_children(node, children)
    }
}

/// Rebuild `node` around its already converted children and reconcile it.
///
/// `node.children` is discarded.
fn with_map_children(node: CheckboxNode, children: KeyedMap<CheckboxMapNode>) -> CheckboxMapNode {
    let CheckboxNode {
        id,
        title,
        state,
        color,
        order,
        children: _,
    } = node;
    let mut converted = CheckboxMapNode {
        id,
        title,
        state,
        color,
        order,
        children,
    };
    reconcile(&mut converted);
    converted
}

impl From<CheckboxMapNode> for CheckboxNode {
    fn from(node: CheckboxMapNode) -> Self {
        let CheckboxMapNode {
            id,
            title,
            state,
            color,
            order,
            children,
        } = node;
        let mut converted = Self {
            id,
            title,
            state,
            color,
            order,
            children: map_to_list(children),
        };
        reconcile(&mut converted);
        converted
    }
}
