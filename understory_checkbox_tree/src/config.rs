// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Options for a [`Checkboxes`](crate::Checkboxes) controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CheckboxesConfig {
    /// Offer expand/collapse on parent nodes. Defaults to `true`.
    ///
    /// When disabled, [`Checkboxes::toggle_expand`](crate::Checkboxes::toggle_expand)
    /// is a no-op.
    pub expandable: bool,
}

impl Default for CheckboxesConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckboxesConfig {
    /// Default configuration: expandable.
    pub const fn new() -> Self {
        Self { expandable: true }
    }

    /// Set whether nodes can be expanded and collapsed.
    #[must_use]
    pub const fn with_expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }
}
