// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by checkbox tree containers and conversions.

use alloc::string::String;

/// Errors raised by this crate.
///
/// Only container merges (and the strict list conversion) can fail. Operations
/// that address a missing node are silent no-ops rather than errors.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Two containers being merged share a key.
    #[error("each element must have a unique id, found `{0}` more than once")]
    DuplicateKey(String),
}

/// Result alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
