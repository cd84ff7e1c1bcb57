// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for working-set-tree operations.
//!
//! The error taxonomy is deliberately small: most "not found" outcomes are
//! reported as plain `bool`/`Option` results rather than errors (see
//! `BTree::search`/`BTree::remove`). `WstError` only covers configuration
//! mistakes and the handful of operations that have no sensible default
//! when the structure is empty.

use std::fmt;

/// Standard `Result` type for all working-set-tree operations.
pub type WstResult<T> = Result<T, WstError>;

/// Error conditions raised by `BTree` and `WorkingSetTree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WstError {
    /// `min_degree` passed to a `BTree`/`WorkingSetTree` constructor was below 2.
    InvalidDegree { min_degree: usize },

    /// `max_height` passed to a `BTree` constructor was below 1.
    InvalidHeight { max_height: usize },

    /// `scale_factor` passed to a `WorkingSetTree` constructor was below 2.
    InvalidScaleFactor { scale_factor: usize },

    /// `remove_lru`/`remove_mru` called on a tree with no elements.
    EmptyTree,

    /// Internal bookkeeping expected a key that was not present.
    KeyNotFound,
}

impl fmt::Display for WstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDegree { min_degree } => {
                write!(
                    f,
                    "invalid minimum degree {}: must be >= 2",
                    min_degree
                )
            }
            Self::InvalidHeight { max_height } => {
                write!(f, "invalid max height {}: must be >= 1", max_height)
            }
            Self::InvalidScaleFactor { scale_factor } => {
                write!(f, "invalid scale factor {}: must be >= 2", scale_factor)
            }
            Self::EmptyTree => write!(f, "operation requires a non-empty tree"),
            Self::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for WstError {}
