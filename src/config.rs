// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tunable defaults and construction-time validation.
//!
//! Mirrors the source's free-standing constants (`DEFAULT_MIN_DEGREE`,
//! `DEFAULT_MAX_HEIGHT`, `BASE_HEIGHT`, `DEFAULT_SCALE_FACTOR`,
//! `MAX_NUM_FREE_NODES`) as named `const`s, plus a small validated config
//! struct for `WorkingSetTree` so bad parameters are rejected at
//! construction instead of surfacing as a panic deep inside a split.

use crate::error::{WstError, WstResult};

/// Minimum degree used when a `BTree`/`WorkingSetTree` is built with `default()`.
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Per-tree height cap used when a `BTree` is built with `default()`.
pub const DEFAULT_MAX_HEIGHT: usize = 10;

/// `max_height` of `trees[0]` in a freshly constructed `WorkingSetTree`.
pub const BASE_HEIGHT: usize = 2;

/// Growth factor applied to `max_height` between adjacent cascade trees.
pub const DEFAULT_SCALE_FACTOR: usize = 2;

/// Hard cap on how many nodes a `BTree`'s free-pool will pre-allocate.
///
/// The source computes `num_free_nodes` geometrically from `min_degree` and
/// `max_height` and then clamps it to `MAX_NUM_FREE_NODES`; this crate keeps
/// that clamp so a misconfigured (very tall, very wide) tree cannot blow up
/// construction time pre-allocating nodes it may never use.
pub const MAX_FREE_NODES: usize = 350_000;

/// Validated configuration for a `WorkingSetTree` cascade.
///
/// ## Example
/// ```
/// use working_set_tree::config::CascadeConfig;
///
/// let config = CascadeConfig::new(2, 2).unwrap();
/// assert_eq!(config.min_degree(), 2);
/// assert_eq!(config.scale_factor(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeConfig {
    min_degree: usize,
    scale_factor: usize,
}

impl CascadeConfig {
    /// Validates `min_degree >= 2` and `scale_factor >= 2`.
    ///
    /// ## Error Conditions
    /// - `WstError::InvalidDegree` if `min_degree < 2`.
    /// - `WstError::InvalidScaleFactor` if `scale_factor < 2`.
    pub fn new(min_degree: usize, scale_factor: usize) -> WstResult<Self> {
        if min_degree < 2 {
            return Err(WstError::InvalidDegree { min_degree });
        }
        if scale_factor < 2 {
            return Err(WstError::InvalidScaleFactor { scale_factor });
        }
        Ok(Self {
            min_degree,
            scale_factor,
        })
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    pub fn scale_factor(&self) -> usize {
        self.scale_factor
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// Estimates a free-node pre-allocation count for a tree of the given shape,
/// following the source's "one root plus the maximum possible extra node per
/// level" geometric estimate, clamped to `MAX_FREE_NODES`.
pub fn estimate_free_nodes(min_degree: usize, max_height: usize) -> usize {
    let fanout = min_degree * 2;
    let mut total: usize = 1;
    let mut level_nodes: usize = 1;
    for _ in 1..max_height {
        level_nodes = level_nodes.saturating_mul(fanout);
        total = total.saturating_add(level_nodes);
        if total > MAX_FREE_NODES {
            return MAX_FREE_NODES;
        }
    }
    total.min(MAX_FREE_NODES)
}
