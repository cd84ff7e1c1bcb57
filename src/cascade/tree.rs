// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The cascade manager: a sequence of `BTree`s of geometrically increasing
//! height cap, implementing the working-set property (`spec.md` §4.5, §8
//! scenarios 4-6): the most recently touched keys live in the shallowest
//! tree, and `shift_back`/`shift_forward` keep that invariant after every
//! top-level operation.

use crate::btree::BTree;
use crate::config::{CascadeConfig, BASE_HEIGHT};
use crate::error::WstResult;
use crate::metrics::WstMetrics;
use std::fmt;

/// An in-memory ordered dictionary amortising access cost toward recency of
/// use: a cascade of `BTree`s, each twice (by default) as tall as its
/// predecessor, with elements migrating outward on overflow and inward on
/// a cache-hit-like `search`.
///
/// ## Example
/// ```
/// use working_set_tree::WorkingSetTree;
///
/// let mut cascade = WorkingSetTree::new(2, 2).unwrap();
/// for k in 1..=16 {
///     cascade.insert(k);
/// }
/// assert!(cascade.search(&1));
/// assert_eq!(cascade.size(), 16);
/// ```
pub struct WorkingSetTree<K> {
    config: CascadeConfig,
    trees: Vec<BTree<K>>,
}

impl<K: Ord + Clone> WorkingSetTree<K> {
    /// Creates a cascade with a single tree, `trees[0]`, whose
    /// `max_height == BASE_HEIGHT`.
    ///
    /// ## Error Conditions
    /// - `WstError::InvalidDegree` if `min_degree < 2`.
    /// - `WstError::InvalidScaleFactor` if `scale_factor < 2`.
    pub fn new(min_degree: usize, scale_factor: usize) -> WstResult<Self> {
        let config = CascadeConfig::new(min_degree, scale_factor)?;
        let first = BTree::new(min_degree, BASE_HEIGHT)?;
        WstMetrics::global().set_cascade_tree_count(1);
        Ok(Self {
            config,
            trees: vec![first],
        })
    }

    /// Number of trees currently in the cascade.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Total number of keys across every tree in the cascade.
    pub fn size(&self) -> usize {
        self.trees.iter().map(BTree::size).sum()
    }

    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Test/introspection access to a specific tree's height cap and depth.
    pub fn tree(&self, i: usize) -> Option<&BTree<K>> {
        self.trees.get(i)
    }

    /// Inserts `key` into `trees[0]` as its MRU, then lets any resulting
    /// overflow cascade outward.
    pub fn insert(&mut self, key: K) {
        self.trees[0].insert(key);
        self.shift_back(0);
    }

    /// Searches the cascade outward from `trees[0]`. A hit promotes the
    /// key one tree inward (to MRU), then lets the working-set invariant
    /// re-settle on both sides of the move (`spec.md` §4.5).
    pub fn search(&mut self, key: &K) -> bool {
        for j in 0..self.trees.len() {
            if self.trees[j].search(key) {
                self.trees[j].remove(key);
                let target = if j == 0 { 0 } else { j - 1 };
                self.trees[target].insert(key.clone());
                self.shift_back(target);
                self.shift_forward(j);
                return true;
            }
        }
        false
    }

    /// Removes `key` from whichever tree holds it, then refills that tree
    /// from its deeper neighbour if it's now under-height.
    pub fn remove(&mut self, key: &K) -> bool {
        for j in 0..self.trees.len() {
            if self.trees[j].remove(key) {
                self.shift_forward(j);
                return true;
            }
        }
        false
    }

    /// Pushes LRU overflow from `trees[i]` into `trees[i+1]`, allocating
    /// `trees[i+1]` on demand, and recurses outward as long as each
    /// receiving tree itself ends up over its own height cap.
    fn shift_back(&mut self, mut i: usize) {
        loop {
            if self.trees[i].height() <= self.trees[i].max_height() {
                return;
            }
            self.ensure_tree_exists(i + 1);
            while self.trees[i].height() > self.trees[i].max_height() {
                let key = self.trees[i]
                    .remove_lru()
                    .expect("a tree exceeding its height cap cannot be empty");
                self.trees[i + 1].insert(key);
                WstMetrics::global().record_shift_back_move();
            }
            i += 1;
        }
    }

    /// Pulls MRU elements from `trees[i+1]` into `trees[i]` (as LRU there)
    /// until `trees[i]` reaches its height cap or its neighbour runs dry,
    /// then advances to refill `trees[i+1]` from `trees[i+2]` in turn.
    fn shift_forward(&mut self, mut i: usize) {
        while i + 1 < self.trees.len() {
            while self.trees[i].height() < self.trees[i].max_height() {
                if self.trees[i + 1].empty() {
                    break;
                }
                let key = self.trees[i + 1]
                    .remove_mru()
                    .expect("checked non-empty above");
                self.trees[i].insert_lru(key);
                WstMetrics::global().record_shift_forward_move();
            }
            i += 1;
        }
    }

    fn ensure_tree_exists(&mut self, i: usize) {
        while self.trees.len() <= i {
            let prev_max = self.trees.last().expect("cascade always has trees[0]").max_height();
            let new_max = prev_max * self.config.scale_factor();
            let new_tree = BTree::new(self.config.min_degree(), new_max)
                .expect("cascade config was validated at construction");
            self.trees.push(new_tree);
            WstMetrics::global().set_cascade_tree_count(self.trees.len());
        }
    }
}

impl<K: Ord + Clone + fmt::Display> WorkingSetTree<K> {
    /// Breadth-first dump of every tree, each prefixed `"Tree i:\n"`.
    pub fn to_string_cascade(&self) -> String {
        let mut out = String::new();
        for (i, t) in self.trees.iter().enumerate() {
            out.push_str(&format!("Tree {}:", i));
            out.push_str(&t.to_string_tree());
            out.push('\n');
        }
        out
    }

    /// Per-tree MRU/LRU list dump, each prefixed `"Tree i:\n"`.
    pub fn print_list(&self) -> String {
        let mut out = String::new();
        for (i, t) in self.trees.iter().enumerate() {
            out.push_str(&format!("Tree {}:\n", i));
            out.push_str(&t.print_ordered_mru());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
