// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Generic B-tree with an intrusive, co-maintained recency list.
//!
//! Implements `spec.md` §4.3/§4.4: a classic minimum-degree-`t` B-tree whose
//! every key additionally carries a position in a per-tree MRU/LRU list.
//! Splits, merges, steals and the predecessor/successor delete substitution
//! are all ordinary CLRS B-tree algorithms operating on `ElementId`/`NodeId`
//! handles rather than raw keys — see `element.rs` for why that sidesteps
//! the "re-patch pointers after every relocation" hazard the reference
//! implementation has to manage by hand.

use super::element::{ElementArena, ElementId};
use super::node::{NodeArena, NodeId};
use super::recency::RecencyList;
use crate::config::estimate_free_nodes;
use crate::error::{WstError, WstResult};
use crate::metrics::WstMetrics;
use std::fmt;

/// A minimum-degree-`t` B-tree whose keys are also threaded through an
/// intrusive MRU/LRU recency list.
///
/// ## Type Parameters
/// - `K`: key type. Must be `Ord` (total order over keys) and `Clone`
///   (`remove_lru`/`remove_mru` hand back an owned key, and the reference
///   implementation's `T` is copied by value throughout).
///
/// ## Thread Safety
/// Not thread-safe; see `spec.md` §5. Callers must serialize access.
pub struct BTree<K> {
    min_degree: usize,
    max_height: usize,
    height: usize,
    size: usize,
    root: NodeId,
    nodes: NodeArena,
    elements: ElementArena<K>,
    list: RecencyList,
}

impl<K: Ord + Clone> BTree<K> {
    /// Creates an empty B-tree.
    ///
    /// ## Error Conditions
    /// - `WstError::InvalidDegree` if `min_degree < 2`.
    /// - `WstError::InvalidHeight` if `max_height < 1`.
    pub fn new(min_degree: usize, max_height: usize) -> WstResult<Self> {
        if min_degree < 2 {
            return Err(WstError::InvalidDegree { min_degree });
        }
        if max_height < 1 {
            return Err(WstError::InvalidHeight { max_height });
        }

        let mut nodes = NodeArena::new();
        let root = nodes.alloc(true, min_degree);
        nodes.reserve_free_pool(estimate_free_nodes(min_degree, max_height), min_degree);

        Ok(Self {
            min_degree,
            max_height,
            height: 1,
            size: 0,
            root,
            nodes,
            elements: ElementArena::new(),
            list: RecencyList::new(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn empty(&self) -> bool {
        self.size == 0
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Returns whether `key` is currently stored in the tree.
    pub fn search(&self, key: &K) -> bool {
        self.search_node(key).is_some()
    }

    fn search_node(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut node_id = self.root;
        loop {
            let node = self.nodes.get(node_id);
            let mut i = 0;
            while i < node.num_keys() && key > self.elements.key(node.keys[i]) {
                i += 1;
            }
            if i < node.num_keys() && key == self.elements.key(node.keys[i]) {
                return Some((node_id, i));
            }
            if node.is_leaf {
                return None;
            }
            node_id = node.children[i];
        }
    }

    /// Inserts `key`, splicing the new Element in as the MRU.
    ///
    /// Behaviour on a duplicate key is unspecified (`spec.md` §7); this
    /// implementation inserts a second Element without checking for a
    /// pre-existing match.
    ///
    /// ## Output
    /// Number of tree levels traversed during descent (>= 1).
    pub fn insert(&mut self, key: K) -> usize {
        self.insert_internal(key, true)
    }

    /// Inserts `key`, splicing the new Element in as the LRU.
    pub fn insert_lru(&mut self, key: K) -> usize {
        self.insert_internal(key, false)
    }

    fn insert_internal(&mut self, key: K, mru: bool) -> usize {
        if self.nodes.get(self.root).is_full(self.min_degree) {
            let old_root = self.root;
            let new_root = self.nodes.alloc(false, self.min_degree);
            self.nodes.get_mut(new_root).children.push(old_root);
            self.root = new_root;
            self.height += 1;
            self.split_child(new_root, 0);
        }
        let levels = self.insert_nonfull(self.root, key, mru, 1);
        self.size += 1;
        levels
    }

    fn insert_nonfull(&mut self, node_id: NodeId, key: K, mru: bool, level: usize) -> usize {
        let is_leaf = self.nodes.get(node_id).is_leaf;
        let mut i = self.nodes.get(node_id).num_keys();
        while i > 0 && key < *self.elements.key(self.nodes.get(node_id).keys[i - 1]) {
            i -= 1;
        }

        if is_leaf {
            let id = self.elements.alloc(key);
            if mru {
                self.list.push_front(&mut self.elements, id);
            } else {
                self.list.push_back(&mut self.elements, id);
            }
            self.nodes.get_mut(node_id).keys.insert(i, id);
            return level;
        }

        let mut child = self.nodes.get(node_id).children[i];
        if self.nodes.get(child).is_full(self.min_degree) {
            self.split_child(node_id, i);
            if key > *self.elements.key(self.nodes.get(node_id).keys[i]) {
                i += 1;
            }
            child = self.nodes.get(node_id).children[i];
        }
        self.insert_nonfull(child, key, mru, level + 1)
    }

    /// Splits the full child `parent.children[i]` around its median key.
    ///
    /// `parent.children[t..2t-1]`'s right half becomes a new sibling node,
    /// and the median key is promoted into `parent.keys[i]` — `spec.md`
    /// §4.4 "Split-child". `Vec::split_off`/`Vec::insert` implement the
    /// shifts the source performs with manual index arithmetic.
    fn split_child(&mut self, parent_id: NodeId, i: usize) {
        let t = self.min_degree;
        let left_id = self.nodes.get(parent_id).children[i];

        let (mid_key, right_keys, right_children, left_is_leaf) = {
            let left = self.nodes.get_mut(left_id);
            let right_keys = left.keys.split_off(t);
            let mid_key = left.keys.pop().expect("split_child called on a non-full node");
            let right_children = if left.is_leaf {
                Vec::new()
            } else {
                left.children.split_off(t)
            };
            (mid_key, right_keys, right_children, left.is_leaf)
        };

        let right_id = self.nodes.alloc(left_is_leaf, t);
        {
            let right = self.nodes.get_mut(right_id);
            right.keys = right_keys;
            right.children = right_children;
        }

        let parent = self.nodes.get_mut(parent_id);
        parent.children.insert(i + 1, right_id);
        parent.keys.insert(i, mid_key);

        WstMetrics::global().record_split();
    }

    /// Removes `key` if present.
    ///
    /// ## Output
    /// `true` if `key` was found and removed, `false` if it was absent
    /// (the tree is left unmodified in that case).
    pub fn remove(&mut self, key: &K) -> bool {
        if self.search_node(key).is_none() {
            return false;
        }
        self.remove_key(self.root, key);
        self.size -= 1;
        true
    }

    /// Removes and returns the LRU (least recently used) key.
    ///
    /// ## Error Conditions
    /// `WstError::EmptyTree` if the tree holds no elements.
    pub fn remove_lru(&mut self) -> WstResult<K> {
        let id = self.list.back().ok_or(WstError::EmptyTree)?;
        let key = self.elements.key(id).clone();
        self.remove(&key);
        Ok(key)
    }

    /// Removes and returns the MRU (most recently used) key.
    ///
    /// ## Error Conditions
    /// `WstError::EmptyTree` if the tree holds no elements.
    pub fn remove_mru(&mut self) -> WstResult<K> {
        let id = self.list.front().ok_or(WstError::EmptyTree)?;
        let key = self.elements.key(id).clone();
        self.remove(&key);
        Ok(key)
    }

    /// Deletes `key` from the subtree rooted at `node_id`.
    ///
    /// Caller must guarantee `key` is present somewhere in this subtree,
    /// and that `node_id` is either the root or already has `>= min_degree`
    /// keys (CLRS's "fatten before you descend" invariant) — `remove`
    /// establishes the former; this function and `fatten` establish the
    /// latter for every recursive call it makes.
    fn remove_key(&mut self, node_id: NodeId, key: &K) {
        let t = self.min_degree;
        let num_keys = self.nodes.get(node_id).num_keys();
        let mut i = 0;
        while i < num_keys && key > self.elements.key(self.nodes.get(node_id).keys[i]) {
            i += 1;
        }
        let found = i < num_keys && key == self.elements.key(self.nodes.get(node_id).keys[i]);
        let is_leaf = self.nodes.get(node_id).is_leaf;

        if found {
            if is_leaf {
                // Case 1.
                let id = self.nodes.get_mut(node_id).keys.remove(i);
                self.list.unlink(&mut self.elements, id);
                self.elements.free(id);
                return;
            }

            let left = self.nodes.get(node_id).children[i];
            let right = self.nodes.get(node_id).children[i + 1];
            if self.nodes.get(left).num_keys() >= t {
                // Case 2a: predecessor substitution. The predecessor's
                // Element keeps its recency-list position; only the
                // discarded key's Element is unlinked.
                let p_id = self.remove_max(left);
                self.discard_and_replace(node_id, i, p_id);
                WstMetrics::global().record_predecessor_substitution();
            } else if self.nodes.get(right).num_keys() >= t {
                // Case 2b: symmetric with the successor.
                let s_id = self.remove_min(right);
                self.discard_and_replace(node_id, i, s_id);
                WstMetrics::global().record_successor_substitution();
            } else {
                // Case 2c: both children are minimal, merge them around
                // keys[i] and recurse into the merged node.
                let merged = self.merge_children(node_id, i);
                self.remove_key(merged, key);
            }
        } else {
            // Case 3: key lives under children[i].
            let child = self.nodes.get(node_id).children[i];
            let i = if self.nodes.get(child).num_keys() == t - 1 {
                self.fatten(node_id, i)
            } else {
                i
            };
            let child = self.nodes.get(node_id).children[i];
            self.remove_key(child, key);
        }
    }

    /// Unlinks and frees the Element currently at `node.keys[i]`, then
    /// installs `replacement` (an Element relocated, not copied, from a
    /// leaf elsewhere) in its place. Implements the "new_pos" splice
    /// `spec.md` §4.4/§9 describes for the predecessor/successor trick.
    fn discard_and_replace(&mut self, node_id: NodeId, i: usize, replacement: ElementId) {
        let discarded = self.nodes.get(node_id).keys[i];
        self.list.unlink(&mut self.elements, discarded);
        self.elements.free(discarded);
        self.nodes.get_mut(node_id).keys[i] = replacement;
    }

    /// Removes and returns (without unlinking from the recency list) the
    /// maximum-key Element in the subtree rooted at `node_id`.
    fn remove_max(&mut self, node_id: NodeId) -> ElementId {
        let t = self.min_degree;
        if self.nodes.get(node_id).is_leaf {
            return self
                .nodes
                .get_mut(node_id)
                .keys
                .pop()
                .expect("predecessor descent reached an empty leaf");
        }
        let last = self.nodes.get(node_id).num_keys();
        let child = self.nodes.get(node_id).children[last];
        let last = if self.nodes.get(child).num_keys() == t - 1 {
            self.fatten(node_id, last)
        } else {
            last
        };
        let child = self.nodes.get(node_id).children[last];
        self.remove_max(child)
    }

    /// Removes and returns (without unlinking from the recency list) the
    /// minimum-key Element in the subtree rooted at `node_id`.
    fn remove_min(&mut self, node_id: NodeId) -> ElementId {
        let t = self.min_degree;
        if self.nodes.get(node_id).is_leaf {
            return self.nodes.get_mut(node_id).keys.remove(0);
        }
        let child = self.nodes.get(node_id).children[0];
        let first = if self.nodes.get(child).num_keys() == t - 1 {
            self.fatten(node_id, 0)
        } else {
            0
        };
        let child = self.nodes.get(node_id).children[first];
        self.remove_min(child)
    }

    /// Ensures `parent.children[i]` holds at least `min_degree` keys,
    /// stealing from a sibling or merging as needed (`spec.md` §4.4 Case
    /// 3). Returns the child's index after the operation — merging with
    /// the left sibling shifts it to `i - 1`.
    fn fatten(&mut self, parent_id: NodeId, i: usize) -> usize {
        let t = self.min_degree;
        let num_keys = self.nodes.get(parent_id).num_keys();
        let has_left = i > 0;
        let has_right = i < num_keys;

        if has_left
            && self
                .nodes
                .get(self.nodes.get(parent_id).children[i - 1])
                .num_keys()
                >= t
        {
            self.steal_from_left_neighbor(parent_id, i);
            i
        } else if has_right
            && self
                .nodes
                .get(self.nodes.get(parent_id).children[i + 1])
                .num_keys()
                >= t
        {
            self.steal_from_right_neighbor(parent_id, i);
            i
        } else if has_left {
            self.merge_children(parent_id, i - 1);
            i - 1
        } else {
            self.merge_children(parent_id, i);
            i
        }
    }

    /// Rotates a key through the parent separator from the left sibling:
    /// the sibling's last key moves up into `parent.keys[i-1]`, and the old
    /// separator moves down to become `children[i]`'s new first key.
    fn steal_from_left_neighbor(&mut self, parent_id: NodeId, i: usize) {
        let left_id = self.nodes.get(parent_id).children[i - 1];
        let right_id = self.nodes.get(parent_id).children[i];

        let (donated_key, donated_child) = {
            let left = self.nodes.get_mut(left_id);
            let key = left.keys.pop().expect("left sibling has >= t keys");
            let child = if left.is_leaf {
                None
            } else {
                Some(left.children.pop().expect("internal sibling has a child"))
            };
            (key, child)
        };

        let separator = self.nodes.get(parent_id).keys[i - 1];
        {
            let right = self.nodes.get_mut(right_id);
            right.keys.insert(0, separator);
            if let Some(child) = donated_child {
                right.children.insert(0, child);
            }
        }
        self.nodes.get_mut(parent_id).keys[i - 1] = donated_key;

        WstMetrics::global().record_steal();
    }

    /// Symmetric with `steal_from_left_neighbor`: the right sibling's
    /// first key moves up into `parent.keys[i]`, the old separator moves
    /// down to become `children[i]`'s new last key.
    fn steal_from_right_neighbor(&mut self, parent_id: NodeId, i: usize) {
        let left_id = self.nodes.get(parent_id).children[i];
        let right_id = self.nodes.get(parent_id).children[i + 1];

        let (donated_key, donated_child) = {
            let right = self.nodes.get_mut(right_id);
            let key = right.keys.remove(0);
            let child = if right.is_leaf {
                None
            } else {
                Some(right.children.remove(0))
            };
            (key, child)
        };

        let separator = self.nodes.get(parent_id).keys[i];
        {
            let left = self.nodes.get_mut(left_id);
            left.keys.push(separator);
            if let Some(child) = donated_child {
                left.children.push(child);
            }
        }
        self.nodes.get_mut(parent_id).keys[i] = donated_key;

        WstMetrics::global().record_steal();
    }

    /// Merges `parent.children[i]` and `parent.children[i+1]` around
    /// `parent.keys[i]` into a single node, recycling the right sibling.
    /// If `parent` is the root and becomes empty, the merged node becomes
    /// the new root and `height` decreases — `spec.md` §4.4.
    fn merge_children(&mut self, parent_id: NodeId, i: usize) -> NodeId {
        let left_id = self.nodes.get(parent_id).children[i];
        let right_id = self.nodes.get(parent_id).children[i + 1];

        let separator = self.nodes.get_mut(parent_id).keys.remove(i);
        self.nodes.get_mut(parent_id).children.remove(i + 1);

        let (mut right_keys, mut right_children) = {
            let right = self.nodes.get_mut(right_id);
            (
                std::mem::take(&mut right.keys),
                std::mem::take(&mut right.children),
            )
        };
        {
            let left = self.nodes.get_mut(left_id);
            left.keys.push(separator);
            left.keys.append(&mut right_keys);
            left.children.append(&mut right_children);
        }
        self.nodes.free(right_id);
        WstMetrics::global().record_merge();

        if parent_id == self.root && self.nodes.get(parent_id).num_keys() == 0 {
            self.nodes.free(self.root);
            self.root = left_id;
            self.height -= 1;
        }

        left_id
    }
}

impl<K: Ord + Clone> Default for BTree<K> {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_MIN_DEGREE,
            crate::config::DEFAULT_MAX_HEIGHT,
        )
        .expect("default configuration is always valid")
    }
}

impl<K: Ord + Clone + fmt::Display> BTree<K> {
    /// Breadth-first dump, one line per level:
    /// `"\nLevel L: <node> <node> …"`. Debug/test-only; not a stability
    /// surface (`spec.md` §6).
    pub fn to_string_tree(&self) -> String {
        let mut out = String::new();
        let mut current_level = vec![self.root];
        let mut level = 1;
        while !current_level.is_empty() {
            out.push_str(&format!("\nLevel {}:", level));
            let mut next_level = Vec::new();
            for &node_id in &current_level {
                out.push(' ');
                out.push_str(&self.node_to_string(node_id));
                let node = self.nodes.get(node_id);
                if !node.is_leaf {
                    next_level.extend_from_slice(&node.children);
                }
            }
            current_level = next_level;
            level += 1;
        }
        out
    }

    /// `"( *num_keys,cap_keys,cap_children,is_leaf* #k,next_k,prev_k# … )"`.
    fn node_to_string(&self, node_id: NodeId) -> String {
        let node = self.nodes.get(node_id);
        let cap_keys = 2 * self.min_degree - 1;
        let cap_children = 2 * self.min_degree;
        let mut out = format!(
            "( *{},{},{},{}* ",
            node.num_keys(),
            cap_keys,
            cap_children,
            node.is_leaf as u8
        );
        for &id in &node.keys {
            out.push_str(&self.element_to_string(id));
            out.push(' ');
        }
        out.push(')');
        out
    }

    fn element_to_string(&self, id: ElementId) -> String {
        let slot = self.elements.get(id);
        let next_key = slot
            .next
            .map(|n| self.elements.key(n).to_string())
            .unwrap_or_else(|| slot.key.to_string());
        let prev_key = slot
            .prev
            .map(|p| self.elements.key(p).to_string())
            .unwrap_or_else(|| slot.key.to_string());
        format!("#{},{},{}#", slot.key, next_key, prev_key)
    }

    /// `"MRU-> k1 k2 … <-LRU"`.
    pub fn print_ordered_mru(&self) -> String {
        let mut out = String::from("MRU-> ");
        for id in self.list.iter_mru_to_lru(&self.elements) {
            out.push_str(&self.elements.key(id).to_string());
            out.push(' ');
        }
        out.push_str("<-LRU");
        out
    }

    /// `"(tail) LRU-> k_n … <-MRU"`.
    pub fn print_ordered_tail(&self) -> String {
        let mut out = String::from("(tail) LRU-> ");
        let ordered: Vec<ElementId> = self.list.iter_mru_to_lru(&self.elements).collect();
        for id in ordered.into_iter().rev() {
            out.push_str(&self.elements.key(id).to_string());
            out.push(' ');
        }
        out.push_str("<-MRU");
        out
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
