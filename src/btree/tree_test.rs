// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn tree(min_degree: usize) -> BTree<i32> {
    BTree::new(min_degree, 10).unwrap()
}

#[test]
fn rejects_degree_below_two() {
    assert_eq!(
        BTree::<i32>::new(1, 10),
        Err(WstError::InvalidDegree { min_degree: 1 })
    );
}

#[test]
fn rejects_height_below_one() {
    assert_eq!(
        BTree::<i32>::new(2, 0),
        Err(WstError::InvalidHeight { max_height: 0 })
    );
}

#[test]
fn empty_tree_reports_empty_and_zero_size() {
    let t = tree(2);
    assert!(t.empty());
    assert_eq!(t.size(), 0);
    assert_eq!(t.height(), 1);
}

#[test]
fn search_finds_inserted_keys_and_misses_absent_ones() {
    let mut t = tree(2);
    for k in [5, 2, 8, 1, 9] {
        t.insert(k);
    }
    for k in [5, 2, 8, 1, 9] {
        assert!(t.search(&k), "expected {} to be present", k);
    }
    assert!(!t.search(&42));
}

/// Scenario 1 (insert 1..=5 into a t=2 tree): this crate's insert splits
/// proactively on the way down (CLRS-style, matching
/// `original_source/btree.h`), not reactively after the root itself
/// overflows. The root is still `[1,2,3]` when `4` arrives, so the split
/// happens *before* `4` descends: the median `2` is promoted to a new
/// root, `1` stays in the left leaf, `3` moves to the right leaf. Then
/// `4` and `5` both land to the right of `2` in that same right leaf.
/// Final shape: root `[2]`, leaves `[1]` and `[3,4,5]`; MRU list
/// `5 4 3 2 1`.
#[test]
fn split_cascade_matches_scenario_one() {
    let mut t = tree(2);
    for k in 1..=5 {
        t.insert(k);
    }
    assert_eq!(t.height(), 2);
    assert_eq!(t.size(), 5);
    assert_eq!(t.print_ordered_mru(), "MRU-> 5 4 3 2 1 <-LRU");

    let dump = t.to_string_tree();
    assert!(dump.contains("Level 1:"));
    assert!(dump.contains("Level 2:"));

    assert_eq!(
        t.level_keys(),
        vec![vec![vec![2]], vec![vec![1], vec![3, 4, 5]]],
        "root must hold [2] with leaves [1] and [3,4,5]"
    );
}

/// Scenario 2: predecessor substitution must preserve the predecessor's
/// recency-list position rather than inheriting the deleted key's.
#[test]
fn predecessor_substitution_preserves_recency_position() {
    let mut t = tree(2);
    for k in 1..=10 {
        t.insert(k);
    }
    assert!(t.search(&4));
    // `4` is now MRU.
    assert_eq!(t.list_front_key(), Some(4));

    assert!(t.remove(&5));
    assert!(t.search(&4), "predecessor key must still be present");
    assert_eq!(
        t.list_front_key(),
        Some(4),
        "predecessor substitution must not disturb its recency position"
    );
    assert!(!t.search(&5));
    assert_eq!(t.size(), 9);
}

/// Scenario 3: removing 1, 2, 3 from a freshly built 1..=4 tree collapses
/// the root into a single leaf holding `[4]`.
#[test]
fn merge_collapses_root() {
    let mut t = tree(2);
    for k in 1..=4 {
        t.insert(k);
    }
    assert!(t.remove(&1));
    assert!(t.remove(&2));
    assert!(t.remove(&3));

    assert_eq!(t.height(), 1);
    assert_eq!(t.size(), 1);
    assert!(t.search(&4));
}

#[test]
fn remove_absent_key_is_a_no_op() {
    let mut t = tree(2);
    t.insert(1);
    t.insert(2);
    assert!(!t.remove(&99));
    assert_eq!(t.size(), 2);
}

#[test]
fn remove_lru_and_mru_return_list_endpoints() {
    let mut t = tree(2);
    for k in 1..=6 {
        t.insert(k);
    }
    // insert() always places at MRU, so 6 is MRU and 1 is LRU.
    assert_eq!(t.remove_mru().unwrap(), 6);
    assert_eq!(t.remove_lru().unwrap(), 1);
    assert_eq!(t.size(), 4);
}

#[test]
fn remove_lru_on_empty_tree_errors() {
    let mut t: BTree<i32> = tree(2);
    assert_eq!(t.remove_lru(), Err(WstError::EmptyTree));
    assert_eq!(t.remove_mru(), Err(WstError::EmptyTree));
}

#[test]
fn insert_lru_places_new_key_at_tail() {
    let mut t = tree(2);
    t.insert(1);
    t.insert(2);
    t.insert_lru(0);
    assert_eq!(t.print_ordered_mru(), "MRU-> 2 1 0 <-LRU");
}

#[test]
fn round_trip_insert_remove_restores_size() {
    let mut t = tree(2);
    for k in 1..=30 {
        t.insert(k);
    }
    for k in 1..=30 {
        assert!(t.remove(&k));
    }
    assert!(t.empty());
    assert_eq!(t.size(), 0);
    assert_eq!(t.height(), 1);
}

/// Invariant I1: every non-root node has `t-1 <= num_keys <= 2t-1`. Walks
/// the whole tree via the arena directly (test-only access through `self`).
#[test]
fn invariant_node_key_counts_stay_in_range_under_churn() {
    let mut t = tree(2);
    for k in 1..=200 {
        t.insert(k);
    }
    for k in (1..=200).step_by(2) {
        t.remove(&k);
    }
    t.assert_node_key_counts_valid();
}

#[test]
fn invariant_recency_list_matches_key_multiset() {
    let mut t = tree(2);
    let mut inserted: Vec<i32> = (1..=50).collect();
    for &k in &inserted {
        t.insert(k);
    }
    for k in (1..=50).step_by(3) {
        t.remove(&k);
        inserted.retain(|&x| x != k);
    }
    let mut from_list: Vec<i32> = t.list.iter_mru_to_lru(&t.elements).map(|id| *t.elements.key(id)).collect();
    from_list.sort_unstable();
    inserted.sort_unstable();
    assert_eq!(from_list, inserted);
    assert_eq!(t.size(), inserted.len());
}

impl<K: Ord + Clone> BTree<K> {
    /// Test-only: key currently at the MRU end of the recency list.
    fn list_front_key(&self) -> Option<K> {
        self.list.front().map(|id| self.elements.key(id).clone())
    }

    /// Test-only: breadth-first dump of each level's per-node key lists,
    /// independent of the recency-list next/prev values `to_string_tree`
    /// embeds. Used for pinning exact tree shape in scenario tests.
    fn level_keys(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels = Vec::new();
        let mut current = vec![self.root];
        while !current.is_empty() {
            let mut this_level = Vec::new();
            let mut next = Vec::new();
            for &node_id in &current {
                let node = self.nodes.get(node_id);
                this_level.push(
                    node.keys
                        .iter()
                        .map(|&id| self.elements.key(id).clone())
                        .collect(),
                );
                if !node.is_leaf {
                    next.extend_from_slice(&node.children);
                }
            }
            levels.push(this_level);
            current = next;
        }
        levels
    }

    /// Test-only: walks every node and asserts invariant I1.
    fn assert_node_key_counts_valid(&self) {
        self.assert_node_key_counts_valid_from(self.root, true);
    }

    fn assert_node_key_counts_valid_from(&self, node_id: NodeId, is_root: bool) {
        let node = self.nodes.get(node_id);
        if !is_root {
            assert!(
                node.num_keys() >= self.min_degree - 1,
                "non-root node underflowed below t-1"
            );
        }
        assert!(
            node.num_keys() <= 2 * self.min_degree - 1,
            "node overflowed above 2t-1"
        );
        if !node.is_leaf {
            for &child in &node.children {
                self.assert_node_key_counts_valid_from(child, false);
            }
        }
    }
}
