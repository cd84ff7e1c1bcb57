// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Generic B-tree with an intrusive recency list.
//!
//! See `tree.rs` for `BTree<K>` itself; `element.rs`/`node.rs`/`recency.rs`
//! hold the arena-backed storage it's built from.

pub(crate) mod element;
pub(crate) mod node;
pub(crate) mod recency;

mod tree;

pub use tree::BTree;
