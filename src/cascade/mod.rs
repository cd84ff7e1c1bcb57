// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The `WorkingSetTree` cascade manager built on top of `crate::btree`.

mod tree;

pub use tree::WorkingSetTree;
