// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Lightweight in-memory operation counters.
//!
//! The source this crate is modelled on (`reedbase`) ships a `metrics`
//! module built around a global `MetricsCollector` singleton that buffers
//! typed `Metric` values and periodically flushes them to a CSV backend.
//! Because this crate is entirely in-memory (`spec.md` §1 Non-goals:
//! "Persistence, durability, crash recovery"), there is no flush/storage
//! tier here — just the singleton-counter shape, kept for the same reason
//! the source keeps it: cheap, always-on visibility into how much
//! rebalancing work the structure is doing.
//!
//! ## Example
//! ```
//! use working_set_tree::metrics::WstMetrics;
//!
//! let before = WstMetrics::global().snapshot().splits;
//! WstMetrics::global().record_split();
//! assert_eq!(WstMetrics::global().snapshot().splits, before + 1);
//! ```

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

static METRICS: Lazy<Arc<WstMetrics>> = Lazy::new(|| Arc::new(WstMetrics::new()));

/// Point-in-time copy of the global counters, returned by `snapshot()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub splits: u64,
    pub merges: u64,
    pub steals: u64,
    pub predecessor_substitutions: u64,
    pub successor_substitutions: u64,
    pub shift_back_moves: u64,
    pub shift_forward_moves: u64,
    pub cascade_tree_count: u64,
}

#[derive(Debug, Default)]
struct Counters {
    splits: u64,
    merges: u64,
    steals: u64,
    predecessor_substitutions: u64,
    successor_substitutions: u64,
    shift_back_moves: u64,
    shift_forward_moves: u64,
    cascade_tree_count: u64,
}

/// Global counter registry for B-tree rebalancing and cascade shift activity.
pub struct WstMetrics {
    counters: RwLock<Counters>,
}

impl WstMetrics {
    fn new() -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
        }
    }

    /// Returns the global singleton instance.
    pub fn global() -> Arc<Self> {
        Arc::clone(&METRICS)
    }

    /// Resets every counter to zero. Intended for test isolation — tests
    /// that assert on these counters should run `#[serial]` (via
    /// `serial_test`) since the registry is process-global.
    pub fn reset(&self) {
        *self.counters.write().unwrap() = Counters::default();
    }

    pub fn record_split(&self) {
        self.counters.write().unwrap().splits += 1;
    }

    pub fn record_merge(&self) {
        self.counters.write().unwrap().merges += 1;
    }

    pub fn record_steal(&self) {
        self.counters.write().unwrap().steals += 1;
    }

    pub fn record_predecessor_substitution(&self) {
        self.counters.write().unwrap().predecessor_substitutions += 1;
    }

    pub fn record_successor_substitution(&self) {
        self.counters.write().unwrap().successor_substitutions += 1;
    }

    pub fn record_shift_back_move(&self) {
        self.counters.write().unwrap().shift_back_moves += 1;
    }

    pub fn record_shift_forward_move(&self) {
        self.counters.write().unwrap().shift_forward_moves += 1;
    }

    pub fn set_cascade_tree_count(&self, count: usize) {
        self.counters.write().unwrap().cascade_tree_count = count as u64;
    }

    /// Returns a consistent point-in-time copy of every counter.
    pub fn snapshot(&self) -> CountersSnapshot {
        let c = self.counters.read().unwrap();
        CountersSnapshot {
            splits: c.splits,
            merges: c.merges,
            steals: c.steals,
            predecessor_substitutions: c.predecessor_substitutions,
            successor_substitutions: c.successor_substitutions,
            shift_back_moves: c.shift_back_moves,
            shift_forward_moves: c.shift_forward_moves,
            cascade_tree_count: c.cascade_tree_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn counters_start_at_zero_after_reset() {
        WstMetrics::global().reset();
        let snap = WstMetrics::global().snapshot();
        assert_eq!(snap, CountersSnapshot::default());
    }

    #[test]
    #[serial]
    fn record_split_increments_counter() {
        WstMetrics::global().reset();
        WstMetrics::global().record_split();
        WstMetrics::global().record_split();
        assert_eq!(WstMetrics::global().snapshot().splits, 2);
    }
}
