// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `BTree<K>` operation benchmarks.
//!
//! Measures performance of:
//! - insert() - sequential and random key insertion (split-heavy)
//! - search() - ordered-key lookup
//! - remove() - deletion, including the predecessor/successor substitution
//!   and merge paths
//! - remove_lru() - LRU eviction, the cascade's hot path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::thread_rng;
use working_set_tree::BTree;

fn bench_insert_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert_sequential");
    for &size in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut tree = BTree::new(16, 24).unwrap();
                for k in 0..size {
                    tree.insert(black_box(k));
                }
                black_box(tree.size());
            });
        });
    }
    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert_random");
    for &size in &[100usize, 1_000, 10_000] {
        let mut keys: Vec<usize> = (0..size).collect();
        keys.shuffle(&mut thread_rng());
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = BTree::new(16, 24).unwrap();
                for &k in keys {
                    tree.insert(black_box(k));
                }
                black_box(tree.size());
            });
        });
    }
    group.finish();
}

fn bench_search_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_search_hit");
    for &size in &[1_000usize, 10_000, 100_000] {
        let mut tree = BTree::new(16, 24).unwrap();
        for k in 0..size {
            tree.insert(k);
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                black_box(tree.search(&(size / 2)));
            });
        });
    }
    group.finish();
}

fn bench_remove_with_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_remove");
    group.sample_size(20);
    for &size in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut tree = BTree::new(4, 24).unwrap();
                    for k in 0..size {
                        tree.insert(k);
                    }
                    tree
                },
                |mut tree| {
                    for k in 0..size {
                        black_box(tree.remove(&k));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_remove_lru(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_remove_lru");
    for &size in &[1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut tree = BTree::new(8, 24).unwrap();
                    for k in 0..size {
                        tree.insert(k);
                    }
                    tree
                },
                |mut tree| {
                    while !tree.empty() {
                        black_box(tree.remove_lru().unwrap());
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sequential,
    bench_insert_random,
    bench_search_hit,
    bench_remove_with_rebuild,
    bench_remove_lru
);
criterion_main!(benches);
