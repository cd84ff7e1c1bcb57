// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Intrusive circular doubly-linked recency list over `ElementId`s.
//!
//! Matches `spec.md` §4.1: `push_front` makes an Element the MRU,
//! `move_to_back` makes it the LRU, `unlink` removes it outright. All three
//! are O(1). Because Elements live in a stable arena (see `element.rs`),
//! this is the *only* code in the crate allowed to touch `prev`/`next` —
//! B-tree structural operations (split/merge/steal/predecessor
//! substitution) move `ElementId`s between node slots without ever calling
//! into this module, since the arena slot identity — and therefore the
//! list linkage — does not change.

use super::element::{ElementArena, ElementId};

/// Head/tail of the circular list. `head` is the MRU Element, `tail` the
/// LRU Element; both are `None` when the list is empty.
#[derive(Debug, Default)]
pub(crate) struct RecencyList {
    head: Option<ElementId>,
    tail: Option<ElementId>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front(&self) -> Option<ElementId> {
        self.head
    }

    pub fn back(&self) -> Option<ElementId> {
        self.tail
    }

    /// Splices `id` in as the new MRU (front of the list).
    ///
    /// `id` must not already be linked.
    pub fn push_front<K>(&mut self, arena: &mut ElementArena<K>, id: ElementId) {
        arena.get_mut(id).prev = None;
        arena.get_mut(id).next = self.head;
        if let Some(old_head) = self.head {
            arena.get_mut(old_head).prev = Some(id);
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
    }

    /// Splices `id` in as the new LRU (back of the list).
    ///
    /// `id` must not already be linked.
    pub fn push_back<K>(&mut self, arena: &mut ElementArena<K>, id: ElementId) {
        arena.get_mut(id).next = None;
        arena.get_mut(id).prev = self.tail;
        if let Some(old_tail) = self.tail {
            arena.get_mut(old_tail).next = Some(id);
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
    }

    /// Removes `id` from wherever it currently sits in the list.
    pub fn unlink<K>(&mut self, arena: &mut ElementArena<K>, id: ElementId) {
        let (prev, next) = {
            let slot = arena.get(id);
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => arena.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena.get_mut(n).prev = prev,
            None => self.tail = prev,
        }
        let slot = arena.get_mut(id);
        slot.prev = None;
        slot.next = None;
    }

    /// Unlinks `id` and re-splices it at the back (LRU end).
    pub fn move_to_back<K>(&mut self, arena: &mut ElementArena<K>, id: ElementId) {
        self.unlink(arena, id);
        self.push_back(arena, id);
    }

    /// Unlinks `id` and re-splices it at the front (MRU end).
    pub fn move_to_front<K>(&mut self, arena: &mut ElementArena<K>, id: ElementId) {
        self.unlink(arena, id);
        self.push_front(arena, id);
    }

    /// Walks the list from MRU to LRU, yielding each `ElementId` in order.
    pub fn iter_mru_to_lru<'a, K>(
        &self,
        arena: &'a ElementArena<K>,
    ) -> impl Iterator<Item = ElementId> + 'a {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let id = current?;
            current = arena.get(id).next;
            Some(id)
        })
    }
}
