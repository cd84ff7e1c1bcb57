// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Element storage: the arena backing every key a `BTree` holds.
//!
//! `spec.md` §3 describes `Element<K>` as living *inside* a node's key
//! slot and being "physically relocated (moved, not copied)" by every
//! split/merge/steal/predecessor-substitution. This crate instead keeps
//! Elements in a stable arena (`BTree::elements`) and lets node slots hold
//! a `Copy` handle (`ElementId`) into that arena — Design Notes option (a)
//! in `spec.md` §9. See `DESIGN.md` for why this is chosen over the
//! pointer-patching realization (option (b)).

/// Handle into a `BTree`'s element arena. Stable for the lifetime of the
/// Element it names — copying an `ElementId` between node slots never
/// requires fixing up anything, because the arena slot it refers to does
/// not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ElementId(pub(crate) usize);

/// A live entry in the element arena: a key plus its recency-list linkage.
#[derive(Debug)]
pub(crate) struct ElementSlot<K> {
    pub key: K,
    pub prev: Option<ElementId>,
    pub next: Option<ElementId>,
}

impl<K> ElementSlot<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            prev: None,
            next: None,
        }
    }
}

/// Arena of Elements owned by a single `BTree`. Freed slots are recycled
/// through `free` so long-lived trees under steady insert/remove churn
/// don't grow unbounded.
#[derive(Debug, Default)]
pub(crate) struct ElementArena<K> {
    slots: Vec<Option<ElementSlot<K>>>,
    free: Vec<ElementId>,
}

impl<K> ElementArena<K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Allocates a new Element, recycling a freed slot when one is available.
    pub fn alloc(&mut self, key: K) -> ElementId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(ElementSlot::new(key));
            id
        } else {
            let id = ElementId(self.slots.len());
            self.slots.push(Some(ElementSlot::new(key)));
            id
        }
    }

    /// Removes an Element from the arena entirely, returning its key.
    ///
    /// Callers must have already unlinked `id` from the recency list.
    pub fn free(&mut self, id: ElementId) -> K {
        let slot = self.slots[id.0]
            .take()
            .expect("freeing an already-freed ElementId");
        self.free.push(id);
        slot.key
    }

    pub fn get(&self, id: ElementId) -> &ElementSlot<K> {
        self.slots[id.0]
            .as_ref()
            .expect("ElementId referenced a freed slot")
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut ElementSlot<K> {
        self.slots[id.0]
            .as_mut()
            .expect("ElementId referenced a freed slot")
    }

    pub fn key(&self, id: ElementId) -> &K {
        &self.get(id).key
    }

    pub fn set_key(&mut self, id: ElementId, key: K) {
        self.get_mut(id).key = key;
    }
}
