//! Densely packed component storage.
//!
//! Values live contiguously in `dense`. `owners[i]` is the entity owning
//! `dense[i]`, and `slots[id]` is the dense index for `id` (or [`VACANT`]).
//! Removal swaps the last value into the hole and repoints the moved
//! owner's slot, so the dense array never has gaps.

// Dense indices are stored as u32; entity ids are u32 as well.
#![allow(clippy::cast_possible_truncation)]

use std::mem;

use bagel_foundation::EntityId;

use super::{ComponentStore, StorageKind};

const VACANT: u32 = u32::MAX;

/// Cache-dense storage with O(1) insert and swap-remove.
#[derive(Clone, Debug)]
pub struct PackedStore<T> {
    dense: Vec<T>,
    owners: Vec<EntityId>,
    slots: Vec<u32>,
}

impl<T> Default for PackedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PackedStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Returns the dense index holding the value for `id`.
    #[must_use]
    pub fn slot_of(&self, id: EntityId) -> Option<usize> {
        match self.slots.get(id.slot()) {
            Some(&slot) if slot != VACANT => Some(slot as usize),
            _ => None,
        }
    }

    /// The packed values, in dense order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// The packed values, mutably. Owners are unaffected.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// The owning entity of each packed value, parallel to [`as_slice`](Self::as_slice).
    #[must_use]
    pub fn owners(&self) -> &[EntityId] {
        &self.owners
    }

    /// Iterates `(owner, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterates `(owner, value)` pairs mutably in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T: 'static> ComponentStore<T> for PackedStore<T> {
    const KIND: StorageKind = StorageKind::Packed;

    fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if let Some(slot) = self.slot_of(id) {
            return Some(mem::replace(&mut self.dense[slot], value));
        }

        if id.slot() >= self.slots.len() {
            self.slots.resize(id.slot() + 1, VACANT);
        }
        self.slots[id.slot()] = self.dense.len() as u32;
        self.dense.push(value);
        self.owners.push(id);
        None
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.slot_of(id).map(|slot| &self.dense[slot])
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slot_of(id).map(|slot| &mut self.dense[slot])
    }

    fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slot_of(id)?;
        self.slots[id.slot()] = VACANT;

        let value = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);

        // Whatever was last now sits in the hole.
        if let Some(&moved) = self.owners.get(slot) {
            self.slots[moved.slot()] = slot as u32;
        }

        debug_assert_eq!(self.dense.len(), self.owners.len());
        Some(value)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.slot_of(id).is_some()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn clear(&mut self) {
        self.dense.clear();
        self.owners.clear();
        self.slots.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.dense.reserve(additional);
        self.owners.reserve(additional);
        self.slots.reserve(additional);
    }
}
