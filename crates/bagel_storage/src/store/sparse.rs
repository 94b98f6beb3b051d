//! Storage indexed directly by entity id.

use bagel_foundation::EntityId;

use super::{ComponentStore, StorageKind};

/// Direct-indexed storage: one optional slot per entity id ever stored.
///
/// Access is a single bounds check and never moves values. Memory grows
/// with the highest id stored and is not compacted; suited to components
/// that few entities carry but that are looked up by id.
#[derive(Clone, Debug)]
pub struct SparseStore<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Default for SparseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Number of id-indexed slots currently allocated.
    #[must_use]
    pub fn capacity_ids(&self) -> usize {
        self.slots.len()
    }

    /// Iterates `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = EntityId::new(i as u32);
            slot.as_ref().map(|v| (id, v))
        })
    }
}

impl<T: 'static> ComponentStore<T> for SparseStore<T> {
    const KIND: StorageKind = StorageKind::Sparse;

    fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if id.slot() >= self.slots.len() {
            self.slots.resize_with(id.slot() + 1, || None);
        }
        let previous = self.slots[id.slot()].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.slot()).and_then(Option::as_mut)
    }

    fn remove(&mut self, id: EntityId) -> Option<T> {
        let value = self.slots.get_mut(id.slot())?.take();
        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }
}
