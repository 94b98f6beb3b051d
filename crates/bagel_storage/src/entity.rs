//! Entity lifecycle management with generation counters.
//!
//! The `EntityStore` allocates entity ids, recycles destroyed ones through a
//! free list, and tracks a generation counter per id so liveness is an
//! explicit fact rather than something inferred from an empty mask.

// Entity indices are u32 by construction.
#![allow(clippy::cast_possible_truncation)]

use bagel_foundation::{EntityId, Error, Result};

/// Allocates and recycles entity ids.
///
/// New ids come from the free list when it is non-empty (most recently freed
/// first), otherwise the next sequential index is allocated. Generations are
/// odd while an id is alive and even while it is free.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Generation counter for each index ever allocated.
    generations: Vec<u32>,
    /// Indices available for reuse.
    free_list: Vec<u32>,
    /// Count of live entities.
    live_count: usize,
    /// Maximum number of indices, if fixed.
    limit: Option<usize>,
}

impl EntityStore {
    /// Creates a new empty store with no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with room for `capacity` ids before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Caps the number of distinct indices this store will ever hand out.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the index limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Allocates an entity id.
    ///
    /// # Errors
    ///
    /// Returns an error if the free list is empty and the store has reached
    /// its index limit.
    pub fn try_create(&mut self) -> Result<EntityId> {
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            // Even (free) becomes odd (alive).
            self.generations[idx] = self.generations[idx].wrapping_add(1);
            self.live_count += 1;
            return Ok(EntityId::new(index));
        }

        let next = self.generations.len();
        if let Some(limit) = self.limit.filter(|limit| next >= *limit) {
            return Err(Error::entity_limit(limit));
        }
        let index = Self::fresh_index(next).ok_or_else(|| Error::entity_limit(u32::MAX as usize))?;

        self.generations.push(1);
        self.live_count += 1;
        Ok(EntityId::new(index))
    }

    /// Index for the `next`th allocation.
    ///
    /// `u32::MAX` itself is never handed out, so `id_bound()` always fits in
    /// a `u32` and no id collides with a `u32::MAX` sentinel.
    fn fresh_index(next: usize) -> Option<u32> {
        u32::try_from(next).ok().filter(|index| *index != u32::MAX)
    }

    /// Marks an entity dead and recycles its id.
    ///
    /// Returns `false` without doing anything if the id is not alive, so a
    /// second destroy can never push the same id onto the free list twice.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.slot();
        // Odd (alive) becomes even (free).
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(id.index());
        self.live_count -= 1;
        true
    }

    /// Returns true if `id` is currently alive.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.generations
            .get(id.slot())
            .is_some_and(|generation| generation % 2 == 1)
    }

    /// Returns the current generation for an id, if it was ever allocated.
    ///
    /// Increments on every create and destroy of that id.
    #[must_use]
    pub fn generation(&self, id: EntityId) -> Option<u32> {
        self.generations.get(id.slot()).copied()
    }

    /// Highest id ever allocated, alive or not.
    #[must_use]
    pub fn max_id(&self) -> Option<EntityId> {
        self.generations
            .len()
            .checked_sub(1)
            .map(|max| EntityId::new(max as u32))
    }

    /// Exclusive upper bound for scans: one past [`max_id`](Self::max_id).
    #[must_use]
    pub fn id_bound(&self) -> u32 {
        self.generations.len() as u32
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Number of ids waiting to be reused.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Iterates over all live entity ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| *generation % 2 == 1)
            .map(|(idx, _)| EntityId::new(idx as u32))
    }

    /// Reserves room for `additional` more ids.
    pub fn reserve(&mut self, additional: usize) {
        self.generations.reserve(additional);
    }
}
