//! Linear-scan iteration over entity ids.
//!
//! There is no archetype index. A query visits every id in `0..=max_id` and
//! keeps the ones whose mask contains the required mask. Cost is
//! O(max_id) per query regardless of how many entities are alive, which is
//! fine for the low hundreds of entities a frame touches at 60 Hz and does
//! not scale to large, churning populations.
//!
//! Two shapes are offered:
//!
//! - [`EntityIds`] owns its range and does not borrow the world, so a system
//!   can mutate the world inside the loop and test masks itself.
//! - [`Query`] borrows the world and filters for you; use it for read-only
//!   passes.
//!
//! Mutating the entity being visited is always fine. Destroying a
//! *different* entity mid-scan must go through mark-then-sweep (tag it,
//! then sweep after the loop) or a deferred command.

use std::iter::FusedIterator;
use std::ops::Range;

use bagel_foundation::{EntityId, Mask};

use crate::entity::EntityStore;

/// Owned iterator over `0..id_bound`, captured when created.
///
/// Ids allocated after creation are not visited.
#[derive(Clone, Debug)]
pub struct EntityIds {
    range: Range<u32>,
}

impl EntityIds {
    pub(crate) fn new(bound: u32) -> Self {
        Self { range: 0..bound }
    }
}

impl Iterator for EntityIds {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        self.range.next().map(EntityId::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for EntityIds {
    fn next_back(&mut self) -> Option<EntityId> {
        self.range.next_back().map(EntityId::new)
    }
}

impl ExactSizeIterator for EntityIds {}
impl FusedIterator for EntityIds {}

/// Borrowing scan yielding ids whose mask contains `required`.
///
/// With an empty `required` mask every live entity matches, including
/// entities that currently hold no components.
#[derive(Clone, Debug)]
pub struct Query<'w> {
    masks: &'w [Mask],
    entities: &'w EntityStore,
    required: Mask,
    ids: EntityIds,
}

impl<'w> Query<'w> {
    pub(crate) fn new(masks: &'w [Mask], entities: &'w EntityStore, required: Mask) -> Self {
        Self {
            masks,
            entities,
            required,
            ids: EntityIds::new(entities.id_bound()),
        }
    }
}

/// Shared match rule for queries and `World::matches`.
pub(crate) fn mask_matches(mask: &Mask, required: &Mask, alive: impl FnOnce() -> bool) -> bool {
    // A non-empty requirement can only be met by a live entity, since dead
    // entities have empty masks.
    mask.contains(required) && (!required.is_empty() || alive())
}

impl Iterator for Query<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let required = self.required;
        let entities = self.entities;
        let masks = self.masks;
        self.ids
            .find(|id| mask_matches(&masks[id.slot()], &required, || entities.is_alive(*id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}

impl FusedIterator for Query<'_> {}
