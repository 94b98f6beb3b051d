//! Entity identifiers.

use std::fmt;

/// Opaque entity identifier.
///
/// An entity carries no data of its own. Its identity is a dense integer
/// index, which doubles as the slot number in the per-entity mask table and
/// in sparse component stores. Indices are recycled after destruction, so
/// liveness must be checked against the world, not inferred from the id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity ID from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize`, for indexing tables.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for EntityId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
