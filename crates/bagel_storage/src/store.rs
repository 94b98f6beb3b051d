//! Component storage backends.
//!
//! Every component type picks one backend through [`Component::Storage`]:
//!
//! - [`PackedStore`] - dense array plus id/slot maps, swap-remove on delete
//! - [`SparseStore`] - array indexed directly by entity id
//! - [`TaggedStore`] - no payload, membership only
//!
//! All three implement [`ComponentStore`]. The world talks to them through
//! that trait with static dispatch for typed access, and through the private
//! erased view when it only knows a component bit (entity destruction,
//! deferred removal).
//!
//! Stores never touch masks. Keeping a store and the per-entity masks in step
//! is the world's job, which is why the world hands out shared references to
//! stores only.

mod packed;
mod sparse;
mod tagged;

use std::any::Any;
use std::fmt;

use bagel_foundation::EntityId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::component::Component;

pub use packed::PackedStore;
pub use sparse::SparseStore;
pub use tagged::TaggedStore;

/// The storage policy of a component type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StorageKind {
    /// Dense, iteration-friendly array.
    Packed,
    /// Array indexed by entity id.
    Sparse,
    /// Zero-sized marker, no payload.
    Tagged,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Packed => "packed",
            Self::Sparse => "sparse",
            Self::Tagged => "tagged",
        };
        f.write_str(name)
    }
}

/// Store/fetch/erase a value of type `T` per entity.
pub trait ComponentStore<T>: Default + 'static {
    /// Storage policy implemented by this store.
    const KIND: StorageKind;

    /// Records `value` for `id`, returning the previous value if any.
    ///
    /// Overwriting never grows the store.
    fn insert(&mut self, id: EntityId, value: T) -> Option<T>;

    /// Returns the value for `id`.
    fn get(&self, id: EntityId) -> Option<&T>;

    /// Returns the value for `id` mutably.
    fn get_mut(&mut self, id: EntityId) -> Option<&mut T>;

    /// Erases the value for `id`, returning it.
    fn remove(&mut self, id: EntityId) -> Option<T>;

    /// Returns true if a value is held for `id`.
    fn contains(&self, id: EntityId) -> bool;

    /// Number of entities holding a value.
    fn len(&self) -> usize;

    /// Returns true if no entity holds a value.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every value.
    fn clear(&mut self);

    /// Reserves room for `additional` more entities.
    fn reserve(&mut self, additional: usize);
}

/// Type-erased view of a store, addressed by component bit.
pub(crate) trait ErasedStore: Any {
    /// Drops the value for `id`; returns whether one was held.
    fn erase(&mut self, id: EntityId) -> bool;

    fn holds(&self, id: EntityId) -> bool;

    fn live_count(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Concrete erased box for component `T`.
pub(crate) struct TypedStore<T: Component> {
    pub(crate) inner: T::Storage,
}

impl<T: Component> TypedStore<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut inner = T::Storage::default();
        inner.reserve(capacity);
        Self { inner }
    }
}

impl<T: Component> ErasedStore for TypedStore<T> {
    fn erase(&mut self, id: EntityId) -> bool {
        self.inner.remove(id).is_some()
    }

    fn holds(&self, id: EntityId) -> bool {
        self.inner.contains(id)
    }

    fn live_count(&self) -> usize {
        self.inner.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
