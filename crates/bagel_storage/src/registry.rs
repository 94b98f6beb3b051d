//! Startup-time component registration.
//!
//! The registry maps each component type to a stable [`ComponentBit`] and
//! records its storage policy. Bits are handed out in registration order and
//! never reassigned. Registration happens on a [`WorldBuilder`]; once the
//! world is built the registry is only reachable through `&` and is
//! effectively frozen.
//!
//! [`WorldBuilder`]: crate::WorldBuilder

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use bagel_foundation::{ComponentBit, Error, MASK_BITS, Mask, Result};

use crate::component::{Bundle, Component};
use crate::store::{ComponentStore, StorageKind};

/// Registration record for one component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Bit assigned to the type.
    pub bit: ComponentBit,
    /// Rust type name, for diagnostics.
    pub name: &'static str,
    /// Storage policy of the type.
    pub kind: StorageKind,
    type_id: TypeId,
}

impl ComponentInfo {
    /// Returns true if this record describes `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Component type to bit index table.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentBit>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next free bit to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is already registered or every bit is taken.
    pub fn register<T: Component>(&mut self) -> Result<ComponentBit> {
        let type_id = TypeId::of::<T>();
        if self.by_type.contains_key(&type_id) {
            return Err(Error::already_registered::<T>());
        }

        let bit = ComponentBit::try_new(self.infos.len())
            .ok_or_else(|| Error::too_many_components(MASK_BITS))?;

        self.by_type.insert(type_id, bit);
        self.infos.push(ComponentInfo {
            bit,
            name: type_name::<T>(),
            kind: <T::Storage as ComponentStore<T>>::KIND,
            type_id,
        });
        Ok(bit)
    }

    /// Returns the bit assigned to `T`, if registered.
    #[inline]
    #[must_use]
    pub fn bit<T: 'static>(&self) -> Option<ComponentBit> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the bit assigned to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered.
    pub fn try_bit<T: 'static>(&self) -> Result<ComponentBit> {
        self.bit::<T>().ok_or_else(Error::not_registered::<T>)
    }

    /// Builds the mask for every component type in `B`.
    ///
    /// # Errors
    ///
    /// Returns an error if any component type in `B` is not registered.
    pub fn mask_of<B: Bundle>(&self) -> Result<Mask> {
        B::try_mask(self)
    }

    /// Returns the record for `bit`.
    #[must_use]
    pub fn info(&self, bit: ComponentBit) -> Option<&ComponentInfo> {
        self.infos.get(bit.index())
    }

    /// Iterates records in bit order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.infos.iter()
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
