//! Component types and component bundles.
//!
//! A component is any `'static` type that names its storage policy:
//!
//! ```rust,ignore
//! #[derive(Debug, Default)]
//! struct Position { x: f32, y: f32 }
//!
//! impl Component for Position {
//!     type Storage = PackedStore<Self>;
//! }
//! ```
//!
//! A [`Bundle`] is a tuple of components attached in one call, and doubles
//! as the way to build a query mask for the same set of types.

use bagel_foundation::{EntityId, Mask, Result};

use crate::registry::ComponentRegistry;
use crate::store::ComponentStore;
use crate::world::World;

/// A type that can be attached to entities.
///
/// The storage policy is chosen statically through `Storage`, so typed
/// access compiles down to a call on the concrete store.
pub trait Component: Sized + 'static {
    /// The backend holding values of this type.
    type Storage: ComponentStore<Self>;
}

/// A tuple of components attached together.
///
/// Implemented for tuples of one to eight components.
pub trait Bundle: 'static {
    /// Builds the mask covering every component in the bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if any component type is not registered.
    fn try_mask(registry: &ComponentRegistry) -> Result<Mask>;

    /// Attaches every component in the bundle to `id`.
    fn insert_into(self, world: &mut World, id: EntityId);
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            fn try_mask(registry: &ComponentRegistry) -> Result<Mask> {
                let mut mask = Mask::new();
                $(mask.set(registry.try_bit::<$name>()?);)+
                Ok(mask)
            }

            #[allow(non_snake_case)]
            fn insert_into(self, world: &mut World, id: EntityId) {
                let ($($name,)+) = self;
                $(world.add(id, $name);)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
