//! Deferred structural changes.
//!
//! Systems that scan entities and want to destroy or restructure *other*
//! entities mid-scan queue a [`Command`] instead. Queued commands are applied
//! in the order they were recorded when the world's `step()` barrier runs,
//! so every change is visible and consistent before the next frame's
//! systems start.
//!
//! A command aimed at an entity is pinned to that entity's generation when it
//! is queued. If the entity is destroyed before the barrier, and possibly its
//! id handed to a new entity, the command is skipped rather than applied to
//! whoever holds the id now.

use std::fmt;

use bagel_foundation::{ComponentBit, EntityId};

use crate::world::World;

/// A queued world mutation.
pub enum Command {
    /// Destroy an entity, erasing all of its components.
    Destroy(EntityId),

    /// Remove every component from an entity but keep it alive.
    ClearComponents(EntityId),

    /// Remove one component, identified by its bit.
    Remove {
        /// Target entity.
        entity: EntityId,
        /// Bit of the component to remove.
        bit: ComponentBit,
    },

    /// Arbitrary change run against the world at the barrier.
    ///
    /// Typed inserts and spawns are queued this way. The closure may queue
    /// further commands; they run in the same barrier.
    Apply(Box<dyn FnOnce(&mut World)>),
}

impl Command {
    /// Wraps a closure as a command.
    #[must_use]
    pub fn apply(f: impl FnOnce(&mut World) + 'static) -> Self {
        Self::Apply(Box::new(f))
    }

    /// The entity this command acts on, if any.
    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Self::Destroy(entity)
            | Self::ClearComponents(entity)
            | Self::Remove { entity, .. } => Some(*entity),
            Self::Apply(_) => None,
        }
    }
}

/// A command plus the generation its target had when it was queued.
#[derive(Debug)]
pub(crate) struct Queued {
    pub(crate) command: Command,
    pub(crate) generation: Option<u32>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destroy(entity) => f.debug_tuple("Destroy").field(entity).finish(),
            Self::ClearComponents(entity) => {
                f.debug_tuple("ClearComponents").field(entity).finish()
            }
            Self::Remove { entity, bit } => f
                .debug_struct("Remove")
                .field("entity", entity)
                .field("bit", bit)
                .finish(),
            Self::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

/// Outcome of one `step()` barrier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Frame number after the step.
    pub frame: u64,
    /// Number of commands applied.
    pub applied: usize,
    /// Number of commands dropped because their target entity was destroyed
    /// after they were queued.
    pub skipped: usize,
}
