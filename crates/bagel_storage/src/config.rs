//! Configuration for a world.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sizing policy for a [`World`](crate::World).
///
/// Capacities are reserved up front so a game that stays within them never
/// reallocates mid-frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct WorldConfig {
    /// Entity slots reserved in the mask table and every component store.
    pub initial_capacity: usize,

    /// Whether the world may grow past `initial_capacity` entity ids.
    ///
    /// When false, creating an entity that would need a new id beyond the
    /// capacity fails instead of reallocating.
    pub dynamic_resize: bool,

    /// Deferred commands reserved per frame.
    pub command_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            dynamic_resize: true,
            command_capacity: 64,
        }
    }
}

impl WorldConfig {
    /// Creates a configuration with a hard cap of `capacity` entity ids.
    #[must_use]
    pub fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            dynamic_resize: false,
            ..Self::default()
        }
    }

    /// Builder method to set the initial capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method to allow or forbid growth past the initial capacity.
    #[must_use]
    pub fn with_dynamic_resize(mut self, dynamic_resize: bool) -> Self {
        self.dynamic_resize = dynamic_resize;
        self
    }

    /// Builder method to set the deferred command capacity.
    #[must_use]
    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    /// Maximum number of entity ids, or `None` when growth is allowed.
    #[must_use]
    pub fn entity_limit(&self) -> Option<usize> {
        (!self.dynamic_resize).then_some(self.initial_capacity)
    }
}
