//! Error types for Bagel.
//!
//! Uses `thiserror` for error definition. Only recoverable conditions are
//! errors: registration mistakes at startup and entity-limit exhaustion.
//! Contract failures on the hot path (reading a component the mask says is
//! absent, scanning past the highest allocated id) panic instead.

use thiserror::Error;

use crate::entity::EntityId;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Bagel operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional free-form context about where the error occurred.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a duplicate registration error for component type `T`.
    #[must_use]
    pub fn already_registered<T: ?Sized>() -> Self {
        Self::new(ErrorKind::ComponentAlreadyRegistered(std::any::type_name::<T>()))
    }

    /// Creates an unknown component error for component type `T`.
    #[must_use]
    pub fn not_registered<T: ?Sized>() -> Self {
        Self::new(ErrorKind::ComponentNotRegistered(std::any::type_name::<T>()))
    }

    /// Creates a component capacity error.
    #[must_use]
    pub fn too_many_components(limit: usize) -> Self {
        Self::new(ErrorKind::TooManyComponents { limit })
    }

    /// Creates an entity capacity error.
    #[must_use]
    pub fn entity_limit(limit: usize) -> Self {
        Self::new(ErrorKind::EntityLimitExceeded { limit })
    }

    /// Creates a dead entity error.
    #[must_use]
    pub fn not_alive(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotAlive(id))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The component type was registered twice.
    #[error("component already registered: {0}")]
    ComponentAlreadyRegistered(&'static str),

    /// The component type was never registered with the world.
    #[error("component not registered: {0}")]
    ComponentNotRegistered(&'static str),

    /// More component types than a mask can index.
    #[error("too many component types (limit {limit})")]
    TooManyComponents {
        /// The mask capacity.
        limit: usize,
    },

    /// A fixed-capacity world ran out of entity slots.
    #[error("entity limit exceeded (limit {limit})")]
    EntityLimitExceeded {
        /// The configured capacity.
        limit: usize,
    },

    /// The entity was destroyed or never created.
    #[error("entity not alive: {0:?}")]
    EntityNotAlive(EntityId),
}
