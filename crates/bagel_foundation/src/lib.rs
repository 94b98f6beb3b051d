//! Core types for Bagel.
//!
//! This crate provides:
//! - [`EntityId`] - Opaque integer entity identifiers
//! - [`ComponentBit`] - Stable bit index assigned to a component type
//! - [`Mask`] - Fixed-capacity bitset recording which components an entity has
//! - [`Error`] - Error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod mask;

pub use entity::EntityId;
pub use error::{Error, ErrorKind, Result};
pub use mask::{ComponentBit, MASK_BITS, Mask, MaskBits};
