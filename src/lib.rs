//! Bagel - a minimal bitset entity-component core.
//!
//! This crate re-exports all layers of Bagel for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: bagel_storage    - Entity store, component stores, world, scans
//! Layer 0: bagel_foundation - Core types (EntityId, ComponentBit, Mask, Error)
//! ```

pub use bagel_foundation as foundation;
pub use bagel_storage as storage;

pub use bagel_foundation::{ComponentBit, EntityId, Error, ErrorKind, MASK_BITS, Mask, Result};
pub use bagel_storage::{
    Bundle, Command, Component, ComponentStore, PackedStore, SparseStore, StepReport,
    StorageKind, TaggedStore, World, WorldBuilder, WorldConfig,
};
