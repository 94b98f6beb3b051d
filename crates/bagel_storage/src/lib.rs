//! Entity, component, and world storage for Bagel.
//!
//! This crate provides:
//! - [`EntityStore`] - Id allocation with LIFO reuse and generation counters
//! - [`ComponentRegistry`] - Startup-time component type to bit mapping
//! - [`PackedStore`], [`SparseStore`], [`TaggedStore`] - Storage backends
//! - [`World`] - Masks and stores kept in step, deferred commands, scans
//!
//! # Example
//!
//! ```rust,ignore
//! use bagel_storage::{Component, PackedStore, WorldBuilder, WorldConfig};
//!
//! #[derive(Default)]
//! struct Position { x: f32, y: f32 }
//! impl Component for Position { type Storage = PackedStore<Self>; }
//!
//! #[derive(Default)]
//! struct Velocity { x: f32, y: f32 }
//! impl Component for Velocity { type Storage = PackedStore<Self>; }
//!
//! let mut world = WorldBuilder::new(WorldConfig::default())
//!     .register::<Position>()?
//!     .register::<Velocity>()?
//!     .build();
//!
//! world.spawn((Position::default(), Velocity { x: 1.0, y: 0.0 }));
//!
//! let moving = world.mask_of::<(Position, Velocity)>();
//! for id in world.ids() {
//!     if world.matches(id, &moving) {
//!         let v = world.get::<Velocity>(id).x;
//!         world.get_mut::<Position>(id).x += v;
//!     }
//! }
//! world.step();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod component;
pub mod config;
pub mod entity;
pub mod query;
pub mod registry;
pub mod store;
pub mod world;

pub use command::{Command, StepReport};
pub use component::{Bundle, Component};
pub use config::WorldConfig;
pub use entity::EntityStore;
pub use query::{EntityIds, Query};
pub use registry::{ComponentInfo, ComponentRegistry};
pub use store::{ComponentStore, PackedStore, SparseStore, StorageKind, TaggedStore};
pub use world::{World, WorldBuilder};
