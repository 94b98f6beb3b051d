//! Integration tests for the World facade
//!
//! Tests lifecycle, synchronized mutation, scans, and configuration.

use bagel_foundation::{EntityId, ErrorKind, Mask};
use bagel_storage::{ComponentStore, WorldBuilder, WorldConfig};

use crate::common::{Collidable, Name, Position, Velocity, world};

// =============================================================================
// World Creation
// =============================================================================

#[test]
fn world_starts_empty() {
    let world = world();
    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.max_id(), None);
    assert_eq!(world.frame(), 0);
    assert_eq!(world.pending_commands(), 0);
    assert_eq!(world.ids().len(), 0);
}

#[test]
fn world_keeps_config() {
    let config = WorldConfig::default().with_initial_capacity(16);
    let world = WorldBuilder::new(config.clone()).build();
    assert_eq!(world.config(), &config);
}

// =============================================================================
// Synchronized Mutation
// =============================================================================

#[test]
fn mask_and_store_change_together() {
    let mut world = world();
    let e = world.create();

    world.add(e, Velocity { x: 2.0, y: 0.0 });
    assert!(world.mask(e).test(world.bit::<Velocity>()));
    assert!(world.store::<Velocity>().contains(e));

    world.remove::<Velocity>(e);
    assert!(!world.mask(e).test(world.bit::<Velocity>()));
    assert!(!world.store::<Velocity>().contains(e));
}

#[test]
fn destroy_leaves_no_values_behind() {
    let mut world = world();
    let e = world.spawn((Position::default(), Name("x".into()), Collidable));
    let other = world.spawn((Position::default(),));

    world.destroy(e);
    assert_eq!(world.store::<Position>().len(), 1);
    assert_eq!(world.store::<Position>().owners(), &[other]);
    assert!(world.store::<Name>().is_empty());
    assert!(world.store::<Collidable>().is_empty());
    assert!(world.is_consistent());
}

#[test]
fn try_get_reports_absence() {
    let mut world = world();
    let e = world.create();
    assert!(world.try_get::<Name>(e).is_none());
    assert!(world.try_get_mut::<Name>(e).is_none());
    assert!(world.try_get::<Name>(EntityId::new(500)).is_none());
}

#[test]
fn remove_on_unknown_id_is_noop() {
    let mut world = world();
    assert_eq!(world.remove::<Name>(EntityId::new(3)), None);
    assert_eq!(world.clear_components(EntityId::new(3)), 0);
}

// =============================================================================
// Scans
// =============================================================================

#[test]
fn query_skips_dead_and_non_matching() {
    let mut world = world();
    let a = world.spawn((Position::default(), Velocity::default()));
    let b = world.spawn((Position::default(), Velocity::default()));
    let _c = world.spawn((Position::default(),));
    world.destroy(a);

    let moving = world.mask_of::<(Position, Velocity)>();
    assert_eq!(world.collect_matching(&moving), vec![b]);
}

#[test]
fn empty_query_yields_live_entities_only() {
    let mut world = world();
    let a = world.create();
    let b = world.create();
    world.destroy(a);

    assert_eq!(world.collect_matching(&Mask::new()), vec![b]);
}

#[test]
fn ids_are_captured_at_call_time() {
    let mut world = world();
    world.create();
    world.create();

    let mut visited = 0;
    for _ in world.ids() {
        world.create();
        visited += 1;
    }
    assert_eq!(visited, 2);
    assert_eq!(world.entity_count(), 4);
}

#[test]
fn packed_slice_supports_bulk_reads() {
    let mut world = world();
    for i in 0..5 {
        world.spawn((Position { x: i as f32, y: 0.0 },));
    }
    let total: f32 = world.store::<Position>().as_slice().iter().map(|p| p.x).sum();
    assert_eq!(total, 10.0);
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn dynamic_world_grows_past_initial_capacity() {
    let mut world = WorldBuilder::new(WorldConfig::default().with_initial_capacity(2)).build();
    for _ in 0..10 {
        world.create();
    }
    assert_eq!(world.entity_count(), 10);
}

#[test]
fn fixed_world_rejects_growth() {
    let mut world = WorldBuilder::new(WorldConfig::fixed(3)).build();
    for _ in 0..3 {
        world.try_create().unwrap();
    }
    let err = world.try_create().unwrap_err();
    assert_eq!(err.kind, ErrorKind::EntityLimitExceeded { limit: 3 });
    assert_eq!(world.entity_count(), 3);
}

#[test]
#[should_panic(expected = "cannot create entity")]
fn fixed_world_create_panics_when_full() {
    let mut world = WorldBuilder::new(WorldConfig::fixed(1)).build();
    world.create();
    world.create();
}
