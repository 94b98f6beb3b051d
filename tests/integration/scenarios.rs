//! End-to-end scenarios for the component lifecycle
//!
//! Tests add/remove/destroy flows, packed swap-remove, scans, reuse, and
//! idempotent no-ops.

use std::collections::BTreeSet;

use bagel::{ComponentStore, EntityId};

use crate::common::{Health, Position, Velocity, world};

// =============================================================================
// Component Lifecycle
// =============================================================================

#[test]
fn add_remove_destroy_lifecycle() {
    let mut world = world();
    let e = world.create();
    world.add_all(e, (Position { x: 1, y: 2 }, Velocity { x: 3, y: 4 }));

    let pos = world.bit::<Position>();
    let vel = world.bit::<Velocity>();
    assert!(world.mask(e).test(pos));
    assert!(world.mask(e).test(vel));

    world.remove::<Velocity>(e);
    assert!(world.mask(e).test(pos));
    assert!(!world.mask(e).test(vel));
    assert_eq!(world.mask(e).count(), 1);
    assert_eq!(world.get::<Position>(e), &Position { x: 1, y: 2 });

    world.destroy(e);
    assert!(world.mask(e).is_empty());
}

#[test]
fn packed_swap_remove_keeps_owners_resolvable() {
    let mut world = world();
    let ids: Vec<_> = (0..3)
        .map(|i| world.spawn((Position { x: i, y: i * 10 },)))
        .collect();

    world.remove::<Position>(ids[1]);

    let store = world.store::<Position>();
    assert_eq!(store.as_slice().len(), 2);
    assert_eq!(store.get(ids[0]), Some(&Position { x: 0, y: 0 }));
    assert_eq!(store.get(ids[2]), Some(&Position { x: 2, y: 20 }));
    assert_eq!(world.get::<Position>(ids[2]), &Position { x: 2, y: 20 });
    assert!(world.is_consistent());
}

#[test]
fn scan_visits_exactly_the_superset_masks() {
    let mut world = world();
    let mut expected = BTreeSet::new();
    for i in 0..40 {
        let e = world.create();
        if i % 2 == 0 {
            world.add(e, Position::default());
        }
        if i % 3 == 0 {
            world.add(e, Velocity::default());
        }
        if i % 5 == 0 {
            world.add(e, Health(i));
        }
        if i % 6 == 0 {
            expected.insert(e);
        }
    }
    // Destroying a match removes it from the expected set.
    let gone = EntityId::new(12);
    world.destroy(gone);
    expected.remove(&gone);

    let required = world.mask_of::<(Position, Velocity)>();
    let mut visited = BTreeSet::new();
    for id in world.ids().rev() {
        if world.matches(id, &required) {
            visited.insert(id);
        }
    }

    assert_eq!(visited, expected);
    assert_eq!(
        world.query(&required).collect::<BTreeSet<_>>(),
        expected
    );
}

// =============================================================================
// Reuse and Idempotence
// =============================================================================

#[test]
fn reused_id_shows_no_stale_values() {
    let mut world = world();
    let e = world.spawn((Position { x: 5, y: 5 }, Health(3)));
    world.destroy(e);

    let again = world.create();
    assert_eq!(again, e);
    assert!(world.mask(again).is_empty());
    assert!(world.try_get::<Position>(again).is_none());
    assert!(world.try_get::<Health>(again).is_none());
}

#[test]
fn destroyed_mask_has_no_lowest_bit() {
    let mut world = world();
    let e = world.spawn((Velocity::default(), Health(1)));
    world.destroy(e);
    assert_eq!(world.mask(e).lowest_set_bit(), None);
}

#[test]
fn no_ops_do_not_disturb_other_entities() {
    let mut world = world();
    let a = world.spawn((Position { x: 1, y: 1 },));
    let b = world.spawn((Position { x: 2, y: 2 }, Health(9)));

    assert_eq!(world.remove::<Health>(a), None);
    assert!(world.destroy(a));
    assert!(!world.destroy(a));

    assert_eq!(world.get::<Position>(b), &Position { x: 2, y: 2 });
    assert_eq!(world.get::<Health>(b), &Health(9));
    assert_eq!(world.entity_count(), 1);
    assert!(world.is_consistent());
}
