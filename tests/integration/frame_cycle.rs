//! Integration tests for frame cycles
//!
//! Tests systems running over a frame, mark-then-sweep, deferred commands,
//! and fixed-capacity worlds.

use bagel::{Command, ErrorKind, Mask, StepReport, World, WorldConfig};

use crate::common::{Doomed, Health, Position, Velocity, world, world_with};

// Systems in the shape a game uses them: plain functions over `&mut World`.

fn movement(world: &mut World) {
    let moving = world.mask_of::<(Position, Velocity)>();
    for id in world.ids() {
        if world.matches(id, &moving) {
            let v = *world.get::<Velocity>(id);
            let p = world.get_mut::<Position>(id);
            p.x += v.x;
            p.y += v.y;
        }
    }
}

fn damage(world: &mut World, amount: i32) {
    let living = world.mask_of::<(Health,)>();
    for id in world.ids() {
        if world.matches(id, &living) {
            let health = world.get_mut::<Health>(id);
            health.0 -= amount;
            if health.0 <= 0 {
                world.add(id, Doomed);
            }
        }
    }
}

// =============================================================================
// Frame Loop
// =============================================================================

#[test]
fn systems_then_sweep_then_step() {
    let mut world = world();
    let runner = world.spawn((Position::default(), Velocity { x: 1, y: 2 }, Health(25)));
    let wall = world.spawn((Position { x: 9, y: 9 }, Health(100)));

    for frame in 1..=3 {
        movement(&mut world);
        damage(&mut world, 10);
        world.sweep::<Doomed>();
        let report = world.step();
        assert_eq!(report.frame, frame);
    }

    assert!(!world.is_alive(runner));
    assert!(world.is_alive(wall));
    assert_eq!(world.get::<Health>(wall), &Health(70));
    assert_eq!(world.get::<Position>(wall), &Position { x: 9, y: 9 });
    assert!(world.is_consistent());
}

#[test]
fn mark_then_sweep_destroys_exactly_marked() {
    let mut world = world();
    let ids: Vec<_> = (0..10).map(|i| world.spawn((Health(i),))).collect();

    // Each entity condemns its right neighbour; destroying mid-scan would
    // shift what later iterations see.
    for id in world.ids() {
        let next = ids.iter().position(|e| *e == id).and_then(|i| ids.get(i + 1));
        if let Some(&next) = next {
            if world.get::<Health>(id).0 % 3 == 0 {
                world.add(next, Doomed);
            }
        }
    }

    let doomed = world.collect_matching(&world.mask_of::<(Doomed,)>());
    assert_eq!(doomed, vec![ids[1], ids[4], ids[7]]);
    assert_eq!(world.sweep::<Doomed>(), 3);
    assert_eq!(world.entity_count(), 7);
    for id in doomed {
        assert!(!world.is_alive(id));
    }
}

// =============================================================================
// Deferred Commands
// =============================================================================

#[test]
fn deferred_commands_apply_in_order_at_step() {
    let mut world = world();
    let e = world.spawn((Health(1),));

    world.defer_add(e, Health(2));
    world.defer(Command::ClearComponents(e));
    world.defer_add(e, Position { x: 4, y: 4 });
    assert_eq!(world.get::<Health>(e), &Health(1));

    let report = world.step();
    assert_eq!(
        report,
        StepReport {
            frame: 1,
            applied: 3,
            skipped: 0
        }
    );
    assert!(!world.has::<Health>(e));
    assert_eq!(world.get::<Position>(e), &Position { x: 4, y: 4 });
}

#[test]
fn destroy_during_scan_via_defer() {
    let mut world = world();
    for i in 0..6 {
        world.spawn((Health(i),));
    }
    let living = world.mask_of::<(Health,)>();

    for id in world.ids() {
        if world.matches(id, &living) && world.get::<Health>(id).0 % 2 == 1 {
            world.defer_destroy(id);
        }
    }
    assert_eq!(world.entity_count(), 6);

    world.step();
    assert_eq!(world.entity_count(), 3);
    assert_eq!(world.collect_matching(&living).len(), 3);
}

#[test]
fn deferred_spawn_reuses_swept_ids() {
    let mut world = world();
    let a = world.spawn((Doomed,));
    world.sweep::<Doomed>();
    world.defer_spawn((Position { x: 1, y: 1 },));
    world.step();

    assert!(world.is_alive(a));
    assert_eq!(world.get::<Position>(a), &Position { x: 1, y: 1 });
}

#[test]
fn repeated_deferred_destroy_spares_entity_on_reused_id() {
    let mut world = world();
    let a = world.spawn((Health(1),));

    world.defer_destroy(a);
    world.defer_spawn((Position { x: 7, y: 7 },));
    world.defer_destroy(a);

    let report = world.step();
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 1);

    // The spawn reused `a`'s id; the second destroy targeted the old entity.
    let spawned = world.collect_matching(&world.mask_of::<(Position,)>());
    assert_eq!(spawned, vec![a]);
    assert_eq!(world.entity_count(), 1);
    assert_eq!(world.get::<Position>(a), &Position { x: 7, y: 7 });
    assert!(world.is_consistent());
}

#[test]
fn deferred_remove_does_not_touch_replacement_entity() {
    let mut world = world();
    let a = world.spawn((Health(1),));

    world.defer_remove::<Health>(a);
    world.destroy(a);
    let b = world.spawn((Health(50),));
    assert_eq!(b, a);

    let report = world.step();
    assert_eq!(report.skipped, 1);
    assert!(world.has::<Health>(b));
    assert_eq!(world.get::<Health>(b), &Health(50));
}

#[test]
fn deferred_add_does_not_reach_replacement_entity() {
    let mut world = world();
    let a = world.create();

    world.defer_add(a, Health(9));
    world.destroy(a);
    let b = world.create();
    assert_eq!(b, a);

    world.step();
    assert!(!world.has::<Health>(b));
}

#[test]
fn step_with_empty_queue_only_advances_frame() {
    let mut world = world();
    let report = world.step();
    assert_eq!(report.applied, 0);
    assert_eq!(world.frame(), 1);
}

// =============================================================================
// Fixed Capacity
// =============================================================================

#[test]
fn fixed_world_recycles_within_capacity() {
    let mut world = world_with(WorldConfig::fixed(4));
    let ids: Vec<_> = (0..4).map(|_| world.create()).collect();

    let err = world.try_create().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EntityLimitExceeded { limit: 4 }));

    world.destroy(ids[2]);
    assert_eq!(world.try_create().unwrap(), ids[2]);
    assert_eq!(world.id_bound(), 4);
    assert_eq!(world.collect_matching(&Mask::new()).len(), 4);
}

#[test]
fn deferred_spawn_into_full_world_does_not_abort_step() {
    let mut world = world_with(WorldConfig::fixed(1));
    let e = world.create();

    world.defer_spawn((Health(1),));
    world.defer_add(e, Health(2));

    let report = world.step();
    assert_eq!(report.frame, 1);
    assert_eq!(world.entity_count(), 1);
    // Commands behind the rejected spawn still ran.
    assert_eq!(world.get::<Health>(e), &Health(2));
    assert_eq!(world.pending_commands(), 0);
}
