//! End-to-end scenarios through [`World::step`].

use std::time::Duration;

use glam::Vec2;
use ledge_collide::{ResolutionStrategy, ResolverConfig};

use crate::contact::Contacts;
use crate::hitbox::layers;
use crate::world::{World, WorldConfig};

use super::helpers::{coin_at, floor_descriptor, max_penetration, run, walled_descriptor, world_from, TICK};

fn configs() -> [WorldConfig; 2] {
    [
        WorldConfig::default(),
        WorldConfig {
            resolver: ResolverConfig::with_strategy(ResolutionStrategy::OrientedCancellation),
            ..WorldConfig::default()
        },
    ]
}

/// Step once with a fixed horizontal input.
fn walk(world: &mut World, vx: f32) -> crate::world::TickReport {
    world.body_mut().velocity.x = vx;
    world.step(TICK)
}

// =============================================================================
// Landing
// =============================================================================

#[test]
fn test_drop_lands_after_two_blocked_ticks() {
    for config in configs() {
        let mut world = world_from(floor_descriptor(16, 8), config);
        let reports = run(&mut world, 300);

        let first = reports
            .iter()
            .position(|report| report.resolution.blocked_up)
            .expect("actor never reached the floor");

        assert!(!reports[first].contacts.contains(Contacts::ON_FLOOR), "pending tick");
        assert!(reports[first + 1].contacts.contains(Contacts::ON_FLOOR), "confirmed tick");
        assert!(reports[first + 1..]
            .iter()
            .all(|report| report.contacts == Contacts::ON_FLOOR));
        assert!(reports.iter().all(|report| !report.resolution.blocked_horizontal()));
    }
}

#[test]
fn test_resting_actor_stays_out_of_the_floor() {
    for config in configs() {
        let mut world = world_from(floor_descriptor(16, 8), config);
        for _ in 0..400 {
            world.step(TICK);
            assert!(max_penetration(&world) < 1e-3);
        }

        let collider = world.body().collider();
        assert!((collider.bottom() - 128.0).abs() < 0.1);
        assert!(world.contacts().on_floor());
        assert!(world.body().velocity.y.abs() < f32::EPSILON);
    }
}

#[test]
fn test_falls_at_terminal_velocity_without_terrain() {
    let mut descriptor = floor_descriptor(0, 8);
    descriptor.tiles.clear();
    let mut world = world_from(descriptor, WorldConfig::default());

    let reports = run(&mut world, 100);
    assert!(reports.iter().all(|report| report.resolution.is_clear()));
    assert!((world.body().velocity.y - world.config().body.terminal_velocity).abs() < f32::EPSILON);
    assert_eq!(world.tick(), 100);
}

// =============================================================================
// Walls and ceilings
// =============================================================================

#[test]
fn test_walking_into_wall_raises_and_releases_wall_flag() {
    let mut world = world_from(walled_descriptor(16, 8, 6), WorldConfig::default());
    run(&mut world, 150);
    assert!(world.contacts().on_floor());

    let reports: Vec<_> = (0..120).map(|_| walk(&mut world, 1.0)).collect();
    let first = reports
        .iter()
        .position(|report| report.resolution.blocked_left)
        .expect("actor never reached the wall");
    assert!(!reports[first].contacts.contains(Contacts::ON_RIGHT_WALL));
    assert!(reports[first + 1].contacts.contains(Contacts::ON_RIGHT_WALL));

    assert!(world.contacts().on_right_wall());
    assert!(world.contacts().on_floor());
    assert!(world.body().velocity.x.abs() < f32::EPSILON, "confirmed wall zeroes vx");
    assert!((world.body().collider().right() - 96.0).abs() < 1e-3);
    assert!(max_penetration(&world) < 1e-3);

    // Step away: one tick held, released on the second
    walk(&mut world, -1.0);
    assert!(world.contacts().on_right_wall());
    walk(&mut world, -1.0);
    assert!(!world.contacts().on_wall());
    assert!(world.contacts().on_floor());
}

#[test]
fn test_jump_into_ceiling() {
    let mut descriptor = floor_descriptor(16, 8);
    descriptor.tiles.extend(floor_descriptor(16, 4).tiles);
    descriptor.spawn = Vec2::new(40.0, 100.0);
    let mut world = world_from(descriptor, WorldConfig::default());

    run(&mut world, 60);
    assert!(world.contacts().on_floor());

    world.body_mut().velocity.y = -3.0;
    let mut hit_ceiling = false;
    for _ in 0..60 {
        let report = world.step(TICK);
        if report.contacts.contains(Contacts::ON_CEILING) {
            assert!(world.body().velocity.y.abs() < f32::EPSILON);
            assert!((world.body().collider().top() - 80.0).abs() < 1e-3);
            hit_ceiling = true;
            break;
        }
    }
    assert!(hit_ceiling, "actor never confirmed the ceiling");
    assert!(!world.contacts().on_floor(), "floor released while airborne");
}

// =============================================================================
// Pickups
// =============================================================================

#[test]
fn test_falling_through_coins_collects_matching_layer_once() {
    let mut descriptor = floor_descriptor(16, 8);
    descriptor.pickups.push(coin_at(2, 5, layers::COIN));
    descriptor.pickups.push(coin_at(2, 6, 1 << 3));
    let mut world = world_from(descriptor, WorldConfig::default());

    let reports = run(&mut world, 200);
    let collected: Vec<_> = reports.iter().flat_map(|report| report.collected.iter()).collect();

    assert_eq!(collected.len(), 1);
    assert_eq!(world.score(), 1);
    assert_eq!(world.level().pickups().len(), 1);
    assert_eq!(world.level().pickups()[0].hitbox.self_mask, 1 << 3);
}

#[test]
fn test_actor_mask_selects_layers() {
    let mut descriptor = floor_descriptor(16, 8);
    descriptor.pickups.push(coin_at(2, 5, layers::COIN));
    descriptor.pickups.push(coin_at(2, 6, 1 << 3));
    let config = WorldConfig {
        actor_mask: layers::COIN | (1 << 3),
        ..WorldConfig::default()
    };
    let mut world = world_from(descriptor, config);

    run(&mut world, 200);
    assert_eq!(world.score(), 2);
    assert!(world.level().pickups().is_empty());
}

#[test]
fn test_score_saturates_instead_of_overflowing() {
    let mut descriptor = floor_descriptor(16, 8);
    let mut jackpot = coin_at(2, 5, layers::COIN);
    jackpot.value = u32::MAX;
    descriptor.pickups.push(jackpot);
    descriptor.pickups.push(coin_at(2, 6, layers::COIN));
    let mut world = world_from(descriptor, WorldConfig::default());

    run(&mut world, 200);
    assert!(world.level().pickups().is_empty());
    assert_eq!(world.score(), u32::MAX);
}

// =============================================================================
// Step bookkeeping
// =============================================================================

#[test]
fn test_long_step_is_skipped() {
    let mut world = world_from(floor_descriptor(16, 8), WorldConfig::default());
    let start = world.body().position();

    let report = world.step(Duration::from_millis(150));
    assert!(report.skipped);
    assert_eq!(report.tick, 0);
    assert!(report.resolution.is_clear());
    assert_eq!(world.body().position(), start);

    let report = world.step(TICK);
    assert!(!report.skipped);
    assert_eq!(report.tick, 1);
}

#[test]
fn test_query_cells_cover_margin() {
    let world = world_from(floor_descriptor(16, 8), WorldConfig::default());
    // Collider (33, 9) 14x14 sits in cells x 2, y 0..=1
    let cells = world.query_cells();
    assert_eq!(cells.len(), 3 * 4);
    assert_eq!(cells.first().map(|c| (c.x, c.y)), Some((1, -1)));
    assert_eq!(cells.last().map(|c| (c.x, c.y)), Some((3, 2)));
}

#[test]
fn test_zero_margin_queries_only_covered_cells() {
    let config = WorldConfig {
        cell_margin: 0,
        ..WorldConfig::default()
    };
    let world = world_from(floor_descriptor(16, 8), config);
    let cells: Vec<_> = world.query_cells().iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(cells, vec![(2, 0), (2, 1)]);
}

#[test]
fn test_negative_margin_is_rejected_by_config() {
    let err = serde_json::from_str::<WorldConfig>(r#"{ "cell_margin": -1 }"#);
    assert!(err.is_err());

    let config: WorldConfig = serde_json::from_str(r#"{ "cell_margin": 3 }"#).unwrap();
    assert_eq!(config.cell_margin, 3);
    assert_eq!(config.max_delta, WorldConfig::default().max_delta);
}

#[test]
fn test_respawn_resets_actor() {
    let mut world = world_from(floor_descriptor(16, 8), WorldConfig::default());
    run(&mut world, 200);
    assert!(world.contacts().on_floor());

    world.respawn();
    assert_eq!(world.body().position(), world.level().spawn());
    assert_eq!(world.body().velocity, Vec2::ZERO);
    assert_eq!(world.contacts().contacts(), Contacts::empty());
}
