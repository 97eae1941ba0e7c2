//! Level builders and stepping utilities shared by the scenario tests.

use std::time::Duration;

use glam::Vec2;
use ledge_collide::{Aabb, GridConfig, TileId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::body::REFERENCE_TICK;
use crate::level::{Level, LevelDescriptor, PickupDescriptor, TileDescriptor};
use crate::world::{TickReport, World, WorldConfig};

/// One reference tick.
pub const TICK: Duration = REFERENCE_TICK;

/// Side length of every test tile.
pub const TILE: f32 = 16.0;

/// Tile-sized box at tile coordinates `(col, row)`.
#[allow(clippy::cast_precision_loss)]
pub fn tile_at(col: i32, row: i32) -> Aabb {
    Aabb::from_xywh(col as f32 * TILE, row as f32 * TILE, TILE, TILE).unwrap()
}

fn tile(col: i32, row: i32) -> TileDescriptor {
    TileDescriptor {
        cell: None,
        bounds: tile_at(col, row),
        tile: TileId::new(1),
    }
}

/// A floor row `cols` tiles wide at `floor_row`, spawn above column 2.
pub fn floor_descriptor(cols: i32, floor_row: i32) -> LevelDescriptor {
    LevelDescriptor {
        grid: GridConfig::square(TILE),
        tiles: (0..cols).map(|col| tile(col, floor_row)).collect(),
        pickups: Vec::new(),
        spawn: Vec2::new(2.5 * TILE, TILE),
    }
}

/// Floor plus a wall column at `wall_col`, two tiles high.
pub fn walled_descriptor(cols: i32, floor_row: i32, wall_col: i32) -> LevelDescriptor {
    let mut descriptor = floor_descriptor(cols, floor_row);
    descriptor.tiles.push(tile(wall_col, floor_row - 1));
    descriptor.tiles.push(tile(wall_col, floor_row - 2));
    descriptor
}

/// Coin occupying the tile at `(col, row)`.
pub fn coin_at(col: i32, row: i32, mask: u32) -> PickupDescriptor {
    PickupDescriptor {
        bounds: tile_at(col, row),
        mask,
        value: 1,
    }
}

/// Seeded random level: a floor row plus scattered blocks and ledges.
pub fn random_descriptor(seed: u64) -> LevelDescriptor {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut descriptor = floor_descriptor(64, 24);

    for _ in 0..120 {
        let col = rng.gen_range(0..64);
        let row = rng.gen_range(4..24);
        descriptor.tiles.push(tile(col, row));
    }
    descriptor
}

/// Build a world from a descriptor with the given config.
pub fn world_from(descriptor: LevelDescriptor, config: WorldConfig) -> World {
    World::new(Level::build(descriptor).unwrap(), config).unwrap()
}

/// Step `ticks` reference ticks and return every report.
pub fn run(world: &mut World, ticks: usize) -> Vec<TickReport> {
    (0..ticks).map(|_| world.step(TICK)).collect()
}

/// Deepest overlap between the actor and any obstacle.
pub fn max_penetration(world: &World) -> f32 {
    let collider = world.body().collider();
    world
        .level()
        .terrain()
        .obstacles()
        .iter()
        .map(|obstacle| collider.overlap_amount(&obstacle.shape).min_element())
        .fold(0.0, f32::max)
}
