use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use ledge_collide::{Aabb, GridConfig, Resolver, Terrain, TileId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Floor row plus randomly scattered 16-unit blocks over a 256x64 tile map.
fn scattered_terrain(seed: u64) -> Terrain {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut terrain = Terrain::new(GridConfig::default()).unwrap();

    for x in 0..256 {
        let tile = Aabb::from_xywh(x as f32 * 16.0, 63.0 * 16.0, 16.0, 16.0).unwrap();
        terrain.insert_spanning(tile, TileId::new(1)).unwrap();
    }
    for _ in 0..2000 {
        let x = rng.gen_range(0..256) as f32 * 16.0;
        let y = rng.gen_range(0..63) as f32 * 16.0;
        terrain.insert_spanning(Aabb::from_xywh(x, y, 16.0, 16.0).unwrap(), TileId::new(2)).unwrap();
    }
    terrain
}

fn actors(seed: u64, count: usize) -> Vec<Aabb> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(0.0..4080.0), rng.gen_range(0.0..1008.0));
            Aabb::new(position, Vec2::new(14.0, 24.0)).unwrap()
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let terrain = scattered_terrain(42);
    let actors = actors(7, 256);
    let cells: Vec<_> = actors
        .iter()
        .map(|actor| terrain.grid().cells_overlapping(actor))
        .collect();

    for (name, resolver) in [
        ("resolve_oriented", Resolver::default()),
        ("resolve_three_round", Resolver::three_round()),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                for (actor, cells) in actors.iter().zip(&cells) {
                    black_box(resolver.resolve(actor, &terrain, cells));
                }
            })
        });
    }
}

fn bench_grid_query(c: &mut Criterion) {
    let terrain = scattered_terrain(42);
    let actors = actors(7, 256);

    c.bench_function("grid_query", |b| {
        b.iter(|| {
            for actor in &actors {
                let cells = terrain.grid().cells_overlapping(actor);
                black_box(terrain.candidates(&cells));
            }
        })
    });
}

fn bench_unindexed(c: &mut Criterion) {
    // Reference point: every obstacle is a candidate
    let terrain = scattered_terrain(42);
    let actors = actors(7, 16);
    let resolver = Resolver::default();

    c.bench_function("resolve_unindexed", |b| {
        b.iter(|| {
            for actor in &actors {
                black_box(resolver.resolve(actor, &terrain, &[]));
            }
        })
    });
}

criterion_group!(benches, bench_strategies, bench_grid_query, bench_unindexed);
criterion_main!(benches);
