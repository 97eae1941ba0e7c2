//! Level assembly.
//!
//! A level is built once from plain descriptors (what a tile-map parser
//! produces) and is read-only afterwards, apart from pickups being removed
//! as they are collected.

use std::fmt;

use glam::Vec2;
use ledge_collide::{Aabb, CellCoord, DebugColor, GridConfig, GridError, ShapeError, Terrain, TileId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::hitbox::{layers, Hitbox};

// =============================================================================
// Errors
// =============================================================================

/// Error returned when a level cannot be assembled.
#[derive(Debug, Error)]
pub enum LevelError {
    /// A box or the spawn point is malformed.
    #[error("invalid shape: {0}")]
    Shape(#[from] ShapeError),
    /// The grid cell size is unusable.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    /// The JSON document does not describe a level.
    #[error("malformed level document: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Descriptors
// =============================================================================

/// One static tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Register only in this cell instead of every cell the box touches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellCoord>,
    /// Collision box
    pub bounds: Aabb,
    /// Level-assigned id
    pub tile: TileId,
}

fn default_pickup_mask() -> u32 {
    layers::COIN
}

fn default_pickup_value() -> u32 {
    1
}

/// One collectable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupDescriptor {
    /// Trigger area
    pub bounds: Aabb,
    /// Layer bits the pickup belongs to
    #[serde(default = "default_pickup_mask")]
    pub mask: u32,
    /// Score awarded on collection
    #[serde(default = "default_pickup_value")]
    pub value: u32,
}

/// Everything needed to build a [`Level`].
///
/// # Example
///
/// ```
/// use ledge_core::Level;
///
/// let level = Level::from_json(r#"{
///     "grid": { "cell_size": [16.0, 16.0] },
///     "tiles": [
///         { "bounds": { "position": [0.0, 32.0], "size": [48.0, 16.0] }, "tile": 1 }
///     ],
///     "pickups": [
///         { "bounds": { "position": [16.0, 16.0], "size": [16.0, 16.0] } }
///     ],
///     "spawn": [8.0, 8.0]
/// }"#).unwrap();
///
/// assert_eq!(level.terrain().len(), 1);
/// assert_eq!(level.terrain().grid().registration_count(), 3);
/// assert_eq!(level.pickups().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Grid tuning
    #[serde(default)]
    pub grid: GridConfig,
    /// Static terrain
    pub tiles: Vec<TileDescriptor>,
    /// Collectables
    #[serde(default)]
    pub pickups: Vec<PickupDescriptor>,
    /// Actor start position
    #[serde(default)]
    pub spawn: Vec2,
}

// =============================================================================
// Pickups
// =============================================================================

/// Handle of a pickup, stable for the lifetime of its level.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PickupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PickupId({})", self.0)
    }
}

impl fmt::Display for PickupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A collectable still lying in the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Handle
    pub id: PickupId,
    /// Trigger area; `self_mask` holds the pickup's layers
    pub hitbox: Hitbox,
    /// Score awarded on collection
    pub value: u32,
}

// =============================================================================
// Level
// =============================================================================

/// Static terrain, remaining pickups and the spawn point.
#[derive(Debug, Clone)]
pub struct Level {
    terrain: Terrain,
    pickups: Vec<Pickup>,
    next_pickup: u32,
    spawn: Vec2,
}

impl Level {
    /// Build a level from its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Grid`] for an unusable cell size or a tile
    /// spanning too many cells, and [`LevelError::Shape`] for a non-finite
    /// spawn point.
    pub fn build(descriptor: LevelDescriptor) -> Result<Self, LevelError> {
        // Spawn marker, validated like any other box
        Aabb::new(descriptor.spawn, Vec2::ZERO)?;

        let mut level = Self {
            terrain: Terrain::new(descriptor.grid)?,
            pickups: Vec::with_capacity(descriptor.pickups.len()),
            next_pickup: 0,
            spawn: descriptor.spawn,
        };
        for tile in descriptor.tiles {
            level.add_tile(tile)?;
        }
        for pickup in descriptor.pickups {
            level.add_pickup(pickup);
        }

        debug!(
            obstacles = level.terrain.len(),
            registrations = level.terrain.grid().registration_count(),
            pickups = level.pickups.len(),
            "level built"
        );
        Ok(level)
    }

    /// Build terrain from `(cell, bounds, tile)` triples, as produced by a
    /// tile-map loader. `None` as the cell registers the tile in every cell
    /// it touches.
    ///
    /// # Errors
    ///
    /// Same as [`Level::build`].
    pub fn from_triples<I>(grid: GridConfig, triples: I) -> Result<Self, LevelError>
    where
        I: IntoIterator<Item = (Option<CellCoord>, Aabb, TileId)>,
    {
        let tiles = triples
            .into_iter()
            .map(|(cell, bounds, tile)| TileDescriptor { cell, bounds, tile })
            .collect();
        Self::build(LevelDescriptor {
            grid,
            tiles,
            ..LevelDescriptor::default()
        })
    }

    /// Parse a [`LevelDescriptor`] from JSON and build it.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Parse`] for malformed JSON, including boxes that
    /// fail validation, and whatever [`Level::build`] returns.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let descriptor: LevelDescriptor = serde_json::from_str(json)?;
        Self::build(descriptor)
    }

    /// Add one static tile.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Grid`] if a spanning tile touches more cells
    /// than the grid accepts for one obstacle.
    pub fn add_tile(&mut self, tile: TileDescriptor) -> Result<(), LevelError> {
        let bounds = tile.bounds.with_color(DebugColor::TERRAIN);
        match tile.cell {
            Some(cell) => self.terrain.insert_in_cell(cell, bounds, tile.tile),
            None => self.terrain.insert_spanning(bounds, tile.tile)?,
        };
        Ok(())
    }

    /// Add one collectable.
    pub fn add_pickup(&mut self, pickup: PickupDescriptor) -> PickupId {
        let id = PickupId(self.next_pickup);
        self.next_pickup += 1;
        self.pickups.push(Pickup {
            id,
            hitbox: Hitbox::new(pickup.bounds, pickup.mask, 0),
            value: pickup.value,
        });
        id
    }

    /// Remove and return every pickup that connects with `collector`.
    pub fn collect(&mut self, collector: &Hitbox) -> Vec<Pickup> {
        let mut collected = Vec::new();
        self.pickups.retain(|pickup| {
            let hit = pickup.hitbox.connects(collector).is_some();
            if hit {
                collected.push(*pickup);
            }
            !hit
        });
        collected
    }

    /// Static terrain.
    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Pickups not yet collected, in insertion order.
    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Actor start position.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Move the actor start position.
    pub fn set_spawn(&mut self, spawn: Vec2) {
        self.spawn = spawn;
    }
}
