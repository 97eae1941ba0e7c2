//! # Ledge Collide
//!
//! Collision detection and resolution between a moving axis-aligned actor and
//! a large field of static axis-aligned terrain.
//!
//! The crate is built from three pieces:
//!
//! - **[`Aabb`]**: positioned rectangle with overlap, oriented overlap and
//!   single-axis ejection math
//! - **[`GridIndex`]**: uniform grid mapping cells to obstacle handles, so a
//!   tick only tests the obstacles near the actor
//! - **[`Resolver`]**: turns a set of simultaneous overlaps into one
//!   displacement plus the sides the actor was pushed from
//!
//! [`Terrain`] ties the first two together: it owns the static obstacle
//! shapes and indexes their handles.
//!
//! ## Quick Start
//!
//! ```rust
//! use glam::Vec2;
//! use ledge_collide::{Aabb, GridConfig, Resolver, Terrain, TileId};
//!
//! let mut terrain = Terrain::new(GridConfig::default()).unwrap();
//! for i in 0..4 {
//!     let tile = Aabb::from_xywh(i as f32 * 16.0, 32.0, 16.0, 16.0).unwrap();
//!     terrain.insert_spanning(tile, TileId::new(1)).unwrap();
//! }
//!
//! // Actor sunk 2 units into the floor
//! let actor = Aabb::from_xywh(20.0, 18.0, 14.0, 16.0).unwrap();
//! let cells = terrain.grid().cells_overlapping(&actor);
//! let resolution = Resolver::default().resolve(&actor, &terrain, &cells);
//!
//! assert_eq!(resolution.displacement, Vec2::new(0.0, -2.0));
//! assert!(resolution.blocked_up);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod resolver;
pub mod shape;
pub mod terrain;

// Re-exports for convenience
pub use grid::{GridConfig, GridError, GridIndex, MAX_SPAN_CELLS};
pub use resolver::{Resolution, ResolutionStrategy, Resolver, ResolverConfig};
pub use shape::{Aabb, DebugColor, ShapeError};
pub use terrain::{Obstacle, ObstacleId, Terrain, TileId};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer coordinate of one grid cell.
///
/// Only used as a lookup key. Ordering is by `x`, then `y`, which gives maps
/// keyed by cell a stable iteration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column
    pub x: i32,
    /// Row (grows downwards)
    pub y: i32,
}

impl CellCoord {
    /// Create a cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cells in the inclusive rectangle spanned by `min` and `max`, row by row.
    pub fn span(min: CellCoord, max: CellCoord) -> impl Iterator<Item = CellCoord> {
        (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| CellCoord::new(x, y)))
    }

    /// This cell moved by `dx`, `dy` cells, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ordering_is_x_major() {
        let mut cells = vec![
            CellCoord::new(1, 0),
            CellCoord::new(0, 5),
            CellCoord::new(0, -1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![CellCoord::new(0, -1), CellCoord::new(0, 5), CellCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_span_is_inclusive() {
        let cells: Vec<_> = CellCoord::span(CellCoord::new(0, 0), CellCoord::new(1, 1)).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&CellCoord::new(1, 1)));
    }

    #[test]
    fn test_offset_saturates() {
        let cell = CellCoord::new(i32::MAX - 1, i32::MIN + 1).offset(5, -5);
        assert_eq!(cell, CellCoord::new(i32::MAX, i32::MIN));
        assert_eq!(CellCoord::new(2, 3).offset(-1, 1), CellCoord::new(1, 4));
    }

    #[test]
    fn test_span_single_cell() {
        let cells: Vec<_> = CellCoord::span(CellCoord::new(-3, 2), CellCoord::new(-3, 2)).collect();
        assert_eq!(cells, vec![CellCoord::new(-3, 2)]);
    }
}
