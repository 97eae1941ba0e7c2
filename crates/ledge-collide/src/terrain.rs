//! Static terrain: obstacle storage plus its grid index.
//!
//! [`Terrain`] is an arena. Obstacles are appended once at level load and
//! addressed by [`ObstacleId`], which is just their index. The grid, the
//! resolver and debug renderers all share those handles; nothing ever
//! removes an obstacle during simulation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grid::{GridConfig, GridError, GridIndex};
use crate::shape::Aabb;
use crate::CellCoord;

/// Handle of an obstacle inside a [`Terrain`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a handle from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObstacleId({})", self.0)
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier the level assigned to a tile (its tileset index, typically).
///
/// Unlike [`ObstacleId`] it need not be unique: every plain ground tile may
/// share one id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a tile id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// One static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Arena handle
    pub id: ObstacleId,
    /// Level-assigned tile id
    pub tile: TileId,
    /// Collision box
    pub shape: Aabb,
}

/// Static obstacles and the grid that indexes them.
#[derive(Debug, Clone)]
pub struct Terrain {
    obstacles: Vec<Obstacle>,
    grid: GridIndex<ObstacleId>,
}

impl Terrain {
    /// Create empty terrain.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the cell size is unusable.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        Ok(Self {
            obstacles: Vec::new(),
            grid: GridIndex::new(&config)?,
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push(&mut self, shape: Aabb, tile: TileId) -> ObstacleId {
        debug_assert!(u32::try_from(self.obstacles.len()).is_ok());
        let id = ObstacleId::new(self.obstacles.len() as u32);
        self.obstacles.push(Obstacle { id, tile, shape });
        id
    }

    /// Add an obstacle to every cell its box touches.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SpanTooLarge`] for a box touching more than
    /// [`crate::MAX_SPAN_CELLS`] cells. Nothing is stored then.
    pub fn insert_spanning(&mut self, shape: Aabb, tile: TileId) -> Result<ObstacleId, GridError> {
        self.grid.span_len(&shape)?;
        let id = self.push(shape, tile);
        let cells = self.grid.insert_spanning(&shape, id)?;
        trace!(%id, cells, "terrain obstacle registered");
        Ok(id)
    }

    /// Add an obstacle to one explicit cell only.
    ///
    /// Used when the level already groups tiles by chunk. The obstacle will
    /// only be found through that cell.
    pub fn insert_in_cell(&mut self, cell: CellCoord, shape: Aabb, tile: TileId) -> ObstacleId {
        let id = self.push(shape, tile);
        self.grid.insert(cell, id);
        id
    }

    /// Obstacle behind a handle.
    #[must_use]
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.index())
    }

    /// Deduplicated obstacles registered in `cells` (all cells if empty).
    #[must_use]
    pub fn candidates(&self, cells: &[CellCoord]) -> Vec<&Obstacle> {
        self.grid
            .query(cells)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// All obstacles in insertion order.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// The grid index.
    #[must_use]
    pub fn grid(&self) -> &GridIndex<ObstacleId> {
        &self.grid
    }

    /// Number of obstacles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if there are no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
