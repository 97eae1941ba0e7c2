//! Uniform grid index over obstacle handles.
//!
//! The grid maps a [`CellCoord`] to the handles registered in that cell.
//! An obstacle that straddles a cell boundary is registered in every cell it
//! touches, so a query over the actor's cells never misses a partially
//! overlapping obstacle. Queries deduplicate, since the same obstacle tested
//! twice in one pass would be resolved twice.
//!
//! The index never owns the obstacles. It holds copyable handles and only
//! ever forgets its own references.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::Aabb;
use crate::CellCoord;

/// Most cells a single obstacle may be registered in.
pub const MAX_SPAN_CELLS: u64 = 1 << 16;

/// Configuration for a [`GridIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width and height of one cell in world units
    pub cell_size: Vec2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: Vec2::splat(16.0),
        }
    }
}

impl GridConfig {
    /// Config with square cells.
    #[must_use]
    pub fn square(size: f32) -> Self {
        Self {
            cell_size: Vec2::splat(size),
        }
    }
}

/// Error returned for an unusable cell size or an oversized obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    /// Cell width or height is zero, negative or not finite.
    #[error("invalid cell size {cell_size}: both components must be finite and > 0")]
    InvalidCellSize {
        /// Offending cell size
        cell_size: Vec2,
    },
    /// A box touches more than [`MAX_SPAN_CELLS`] cells.
    #[error("box spans {cells} cells, limit is {limit}")]
    SpanTooLarge {
        /// Cells the box touches
        cells: u64,
        /// The limit it exceeds
        limit: u64,
    },
}

/// Cell → handle lists, iterated in ascending cell order.
#[derive(Debug, Clone)]
pub struct GridIndex<H> {
    cell_size: Vec2,
    cells: BTreeMap<CellCoord, Vec<H>>,
}

impl<H> GridIndex<H>
where
    H: Copy + Eq + Hash,
{
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCellSize`] unless both cell dimensions are
    /// finite and strictly positive.
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        let cell_size = config.cell_size;
        if !cell_size.is_finite() || cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            return Err(GridError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            cell_size,
            cells: BTreeMap::new(),
        })
    }

    /// Cell dimensions.
    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Cell containing `point` (floor division, also for negative coordinates).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, point: Vec2) -> CellCoord {
        let cell = (point / self.cell_size).floor();
        CellCoord::new(cell.x as i32, cell.y as i32)
    }

    /// Inclusive cell range touched by `bounds`.
    ///
    /// The first cell is the floor of the min corner. The last cell is
    /// `ceil(max / size) - 1`, so an edge that lands exactly on a boundary
    /// stays in the cell before it. A degenerate box still covers the cell
    /// of its min corner.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_range(&self, bounds: &Aabb) -> (CellCoord, CellCoord) {
        let first = self.cell_of(bounds.min());
        let last = (bounds.max() / self.cell_size).ceil() - Vec2::ONE;
        let last = CellCoord::new((last.x as i32).max(first.x), (last.y as i32).max(first.y));
        (first, last)
    }

    /// Number of cells `bounds` touches.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SpanTooLarge`] past [`MAX_SPAN_CELLS`].
    pub fn span_len(&self, bounds: &Aabb) -> Result<u64, GridError> {
        let (first, last) = self.cell_range(bounds);
        let width = (i64::from(last.x) - i64::from(first.x) + 1).unsigned_abs();
        let height = (i64::from(last.y) - i64::from(first.y) + 1).unsigned_abs();
        let cells = width.saturating_mul(height);
        if cells > MAX_SPAN_CELLS {
            return Err(GridError::SpanTooLarge {
                cells,
                limit: MAX_SPAN_CELLS,
            });
        }
        Ok(cells)
    }

    /// Every cell touched by `bounds`, in ascending order.
    #[must_use]
    pub fn cells_overlapping(&self, bounds: &Aabb) -> Vec<CellCoord> {
        let (first, last) = self.cell_range(bounds);
        CellCoord::span(first, last).collect()
    }

    /// Append `handle` to the list of `cell`.
    pub fn insert(&mut self, cell: CellCoord, handle: H) {
        self.cells.entry(cell).or_default().push(handle);
    }

    /// Register `handle` in every cell `bounds` touches.
    ///
    /// Returns the number of cells the handle was added to.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SpanTooLarge`] without registering anything if
    /// the box touches more than [`MAX_SPAN_CELLS`] cells.
    pub fn insert_spanning(&mut self, bounds: &Aabb, handle: H) -> Result<usize, GridError> {
        self.span_len(bounds)?;
        let (first, last) = self.cell_range(bounds);
        let mut count = 0;
        for cell in CellCoord::span(first, last) {
            self.insert(cell, handle);
            count += 1;
        }
        Ok(count)
    }

    /// Handles registered in one cell, in insertion order.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> &[H] {
        self.cells.get(&cell).map_or(&[][..], Vec::as_slice)
    }

    /// Deduplicated union of the handles in `cells`.
    ///
    /// An empty `cells` slice means every registered cell. Order is
    /// first-seen: cells in the given order (ascending when all cells are
    /// scanned), handles in insertion order within a cell. Cells with nothing
    /// registered contribute nothing.
    #[must_use]
    pub fn query(&self, cells: &[CellCoord]) -> Vec<H> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut gather = |handles: &[H]| {
            for &handle in handles {
                if seen.insert(handle) {
                    out.push(handle);
                }
            }
        };

        if cells.is_empty() {
            for handles in self.cells.values() {
                gather(handles);
            }
        } else {
            for &cell in cells {
                gather(self.cell(cell));
            }
        }
        out
    }

    /// Iterate over non-empty cells in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &[H])> + '_ {
        self.cells.iter().map(|(cell, handles)| (*cell, handles.as_slice()))
    }

    /// Number of cells with at least one registration.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total registrations, counting a spanning obstacle once per cell.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// True if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
