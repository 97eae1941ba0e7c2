//! Axis-aligned bounding boxes.
//!
//! [`Aabb`] is the only collision primitive. Coordinates are screen-style:
//! `position` is the top-left corner and +y points down, so "up" is negative y.
//!
//! All overlap math assumes well-formed boxes (finite, non-negative size).
//! That is checked once in the constructors, never inside the resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a box is built from malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ShapeError {
    /// Position or size contains NaN or an infinity.
    #[error("non-finite shape: position {position}, size {size}")]
    NonFinite {
        /// Offending position
        position: Vec2,
        /// Offending size
        size: Vec2,
    },
    /// Width or height is below zero.
    #[error("negative shape size: {size}")]
    NegativeSize {
        /// Offending size
        size: Vec2,
    },
}

/// RGBA tag used by debug renderers. Never read by collision code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebugColor {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl DebugColor {
    /// Translucent grey used for static terrain.
    pub const TERRAIN: Self = Self::rgba(200, 200, 200, 96);
    /// Translucent blue used for actor colliders.
    pub const ACTOR: Self = Self::rgba(0, 0, 255, 128);

    /// Create a colour from its channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Positioned, axis-aligned rectangle.
///
/// # Invariants
///
/// - `position` and `size` are finite
/// - `size` components are `>= 0`
/// - a zero-area box never intersects anything
///
/// Deserialization runs the same checks as [`Aabb::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AabbRepr")]
pub struct Aabb {
    position: Vec2,
    size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<DebugColor>,
}

/// Unchecked wire form of [`Aabb`].
#[derive(Deserialize)]
struct AabbRepr {
    position: Vec2,
    size: Vec2,
    #[serde(default)]
    color: Option<DebugColor>,
}

impl TryFrom<AabbRepr> for Aabb {
    type Error = ShapeError;

    fn try_from(repr: AabbRepr) -> Result<Self, Self::Error> {
        let aabb = Self::new(repr.position, repr.size)?;
        Ok(Self {
            color: repr.color,
            ..aabb
        })
    }
}

impl Aabb {
    /// Create a box from its top-left corner and size.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NonFinite`] if any coordinate is NaN or infinite,
    /// and [`ShapeError::NegativeSize`] if width or height is negative.
    pub fn new(position: Vec2, size: Vec2) -> Result<Self, ShapeError> {
        if !position.is_finite() || !size.is_finite() {
            return Err(ShapeError::NonFinite { position, size });
        }
        if size.x < 0.0 || size.y < 0.0 {
            return Err(ShapeError::NegativeSize { size });
        }
        Ok(Self {
            position,
            size,
            color: None,
        })
    }

    /// Create a box from `x`, `y`, `width`, `height`.
    ///
    /// # Errors
    ///
    /// Same as [`Aabb::new`].
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Result<Self, ShapeError> {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Attach a debug colour.
    #[must_use]
    pub fn with_color(mut self, color: DebugColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Debug colour, if any.
    #[must_use]
    pub fn color(&self) -> Option<DebugColor> {
        self.color
    }

    /// Smallest x.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Largest x.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Smallest y.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Largest y.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Top-left corner (alias of [`Aabb::position`]).
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.position
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Area.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// True if the box has zero width or zero height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    /// Move the box by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        debug_assert!(offset.is_finite(), "non-finite translation {offset}");
        self.position += offset;
    }

    /// Copy of the box moved by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.translate(offset);
        self
    }

    /// Place the top-left corner at `position`.
    pub fn set_position(&mut self, position: Vec2) {
        debug_assert!(position.is_finite(), "non-finite position {position}");
        self.position = position;
    }

    /// Check if a point lies inside the box (edges inclusive on the min side).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// Strict overlap test.
    ///
    /// Boxes that only share an edge (`a.right() == b.left()`) do not
    /// intersect, and neither does a zero-area box.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Length of the overlapping interval on each axis.
    ///
    /// Both components are positive when the boxes intersect, and the result
    /// is `(0, 0)` when they do not.
    #[must_use]
    pub fn overlap_amount(&self, other: &Aabb) -> Vec2 {
        if !self.intersects(other) {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.bottom().min(other.bottom()) - self.top().max(other.top()),
        )
    }

    /// Overlap amount signed to point from `other`'s center towards ours.
    ///
    /// A positive `x` means this box would have to move right to leave
    /// `other`. When both centers coincide on an axis there is no side to
    /// prefer and that component is zero, so
    /// `a.oriented_overlap(b) == -b.oriented_overlap(a)` always holds.
    #[must_use]
    pub fn oriented_overlap(&self, other: &Aabb) -> Vec2 {
        let amount = self.overlap_amount(other);
        let (mine, theirs) = (self.center(), other.center());
        Vec2::new(
            orient(amount.x, mine.x, theirs.x),
            orient(amount.y, mine.y, theirs.y),
        )
    }

    /// Single-axis displacement that separates this box from `other`.
    ///
    /// The axis with the smaller overlap is resolved; on a tie (`dy <= dx`)
    /// the push is vertical. The push points away from `other`'s center, and
    /// is positive when the centers coincide.
    ///
    /// A non-zero `overlap_override` is used instead of recomputing
    /// [`Aabb::overlap_amount`]; the three-round resolver feeds its cached
    /// overlap through here.
    #[must_use]
    pub fn ejection_vector(&self, other: &Aabb, overlap_override: Option<Vec2>) -> Vec2 {
        let amount = overlap_override
            .filter(|overlap| *overlap != Vec2::ZERO)
            .unwrap_or_else(|| self.overlap_amount(other));
        if amount == Vec2::ZERO {
            return Vec2::ZERO;
        }

        let (mine, theirs) = (self.center(), other.center());
        if amount.y <= amount.x {
            Vec2::new(0.0, push(amount.y, mine.y, theirs.y))
        } else {
            Vec2::new(push(amount.x, mine.x, theirs.x), 0.0)
        }
    }
}

fn orient(amount: f32, mine: f32, theirs: f32) -> f32 {
    if mine < theirs {
        -amount
    } else if mine > theirs {
        amount
    } else {
        0.0
    }
}

fn push(amount: f32, mine: f32, theirs: f32) -> f32 {
    if mine < theirs {
        -amount
    } else {
        amount
    }
}
