//! Gravity-bound kinematic body.
//!
//! Velocities are expressed per reference time unit of
//! [`REFERENCE_TICK`]; a step of any other length is scaled linearly.

use std::time::Duration;

use glam::Vec2;
use ledge_collide::{Aabb, DebugColor, ShapeError};
use serde::{Deserialize, Serialize};

/// Length of one reference time unit.
pub const REFERENCE_TICK: Duration = Duration::from_micros(8192);

/// Default downward acceleration per reference unit.
pub const DEFAULT_GRAVITY: f32 = 0.055;

/// Default fall speed cap per reference unit.
pub const DEFAULT_TERMINAL_VELOCITY: f32 = 2.4;

/// Scale factor turning a per-reference-unit rate into a per-step amount.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn time_scale(delta: Duration) -> f32 {
    delta.as_micros() as f32 / REFERENCE_TICK.as_micros() as f32
}

/// Physical tuning of a [`KinematicBody`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Added to `velocity.y` every reference unit (+y is down)
    pub gravity: f32,
    /// Upper bound of `velocity.y`
    pub terminal_velocity: f32,
    /// Collider top-left relative to the body position
    pub collider_offset: Vec2,
    /// Collider width and height
    pub collider_size: Vec2,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            collider_offset: Vec2::splat(-7.0),
            collider_size: Vec2::splat(14.0),
        }
    }
}

/// Point body with velocity and an attached collision box.
///
/// The position is the body's anchor (the collider center with the default
/// offset). The collider always sits at `position + collider_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    position: Vec2,
    /// Units per reference time unit
    pub velocity: Vec2,
    collider: Aabb,
    collider_offset: Vec2,
    config: BodyConfig,
}

impl KinematicBody {
    /// Creates a body at rest.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the collider placed at `position` would be
    /// non-finite or have a negative size.
    pub fn new(position: Vec2, config: BodyConfig) -> Result<Self, ShapeError> {
        let collider =
            Aabb::new(position + config.collider_offset, config.collider_size)?.with_color(DebugColor::ACTOR);
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            collider,
            collider_offset: config.collider_offset,
            config,
        })
    }

    /// Anchor position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Collision box in world space.
    #[must_use]
    pub fn collider(&self) -> &Aabb {
        &self.collider
    }

    /// Returns the tuning.
    #[must_use]
    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Move body and collider together.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        self.collider.translate(offset);
    }

    /// Teleport body and collider.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.collider.set_position(position + self.collider_offset);
    }

    /// Apply gravity, then move by the velocity, both scaled to `delta`.
    ///
    /// Returns the movement that was applied.
    pub fn integrate(&mut self, delta: Duration) -> Vec2 {
        let scale = time_scale(delta);
        self.velocity.y = (self.velocity.y + self.config.gravity * scale).min(self.config.terminal_velocity);

        let step = self.velocity * scale;
        self.translate(step);
        step
    }
}
