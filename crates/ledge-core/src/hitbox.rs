//! Layer-masked trigger areas.
//!
//! A [`Hitbox`] never pushes anything. Two hitboxes *connect* when the first
//! one's `self_mask` shares a bit with the second one's `other_mask` and
//! their areas intersect. The check is directional: a coin (`self_mask =
//! COIN`) connects with a collector that targets coins (`other_mask =
//! COIN`), but not the other way around.

use glam::Vec2;
use ledge_collide::Aabb;
use serde::{Deserialize, Serialize};

/// Layer bits used by the built-in pickups.
pub mod layers {
    /// Coins and other collectables
    pub const COIN: u32 = 1 << 0;
}

/// Trigger area with layer masks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// World-space area
    pub area: Aabb,
    /// Layers this hitbox belongs to
    pub self_mask: u32,
    /// Layers this hitbox reacts to
    pub other_mask: u32,
}

impl Hitbox {
    /// Creates a hitbox.
    #[must_use]
    pub const fn new(area: Aabb, self_mask: u32, other_mask: u32) -> Self {
        Self {
            area,
            self_mask,
            other_mask,
        }
    }

    /// Shared layer bits if `self` connects with `other`, `None` otherwise.
    ///
    /// The masks are checked before the areas.
    #[must_use]
    pub fn connects(&self, other: &Hitbox) -> Option<u32> {
        let shared = self.self_mask & other.other_mask;
        (shared != 0 && self.area.intersects(&other.area)).then_some(shared)
    }

    /// Move the area.
    pub fn translate(&mut self, offset: Vec2) {
        self.area.translate(offset);
    }
}
