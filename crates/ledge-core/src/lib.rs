//! # Ledge Core
//!
//! Headless actor simulation for a tile-based platformer.
//!
//! This crate drives one gravity-bound actor through terrain indexed by
//! [`ledge_collide`], one fixed-order tick at a time:
//!
//! 1. **Integrate**: gravity and velocity move the [`KinematicBody`]
//! 2. **Gather**: the grid yields obstacles near the actor's collider
//! 3. **Resolve**: the [`Resolver`] computes a single correction
//! 4. **Apply**: the correction is added and [`ContactState`] turns the
//!    blocked sides into floor / ceiling / wall flags
//! 5. **Collect**: pickups whose [`Hitbox`] connects with the actor are
//!    removed from the [`Level`]
//!
//! Rendering, input and tile-map parsing stay with the host.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use glam::Vec2;
//! use ledge_core::{Aabb, GridConfig, Level, TileId, World, WorldConfig};
//!
//! let floor = (0..8).map(|i| {
//!     let bounds = Aabb::from_xywh(i as f32 * 16.0, 64.0, 16.0, 16.0).unwrap();
//!     (None, bounds, TileId::new(1))
//! });
//! let mut level = Level::from_triples(GridConfig::default(), floor).unwrap();
//! level.set_spawn(Vec2::new(40.0, 20.0));
//!
//! let mut world = World::new(level, WorldConfig::default()).unwrap();
//! for _ in 0..200 {
//!     world.step(Duration::from_micros(8192));
//! }
//! assert!(world.contacts().on_floor());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the collision layer for hosts that only depend on this crate
pub use ledge_collide;

pub mod body;
pub mod contact;
pub mod hitbox;
pub mod level;
pub mod world;

pub use body::{BodyConfig, KinematicBody};
pub use contact::{ContactState, Contacts};
pub use hitbox::Hitbox;
pub use level::{Level, LevelDescriptor, LevelError, Pickup, PickupDescriptor, PickupId, TileDescriptor};
pub use world::{TickReport, World, WorldConfig};

pub use ledge_collide::{
    Aabb, CellCoord, GridConfig, Resolution, ResolutionStrategy, Resolver, ResolverConfig, ShapeError,
    TileId,
};

#[cfg(test)]
mod tests;
