//! Actor contact flags with one-tick hysteresis.
//!
//! The resolver reports which way the actor was pushed on a single tick.
//! Reacting to that directly makes the flags flicker: a body resting on the
//! floor sinks in, gets pushed out, sinks in again, and a single frame
//! spent airborne over a tile seam would drop `ON_FLOOR` for a frame.
//!
//! [`ContactState`] smooths this per axis:
//!
//! | this tick | last tick | effect |
//! |-----------|-----------|--------|
//! | blocked   | blocked   | confirmed: raise flags, zero that velocity component |
//! | blocked   | clear     | pending: flags unchanged |
//! | clear     | any       | flags raised: hold for one tick, clear on the second |

use bitflags::bitflags;
use glam::Vec2;
use ledge_collide::Resolution;
use serde::{Deserialize, Serialize};
use tracing::trace;

bitflags! {
    /// Surfaces the actor is currently touching.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Contacts: u8 {
        /// Standing on something (was pushed up)
        const ON_FLOOR = 1 << 0;
        /// Head against something (was pushed down)
        const ON_CEILING = 1 << 1;
        /// Wall on the left (was pushed right)
        const ON_LEFT_WALL = 1 << 2;
        /// Wall on the right (was pushed left)
        const ON_RIGHT_WALL = 1 << 3;

        /// Both vertical flags
        const VERTICAL = Self::ON_FLOOR.bits() | Self::ON_CEILING.bits();
        /// Both wall flags
        const ON_WALL = Self::ON_LEFT_WALL.bits() | Self::ON_RIGHT_WALL.bits();
    }
}

impl Contacts {
    /// Vertical flags matching the push directions of `resolution`.
    #[must_use]
    pub fn vertical_from(resolution: &Resolution) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ON_FLOOR, resolution.blocked_up);
        flags.set(Self::ON_CEILING, resolution.blocked_down);
        flags
    }

    /// Wall flags matching the push directions of `resolution`.
    #[must_use]
    pub fn horizontal_from(resolution: &Resolution) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ON_RIGHT_WALL, resolution.blocked_left);
        flags.set(Self::ON_LEFT_WALL, resolution.blocked_right);
        flags
    }
}

/// Hysteresis bookkeeping for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Latch {
    was_blocked: bool,
    releasing: bool,
}

impl Latch {
    /// Advance one tick. Returns true if the block is confirmed.
    fn step(&mut self, axis: Contacts, pushed: Contacts, flags: &mut Contacts) -> bool {
        let blocked = !pushed.is_empty();
        let confirmed = blocked && self.was_blocked;

        if confirmed {
            flags.remove(axis);
            flags.insert(pushed);
            self.releasing = false;
        } else if blocked {
            self.releasing = false;
        } else if flags.intersects(axis) {
            if self.releasing {
                flags.remove(axis);
                self.releasing = false;
            } else {
                self.releasing = true;
            }
        }

        self.was_blocked = blocked;
        confirmed
    }
}

/// Floor / ceiling / wall flags of one actor.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use ledge_core::{ContactState, Resolution};
///
/// let landed = Resolution { displacement: Vec2::new(0.0, -1.0), blocked_up: true, ..Resolution::default() };
/// let mut state = ContactState::default();
/// let mut velocity = Vec2::new(0.0, 2.0);
///
/// state.update(&landed, &mut velocity);
/// assert!(!state.on_floor());
///
/// state.update(&landed, &mut velocity);
/// assert!(state.on_floor());
/// assert_eq!(velocity.y, 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactState {
    flags: Contacts,
    horizontal: Latch,
    vertical: Latch,
}

impl ContactState {
    /// Feed one tick's resolution.
    ///
    /// Zeroes the velocity component of every confirmed axis and returns
    /// the flags after the update.
    pub fn update(&mut self, resolution: &Resolution, velocity: &mut Vec2) -> Contacts {
        let before = self.flags;

        if self
            .horizontal
            .step(Contacts::ON_WALL, Contacts::horizontal_from(resolution), &mut self.flags)
        {
            velocity.x = 0.0;
        }
        if self
            .vertical
            .step(Contacts::VERTICAL, Contacts::vertical_from(resolution), &mut self.flags)
        {
            velocity.y = 0.0;
        }

        if self.flags != before {
            trace!(from = ?before, to = ?self.flags, "contacts changed");
        }
        self.flags
    }

    /// Current flags.
    #[must_use]
    pub fn contacts(&self) -> Contacts {
        self.flags
    }

    /// Standing on the floor.
    #[must_use]
    pub fn on_floor(&self) -> bool {
        self.flags.contains(Contacts::ON_FLOOR)
    }

    /// Touching the ceiling.
    #[must_use]
    pub fn on_ceiling(&self) -> bool {
        self.flags.contains(Contacts::ON_CEILING)
    }

    /// Wall on the left.
    #[must_use]
    pub fn on_left_wall(&self) -> bool {
        self.flags.contains(Contacts::ON_LEFT_WALL)
    }

    /// Wall on the right.
    #[must_use]
    pub fn on_right_wall(&self) -> bool {
        self.flags.contains(Contacts::ON_RIGHT_WALL)
    }

    /// Wall on either side.
    #[must_use]
    pub fn on_wall(&self) -> bool {
        self.flags.intersects(Contacts::ON_WALL)
    }

    /// Forget all flags and pending state, e.g. after a teleport.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
