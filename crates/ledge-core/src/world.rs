//! Per-tick world driver.
//!
//! [`World`] owns the level and the single actor and runs one fixed-order
//! tick per [`World::step`] call:
//!
//! 1. integrate gravity and velocity
//! 2. gather the cells around the actor's collider
//! 3. resolve against the obstacles registered there
//! 4. apply the correction and update the contact flags
//! 5. collect the pickups the actor touches
//!
//! Nothing here reads a clock; the host passes the elapsed time in, so two
//! worlds fed the same deltas produce bit-identical trajectories.

use std::time::Duration;

use glam::Vec2;
use ledge_collide::{CellCoord, Resolution, ResolutionStrategy, Resolver, ResolverConfig, ShapeError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::body::{BodyConfig, KinematicBody};
use crate::contact::{ContactState, Contacts};
use crate::hitbox::{layers, Hitbox};
use crate::level::{Level, PickupId};

/// Default number of extra cells searched around the actor.
pub const DEFAULT_CELL_MARGIN: u32 = 1;

/// Default longest step that is still simulated.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// World tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Actor physics and collider
    pub body: BodyConfig,
    /// Collision resolution tuning. Defaults to
    /// [`ResolutionStrategy::ThreeRound`]; a single oriented-cancellation
    /// pass zeroes both axes where a floor meets a wall.
    pub resolver: ResolverConfig,
    /// Cells added on every side of the actor's covered cells
    pub cell_margin: u32,
    /// Pickup layers the actor collects
    pub actor_mask: u32,
    /// Steps longer than this are dropped instead of simulated
    pub max_delta: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            body: BodyConfig::default(),
            resolver: ResolverConfig::with_strategy(ResolutionStrategy::ThreeRound),
            cell_margin: DEFAULT_CELL_MARGIN,
            actor_mask: layers::COIN,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}

/// What happened during one [`World::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick counter after the step
    pub tick: u64,
    /// The step was longer than [`WorldConfig::max_delta`] and did nothing
    pub skipped: bool,
    /// Collision correction applied this tick
    pub resolution: Resolution,
    /// Contact flags after the update
    pub contacts: Contacts,
    /// Pickups collected this tick
    pub collected: Vec<PickupId>,
}

/// A level plus the one actor moving through it.
#[derive(Debug, Clone)]
pub struct World {
    level: Level,
    body: KinematicBody,
    contacts: ContactState,
    resolver: Resolver,
    config: WorldConfig,
    tick: u64,
    score: u32,
}

impl World {
    /// Creates a world with the actor at the level's spawn point.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the configured collider is malformed.
    pub fn new(level: Level, config: WorldConfig) -> Result<Self, ShapeError> {
        let body = KinematicBody::new(level.spawn(), config.body)?;
        Ok(Self {
            level,
            body,
            contacts: ContactState::default(),
            resolver: Resolver::new(config.resolver),
            config,
            tick: 0,
            score: 0,
        })
    }

    /// Advance the simulation by `delta`.
    #[instrument(level = "trace", skip(self), fields(tick = self.tick))]
    pub fn step(&mut self, delta: Duration) -> TickReport {
        if delta > self.config.max_delta {
            debug!(?delta, max = ?self.config.max_delta, "step too long, skipped");
            return TickReport {
                tick: self.tick,
                skipped: true,
                resolution: Resolution::default(),
                contacts: self.contacts.contacts(),
                collected: Vec::new(),
            };
        }

        self.tick += 1;
        self.body.integrate(delta);

        let cells = self.query_cells();
        let resolution = self
            .resolver
            .resolve(self.body.collider(), self.level.terrain(), &cells);
        self.body.translate(resolution.displacement);

        let contacts = self.contacts.update(&resolution, &mut self.body.velocity);

        let collector = Hitbox::new(*self.body.collider(), 0, self.config.actor_mask);
        let collected: Vec<PickupId> = self
            .level
            .collect(&collector)
            .into_iter()
            .map(|pickup| {
                self.score = self.score.saturating_add(pickup.value);
                debug!(id = %pickup.id, value = pickup.value, "pickup collected");
                pickup.id
            })
            .collect();

        TickReport {
            tick: self.tick,
            skipped: false,
            resolution,
            contacts,
            collected,
        }
    }

    /// Cells overlapping the actor's collider, grown by the cell margin.
    ///
    /// Never empty: a margin of zero still yields the covered cells.
    #[must_use]
    pub fn query_cells(&self) -> Vec<CellCoord> {
        let margin = i32::try_from(self.config.cell_margin).unwrap_or(i32::MAX);
        let (first, last) = self.level.terrain().grid().cell_range(self.body.collider());
        CellCoord::span(first.offset(-margin, -margin), last.offset(margin, margin)).collect()
    }

    /// Put the actor back at the spawn point, at rest and without contacts.
    pub fn respawn(&mut self) {
        self.body.set_position(self.level.spawn());
        self.body.velocity = Vec2::ZERO;
        self.contacts.reset();
    }

    /// The actor.
    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// The actor, for input handling between steps.
    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    /// Current contact flags.
    #[must_use]
    pub fn contacts(&self) -> &ContactState {
        &self.contacts
    }

    /// The level.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Returns the tuning.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Ticks simulated so far (skipped steps excluded).
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total value of collected pickups, saturating at `u32::MAX`.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }
}
