//! Static collision resolution.
//!
//! A [`Resolver`] takes the actor's box and the candidate obstacles near it,
//! and produces a [`Resolution`]: one displacement that moves the actor out
//! of the terrain, plus the directions it was pushed in. The actor itself is
//! never mutated; the caller applies `displacement`.
//!
//! # Strategies
//!
//! Standing on a tile seam or wedged into a corner overlaps several tiles at
//! once. Ejecting from each tile independently and summing the pushes
//! double-counts the shared overlap. Two strategies deal with that:
//!
//! - [`ResolutionStrategy::OrientedCancellation`]: one pass. Oriented
//!   overlaps that point in opposite directions on an axis cancel, and the
//!   largest remaining push per axis wins.
//! - [`ResolutionStrategy::ThreeRound`]: up to three flat passes. Clear-cut
//!   overlaps are resolved immediately, near-diagonal ones are cached and
//!   only resolved once the geometry stops changing under them, and anything
//!   left after the second pass is forced out in the third.
//!
//! # Invariants
//!
//! - A call never keeps state past its return; the round cache is local
//! - A call always terminates: at most three passes over the candidates
//!   (four with [`ResolverConfig::final_sweep`])
//! - Candidates are expected to be deduplicated ([`crate::GridIndex::query`]
//!   already does this)

mod cancel;
mod rounds;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::shape::Aabb;
use crate::terrain::Terrain;
use crate::CellCoord;

/// Default width of the near-diagonal band in the three-round strategy.
pub const DEFAULT_TOLERANCE: f32 = 2.0;

/// Default smallest push component that counts as being blocked.
pub const DEFAULT_BLOCK_EPSILON: f32 = 1e-4;

/// Which algorithm a [`Resolver`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStrategy {
    /// Single pass with opposite-direction cancellation.
    #[default]
    OrientedCancellation,
    /// Cache-convergence resolution over up to three rounds.
    ThreeRound,
}

/// Tuning for a [`Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Algorithm to run
    pub strategy: ResolutionStrategy,
    /// Three-round only: an overlap whose `|dx| / |dy|` ratio lies within
    /// `[1 / tolerance, tolerance]` is treated as a corner case and cached.
    /// Values `<= 1` disable caching altogether.
    pub tolerance: f32,
    /// A push component larger than this sets the matching `blocked_*` flag.
    pub block_epsilon: f32,
    /// Three-round only: after the forced round, run one more unconditional
    /// pass over every candidate.
    pub final_sweep: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: ResolutionStrategy::default(),
            tolerance: DEFAULT_TOLERANCE,
            block_epsilon: DEFAULT_BLOCK_EPSILON,
            final_sweep: false,
        }
    }
}

impl ResolverConfig {
    /// Default tuning with the given strategy.
    #[must_use]
    pub fn with_strategy(strategy: ResolutionStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// Outcome of one resolution call.
///
/// Each `blocked_*` flag names a direction the actor was *pushed* in. An
/// actor resting on a floor is pushed up, so `blocked_up` is set and
/// `blocked_down` is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Correction to add to the actor's position
    pub displacement: Vec2,
    /// Pushed towards -x (an obstacle on the right)
    pub blocked_left: bool,
    /// Pushed towards +x (an obstacle on the left)
    pub blocked_right: bool,
    /// Pushed towards -y (an obstacle below)
    pub blocked_up: bool,
    /// Pushed towards +y (an obstacle above)
    pub blocked_down: bool,
}

impl Resolution {
    /// Pushed sideways this call.
    #[must_use]
    pub fn blocked_horizontal(&self) -> bool {
        self.blocked_left || self.blocked_right
    }

    /// Pushed vertically this call.
    #[must_use]
    pub fn blocked_vertical(&self) -> bool {
        self.blocked_up || self.blocked_down
    }

    /// No correction and no contact.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.displacement == Vec2::ZERO && !self.blocked_horizontal() && !self.blocked_vertical()
    }

    /// Raise the flags matching one applied push.
    fn record(&mut self, push: Vec2, epsilon: f32) {
        if push.x.abs() > epsilon {
            if push.x > 0.0 {
                self.blocked_right = true;
            } else {
                self.blocked_left = true;
            }
        }
        if push.y.abs() > epsilon {
            if push.y > 0.0 {
                self.blocked_down = true;
            } else {
                self.blocked_up = true;
            }
        }
    }
}

/// Stateless collision resolver.
///
/// Cheap to copy; share one per world or build one per call.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use ledge_collide::{Aabb, Resolver};
///
/// let actor = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
/// let wall = Aabb::from_xywh(8.0, 0.0, 10.0, 10.0).unwrap();
///
/// let resolution = Resolver::default().resolve_against(&actor, &[wall]);
/// assert_eq!(resolution.displacement, Vec2::new(-2.0, 0.0));
/// assert!(resolution.blocked_left);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver with the given tuning.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolver running [`ResolutionStrategy::ThreeRound`] with default tuning.
    #[must_use]
    pub fn three_round() -> Self {
        Self::new(ResolverConfig::with_strategy(ResolutionStrategy::ThreeRound))
    }

    /// Returns the tuning.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `actor` against the obstacles registered in `cells`.
    ///
    /// An empty `cells` slice checks every obstacle in the terrain. That is
    /// fine for small levels; large ones should pass the actor's cells.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(strategy = ?self.config.strategy, cells = cells.len()))]
    pub fn resolve(&self, actor: &Aabb, terrain: &Terrain, cells: &[CellCoord]) -> Resolution {
        let candidates: Vec<Aabb> = terrain
            .candidates(cells)
            .into_iter()
            .map(|obstacle| obstacle.shape)
            .collect();
        self.resolve_against(actor, &candidates)
    }

    /// Resolve `actor` against an explicit, deduplicated candidate list.
    #[must_use]
    pub fn resolve_against(&self, actor: &Aabb, candidates: &[Aabb]) -> Resolution {
        match self.config.strategy {
            ResolutionStrategy::OrientedCancellation => {
                cancel::resolve(actor, candidates, &self.config)
            }
            ResolutionStrategy::ThreeRound => rounds::resolve(actor, candidates, &self.config),
        }
    }
}
