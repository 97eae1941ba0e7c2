//! Three-round cache-convergence resolution.
//!
//! 1. Overlaps that are clearly wider than tall (or taller than wide) are
//!    resolved on the spot. Near-diagonal ones are cached instead.
//! 2. A cached obstacle whose overlap is still bit-for-bit the cached value
//!    was not disturbed by round 1, so it is resolved from the cache. One
//!    whose overlap changed gets its cache refreshed.
//! 3. Whatever is still cached and still intersecting is forced out.
//!
//! The rounds are flat passes over the candidate list, never recursive.
//! Round 3 measures every forced push from the same position and merges
//! them with the oriented-cancellation rule, so the four pushes of a
//! centred corner cancel instead of stacking into a diagonal. It does not
//! revisit obstacles resolved in the earlier rounds; the optional final
//! sweep does.

use glam::Vec2;
use tracing::trace;

use super::cancel::{cancel_opposing, strongest};
use super::{Resolution, ResolverConfig};
use crate::shape::Aabb;

pub(super) fn resolve(actor: &Aabb, candidates: &[Aabb], config: &ResolverConfig) -> Resolution {
    let mut pass = Pass::new(*actor, config.block_epsilon);
    // One cache slot per candidate, zeroed on every call
    let mut cache = vec![Vec2::ZERO; candidates.len()];

    let second = pass.round_one(candidates, &mut cache, config.tolerance);
    let third = second && pass.round_two(candidates, &mut cache);
    if third {
        pass.round_three(candidates, &cache);
    }
    if config.final_sweep {
        pass.sweep(candidates);
    }

    pass.finish(actor)
}

/// True if the overlap is far enough from diagonal to resolve immediately.
///
/// A zero `dy` has no usable ratio and counts as ambiguous.
fn is_unambiguous(overlap: Vec2, tolerance: f32) -> bool {
    if overlap.y == 0.0 {
        return false;
    }
    let check = overlap.x.abs() / overlap.y.abs();
    check > tolerance || check < tolerance.recip()
}

/// Working state of one call: a private copy of the actor and the flags
/// collected so far.
struct Pass {
    actor: Aabb,
    resolution: Resolution,
    epsilon: f32,
}

impl Pass {
    fn new(actor: Aabb, epsilon: f32) -> Self {
        Self {
            actor,
            resolution: Resolution::default(),
            epsilon,
        }
    }

    fn eject(&mut self, obstacle: &Aabb, overlap: Option<Vec2>) -> Vec2 {
        let push = self.actor.ejection_vector(obstacle, overlap);
        self.actor.translate(push);
        self.resolution.record(push, self.epsilon);
        push
    }

    /// Returns true if anything was cached.
    fn round_one(&mut self, candidates: &[Aabb], cache: &mut [Vec2], tolerance: f32) -> bool {
        let mut cached = false;
        for (index, obstacle) in candidates.iter().enumerate() {
            if !self.actor.intersects(obstacle) {
                continue;
            }
            let overlap = self.actor.overlap_amount(obstacle);
            if is_unambiguous(overlap, tolerance) {
                let push = self.eject(obstacle, Some(overlap));
                trace!(round = 1, index, %overlap, %push, "ejected");
            } else {
                cache[index] = overlap;
                cached = true;
                trace!(round = 1, index, %overlap, "cached");
            }
        }
        cached
    }

    /// Returns true if any cache had to be refreshed.
    fn round_two(&mut self, candidates: &[Aabb], cache: &mut [Vec2]) -> bool {
        let mut refreshed = false;
        for (index, obstacle) in candidates.iter().enumerate() {
            if cache[index] == Vec2::ZERO || !self.actor.intersects(obstacle) {
                continue;
            }
            let overlap = self.actor.overlap_amount(obstacle);
            if overlap == cache[index] {
                let push = self.eject(obstacle, Some(cache[index]));
                cache[index] = Vec2::ZERO;
                trace!(round = 2, index, %overlap, %push, "converged");
            } else {
                trace!(round = 2, index, cached = %cache[index], %overlap, "refreshed");
                cache[index] = overlap;
                refreshed = true;
            }
        }
        refreshed
    }

    /// Forces out whatever is still cached, as one merged push.
    fn round_three(&mut self, candidates: &[Aabb], cache: &[Vec2]) {
        let actor = self.actor;
        let mut pushes: Vec<Vec2> = candidates
            .iter()
            .zip(cache)
            .filter(|(obstacle, cached)| **cached != Vec2::ZERO && actor.intersects(obstacle))
            .map(|(obstacle, _)| actor.ejection_vector(obstacle, None))
            .collect();
        if pushes.is_empty() {
            return;
        }

        cancel_opposing(&mut pushes);
        let push = strongest(&pushes);
        self.actor.translate(push);
        self.resolution.record(push, self.epsilon);
        trace!(round = 3, forced = pushes.len(), %push, "forced");
    }

    fn sweep(&mut self, candidates: &[Aabb]) {
        for (index, obstacle) in candidates.iter().enumerate() {
            if self.actor.intersects(obstacle) {
                let push = self.eject(obstacle, None);
                trace!(index, %push, "final sweep");
            }
        }
    }

    fn finish(self, start: &Aabb) -> Resolution {
        Resolution {
            displacement: self.actor.position() - start.position(),
            ..self.resolution
        }
    }
}
