//! Single-pass resolution by oriented cancellation.
//!
//! Every intersecting obstacle contributes its oriented overlap, a request to
//! move the actor away from that obstacle. If two requests disagree on the
//! sign of an axis (one tile asks for +x, another for -x), moving along that
//! axis would only push the actor into the other tile, so the axis is
//! dropped for both. The largest remaining request per axis wins.
//!
//! With a single obstacle both axes would survive and the actor would drift
//! diagonally, so that case falls back to the single-axis ejection vector.

use glam::Vec2;
use tracing::trace;

use super::{Resolution, ResolverConfig};
use crate::shape::Aabb;

pub(super) fn resolve(actor: &Aabb, candidates: &[Aabb], config: &ResolverConfig) -> Resolution {
    let hits: Vec<&Aabb> = candidates
        .iter()
        .filter(|obstacle| actor.intersects(obstacle))
        .collect();

    let displacement = match hits.as_slice() {
        [] => Vec2::ZERO,
        [single] => actor.ejection_vector(single, None),
        many => {
            let mut pushes: Vec<Vec2> = many
                .iter()
                .map(|obstacle| actor.oriented_overlap(obstacle))
                .collect();
            cancel_opposing(&mut pushes);
            strongest(&pushes)
        }
    };

    trace!(hits = hits.len(), %displacement, "oriented cancellation");

    let mut resolution = Resolution {
        displacement,
        ..Resolution::default()
    };
    resolution.record(displacement, config.block_epsilon);
    resolution
}

/// Zero every component that has an opposite-signed partner on its axis.
///
/// Any positive x paired with any negative x cancels, so an axis with both
/// signs present is cleared entirely.
pub(super) fn cancel_opposing(pushes: &mut [Vec2]) {
    let contested = |component: fn(&Vec2) -> f32| {
        pushes.iter().any(|p| component(p) > 0.0) && pushes.iter().any(|p| component(p) < 0.0)
    };
    let clear_x = contested(|p| p.x);
    let clear_y = contested(|p| p.y);

    for push in pushes.iter_mut() {
        if clear_x {
            push.x = 0.0;
        }
        if clear_y {
            push.y = 0.0;
        }
    }
}

/// Per axis, the component with the largest magnitude (sign kept).
pub(super) fn strongest(pushes: &[Vec2]) -> Vec2 {
    pushes.iter().fold(Vec2::ZERO, |best, push| {
        Vec2::new(
            if push.x.abs() > best.x.abs() { push.x } else { best.x },
            if push.y.abs() > best.y.abs() { push.y } else { best.y },
        )
    })
}
