// --- File: attraction.rs ---
use crate::body::Body;
use crate::config::ParticleConfig;
use crate::grid::{SpatialGrid, pair_mut};

/// Inverse-square pull between two bodies, applied straight to velocity as a
/// once-per-frame impulse (no time integration). Equal and opposite. Pairs
/// closer than `min_dist_sq` or farther than `max_dist_sq` are skipped.
pub fn attract_pair(
    a: &mut Body,
    b: &mut Body,
    strength: f32,
    min_dist_sq: f32,
    max_dist_sq: f32,
) -> bool {
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    if !(dist_sq < max_dist_sq && dist_sq > min_dist_sq) {
        return false;
    }
    let dist = dist_sq.sqrt();
    let impulse = delta / dist * (strength / dist_sq);
    a.velocity += impulse;
    b.velocity -= impulse;
    true
}

/// Attraction pass over grid neighbors. Returns the number of pairs pulled.
pub fn apply_attraction(bodies: &mut [Body], config: &ParticleConfig) -> usize {
    if bodies.len() < 2 {
        return 0;
    }
    let min_dist_sq = config.min_force_distance_sq();
    let max_dist_sq = config.interaction_radius_sq();
    let grid = SpatialGrid::build(bodies, config.attraction_cell_size);

    let mut applied = 0;
    for (i, j) in grid.candidate_pairs() {
        let (a, b) = pair_mut(bodies, i, j);
        if attract_pair(a, b, config.attraction_strength, min_dist_sq, max_dist_sq) {
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;
    use glam::Vec2;

    fn resting(id: u32, x: f32, y: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), Vec2::ZERO, 2.0)
    }

    #[test]
    fn bodies_accelerate_toward_each_other() {
        let mut a = resting(0, 100.0, 100.0);
        let mut b = resting(1, 120.0, 100.0);

        assert!(attract_pair(&mut a, &mut b, 0.05, 25.0, 40_000.0));
        assert!(a.velocity.x > 0.0);
        assert!(b.velocity.x < 0.0);
        assert_eq!(a.velocity + b.velocity, Vec2::ZERO);
        // strength / distance² = 0.05 / 400
        assert!((a.velocity.x - 0.05 / 400.0).abs() < 1e-9);
    }

    #[test]
    fn guard_skips_near_and_far_pairs() {
        let mut a = resting(0, 100.0, 100.0);
        let mut near = resting(1, 103.0, 100.0);
        assert!(!attract_pair(&mut a, &mut near, 0.05, 25.0, 40_000.0));

        let mut far = resting(2, 400.0, 100.0);
        assert!(!attract_pair(&mut a, &mut far, 0.05, 25.0, 40_000.0));

        let mut coincident = resting(3, 100.0, 100.0);
        assert!(!attract_pair(&mut a, &mut coincident, 0.05, 0.0, 40_000.0));
        assert_eq!(a.velocity, Vec2::ZERO);
    }

    #[test]
    fn pass_uses_attraction_grid() {
        let config = ParticleConfig::default();
        let mut bodies = vec![
            resting(0, 10.0, 10.0),
            resting(1, 40.0, 10.0),
            // Within interaction radius but outside the 3x3 neighborhood of 50px cells.
            resting(2, 190.0, 10.0),
        ];
        assert_eq!(apply_attraction(&mut bodies, &config), 1);
        assert!(bodies[0].velocity.x > 0.0);
        assert!(bodies[1].velocity.x < 0.0);
        assert_eq!(bodies[2].velocity, Vec2::ZERO);
    }
}
// --- End of File: attraction.rs ---
