// --- File: collision.rs ---
use crate::body::Body;
use crate::grid::{SpatialGrid, pair_mut};
use glam::Vec2;

// Separation axis used when two centers coincide exactly.
const COINCIDENT_AXIS: Vec2 = Vec2::X;

/// Resolves one pair. Overlapping bodies swap velocities and are pushed apart
/// along the line between their centers until they just touch. Returns
/// whether a collision happened; a non-overlapping pair is left untouched.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    std::mem::swap(&mut a.velocity, &mut b.velocity);

    let dist = dist_sq.sqrt();
    // Coincident centers give no direction; `a` moves toward -x and `b` toward +x.
    let direction = if dist > 0.0 {
        delta / dist
    } else {
        COINCIDENT_AXIS
    };
    let offset = direction * ((min_dist - dist) * 0.5);
    a.position -= offset;
    b.position += offset;
    true
}

/// Collision pass over every body pair sharing a grid neighborhood. Returns
/// the number of collisions resolved.
pub fn resolve_collisions(bodies: &mut [Body], cell_size: f32) -> usize {
    if bodies.len() < 2 {
        return 0;
    }
    let grid = SpatialGrid::build(bodies, cell_size);
    let mut collisions = 0;
    for (i, j) in grid.candidate_pairs() {
        let (a, b) = pair_mut(bodies, i, j);
        if resolve_pair(a, b) {
            collisions += 1;
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;

    const TOLERANCE: f32 = 1e-4;

    fn body(id: u32, position: Vec2, velocity: Vec2, radius: f32) -> Body {
        Body::new(BodyId(id), position, velocity, radius)
    }

    #[test]
    fn head_on_pair_swaps_velocities_and_separates() {
        let mut a = body(0, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 6.0);
        let mut b = body(1, Vec2::new(110.0, 100.0), Vec2::new(-1.0, 0.0), 6.0);

        assert!(resolve_pair(&mut a, &mut b));
        assert_eq!(a.velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(1.0, 0.0));
        assert!((a.position.distance(b.position) - 12.0).abs() < TOLERANCE);
        // Each body moved by half the overlap.
        assert!((a.position.x - 99.0).abs() < TOLERANCE);
        assert!((b.position.x - 111.0).abs() < TOLERANCE);
    }

    #[test]
    fn separated_pair_is_not_mutated() {
        let mut a = body(0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0), 3.0);
        let mut b = body(1, Vec2::new(6.0, 0.0), Vec2::new(-3.0, 0.5), 3.0);
        let (before_a, before_b) = (a.clone(), b.clone());

        assert!(!resolve_pair(&mut a, &mut b));
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn swap_preserves_kinetic_energy() {
        let mut a = body(0, Vec2::new(10.0, 10.0), Vec2::new(0.3, -1.1), 4.0);
        let mut b = body(1, Vec2::new(13.0, 12.0), Vec2::new(-0.7, 0.2), 2.5);
        let energy = |a: &Body, b: &Body| a.velocity.length_squared() + b.velocity.length_squared();
        let before = energy(&a, &b);

        assert!(resolve_pair(&mut a, &mut b));
        assert!((energy(&a, &b) - before).abs() < TOLERANCE);
        assert!((a.position.distance(b.position) - 6.5).abs() < TOLERANCE);
    }

    #[test]
    fn coincident_centers_split_along_x() {
        let mut a = body(0, Vec2::new(50.0, 50.0), Vec2::ZERO, 2.0);
        let mut b = body(1, Vec2::new(50.0, 50.0), Vec2::ZERO, 2.0);

        assert!(resolve_pair(&mut a, &mut b));
        assert!(a.position.is_finite() && b.position.is_finite());
        assert_eq!(a.position, Vec2::new(48.0, 50.0));
        assert_eq!(b.position, Vec2::new(52.0, 50.0));
    }

    #[test]
    fn pass_resolves_neighbors_across_cell_boundary() {
        let mut bodies = vec![
            body(0, Vec2::new(48.0, 10.0), Vec2::new(1.0, 0.0), 2.0),
            body(1, Vec2::new(51.0, 10.0), Vec2::new(-1.0, 0.0), 2.0),
            body(2, Vec2::new(300.0, 300.0), Vec2::new(0.5, 0.5), 2.0),
        ];
        assert_eq!(resolve_collisions(&mut bodies, 50.0), 1);
        assert!((bodies[0].position.distance(bodies[1].position) - 4.0).abs() < TOLERANCE);
        assert_eq!(bodies[2].velocity, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn empty_and_single_body_passes_are_no_ops() {
        assert_eq!(resolve_collisions(&mut [], 50.0), 0);
        let mut one = vec![body(0, Vec2::ONE, Vec2::ONE, 2.0)];
        assert_eq!(resolve_collisions(&mut one, 50.0), 0);
    }
}
// --- End of File: collision.rs ---
