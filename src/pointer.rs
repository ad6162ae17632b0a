// --- File: pointer.rs ---
use crate::body::Body;
use crate::config::ParticleConfig;
use glam::Vec2;

/// Last pointer sample forwarded by the host. Absent until the first event.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub pressed: bool,
}

impl PointerState {
    /// Last value wins.
    pub fn update(&mut self, x: f32, y: f32, pressed: bool) {
        self.position = Some(Vec2::new(x, y));
        self.pressed = pressed;
    }
}

/// Radial inverse-square push away from the pointer, or pull toward it while
/// pressed. Returns the number of bodies affected.
pub fn apply_pointer_field(
    bodies: &mut [Body],
    pointer: &PointerState,
    config: &ParticleConfig,
) -> usize {
    let Some(origin) = pointer.position else {
        return 0;
    };
    let min_dist_sq = config.min_force_distance_sq();
    let max_dist_sq = config.interaction_radius_sq();
    let strength = if pointer.pressed {
        -config.force_strength
    } else {
        config.force_strength
    };

    let mut affected = 0;
    for body in bodies.iter_mut() {
        let away = body.position - origin;
        let dist_sq = away.length_squared();
        if dist_sq < max_dist_sq && dist_sq > min_dist_sq {
            let dist = dist_sq.sqrt();
            body.velocity += away / dist * (strength / dist_sq);
            affected += 1;
        }
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;

    fn resting_at(x: f32, y: f32) -> Vec<Body> {
        vec![Body::new(BodyId(0), Vec2::new(x, y), Vec2::ZERO, 2.0)]
    }

    #[test]
    fn no_pointer_no_force() {
        let mut bodies = resting_at(10.0, 10.0);
        let affected =
            apply_pointer_field(&mut bodies, &PointerState::default(), &ParticleConfig::default());
        assert_eq!(affected, 0);
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn released_pointer_repels() {
        let mut bodies = resting_at(150.0, 100.0);
        let mut pointer = PointerState::default();
        pointer.update(100.0, 100.0, false);

        assert_eq!(
            apply_pointer_field(&mut bodies, &pointer, &ParticleConfig::default()),
            1
        );
        // 100 / 50²
        assert!((bodies[0].velocity.x - 0.04).abs() < 1e-6);
        assert_eq!(bodies[0].velocity.y, 0.0);
    }

    #[test]
    fn pressed_pointer_attracts() {
        let mut bodies = resting_at(100.0, 150.0);
        let mut pointer = PointerState::default();
        pointer.update(100.0, 100.0, true);

        apply_pointer_field(&mut bodies, &pointer, &ParticleConfig::default());
        assert!(bodies[0].velocity.y < 0.0);
        assert_eq!(bodies[0].velocity.x, 0.0);
    }

    #[test]
    fn guard_radii_are_respected() {
        let config = ParticleConfig::default();
        let mut pointer = PointerState::default();
        pointer.update(0.0, 0.0, false);

        let mut too_close = resting_at(3.0, 0.0);
        let mut too_far = resting_at(250.0, 0.0);
        let mut on_top = resting_at(0.0, 0.0);
        assert_eq!(apply_pointer_field(&mut too_close, &pointer, &config), 0);
        assert_eq!(apply_pointer_field(&mut too_far, &pointer, &config), 0);
        assert_eq!(apply_pointer_field(&mut on_top, &pointer, &config), 0);
    }
}
// --- End of File: pointer.rs ---
