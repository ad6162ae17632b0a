// --- File: body.rs ---
use crate::config::ParticleConfig;
use crate::surface::DrawSurface;
use crate::utils::mutate_color;
use glam::{Vec2, Vec4};
use rand::Rng;
use std::f32::consts::TAU;

/// Small integer identity, assigned at creation and never reused within a run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32, // Draw size and collision radius
    pub color: Vec4,
}

impl Body {
    pub fn new(id: BodyId, position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            id,
            position,
            velocity,
            radius,
            color: Vec4::ONE,
        }
    }

    /// Random position inside `bounds`, random heading, speed and radius from the config ranges.
    pub fn spawn<R: Rng + ?Sized>(
        id: BodyId,
        rng: &mut R,
        bounds: Vec2,
        config: &ParticleConfig,
    ) -> Self {
        let position = Vec2::new(random_up_to(rng, bounds.x), random_up_to(rng, bounds.y));
        let speed = config.default_speed + random_up_to(rng, config.variant_speed);
        let angle = rng.gen_range(0.0..TAU);
        let radius = config.default_radius + random_up_to(rng, config.variant_radius);
        let color = mutate_color(
            Vec4::from(config.particle_color),
            rng,
            config.color_variation,
        );

        Self {
            id,
            position,
            velocity: Vec2::from_angle(angle) * speed,
            radius,
            color,
        }
    }

    /// One integration step: move, bounce off the walls of `bounds`, clamp
    /// back inside, then cap the speed at `max_speed`.
    pub fn update(&mut self, bounds: Vec2, max_speed: f32) {
        self.position += self.velocity;

        if self.position.x >= bounds.x || self.position.x <= 0.0 {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y >= bounds.y || self.position.y <= 0.0 {
            self.velocity.y = -self.velocity.y;
        }
        self.position = self.position.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO));

        let speed_sq = self.velocity.length_squared();
        if speed_sq > max_speed * max_speed {
            self.velocity *= max_speed / speed_sq.sqrt();
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position, self.radius, self.color);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

// gen_range panics on an empty range, so a zero span yields 0.
fn random_up_to<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    if span > 0.0 {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn speed_is_clamped_without_turning() {
        let mut body = Body::new(BodyId(0), Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0), 2.0);
        body.update(BOUNDS, 2.0);

        assert!((body.speed() - 2.0).abs() < 1e-5);
        assert!(body.velocity.x > 0.0);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn bounces_off_right_wall_and_stays_inside() {
        let mut body = Body::new(BodyId(0), Vec2::new(799.0, 300.0), Vec2::new(1.0, 0.5), 2.0);
        body.update(BOUNDS, 2.0);

        assert_eq!(body.position.x, 800.0);
        assert_eq!(body.velocity.x, -1.0);
        assert_eq!(body.velocity.y, 0.5);
    }

    #[test]
    fn overshoot_is_clamped_on_both_axes() {
        let mut body = Body::new(BodyId(0), Vec2::new(1.0, 599.0), Vec2::new(-1.3, 1.3), 2.0);
        body.update(BOUNDS, 2.0);

        assert_eq!(body.position, Vec2::new(0.0, 600.0));
        assert!(body.velocity.x > 0.0);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn spawn_respects_config_ranges() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..200 {
            let body = Body::spawn(BodyId(i), &mut rng, BOUNDS, &config);
            assert!(body.position.x >= 0.0 && body.position.x < BOUNDS.x);
            assert!(body.position.y >= 0.0 && body.position.y < BOUNDS.y);
            assert!(body.radius >= config.default_radius);
            assert!(body.radius < config.default_radius + config.variant_radius);
            let speed = body.speed();
            assert!(speed >= config.default_speed - 1e-5);
            assert!(speed < config.default_speed + config.variant_speed + 1e-5);
        }
    }

    #[test]
    fn spawn_handles_empty_surface() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let body = Body::spawn(BodyId(0), &mut rng, Vec2::ZERO, &config);
        assert_eq!(body.position, Vec2::ZERO);
    }

    #[test]
    fn color_variation_tints_each_body() {
        let config = ParticleConfig {
            color_variation: 0.1,
            ..Default::default()
        };
        let base = Vec4::from(config.particle_color);
        let mut rng = StdRng::seed_from_u64(8);
        let colors: Vec<Vec4> = (0..10)
            .map(|id| Body::spawn(BodyId(id), &mut rng, BOUNDS, &config).color)
            .collect();

        assert!(colors.iter().any(|c| *c != base));
        for c in &colors {
            assert!((c.truncate() - base.truncate()).abs().max_element() <= 0.1 + 1e-6);
            assert_eq!(c.w, base.w);
        }
    }

    #[test]
    fn draw_emits_one_circle() {
        let body = Body::new(BodyId(4), Vec2::new(3.0, 4.0), Vec2::ZERO, 2.5);
        let mut list = DrawList::new(10, 10);
        body.draw(&mut list);

        let circles: Vec<_> = list.circles().collect();
        assert_eq!(circles, vec![(Vec2::new(3.0, 4.0), 2.5, Vec4::ONE)]);
    }
}
// --- End of File: body.rs ---
