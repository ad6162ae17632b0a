// --- File: simulation.rs ---
use crate::attraction::apply_attraction;
use crate::body::{Body, BodyId};
use crate::collision::resolve_collisions;
use crate::config::ParticleConfig;
use crate::connections::render_connections;
use crate::pointer::{PointerState, apply_pointer_field};
use crate::surface::DrawSurface;
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub type SimRng = StdRng;

/// Per-tick counters, mostly for logging and tests.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    pub attracted_pairs: usize,
    pub pointer_affected: usize,
    pub collisions: usize,
    // None on frames skipped by the connection throttle.
    pub links: Option<usize>,
}

/// Body arena plus everything a tick needs. Owned by the driver.
pub struct Simulation {
    pub config: ParticleConfig,
    bodies: Vec<Body>,
    bounds: Vec2,
    frame_count: u64,
    next_id: u32,
    rng: SimRng,
}

impl Simulation {
    pub fn new(config: ParticleConfig, width: u32, height: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        let mut simulation = Self {
            config,
            bodies: Vec::new(),
            bounds: Vec2::new(width as f32, height as f32),
            frame_count: 0,
            next_id: 0,
            rng,
        };
        simulation.initialize_bodies();
        simulation
    }

    /// Simulation over a caller-supplied batch of bodies.
    pub fn with_bodies(config: ParticleConfig, width: u32, height: u32, bodies: Vec<Body>) -> Self {
        let next_id = bodies.iter().map(|b| b.id.0 + 1).max().unwrap_or(0);
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        Self {
            config,
            bodies,
            bounds: Vec2::new(width as f32, height as f32),
            frame_count: 0,
            next_id,
            rng,
        }
    }

    fn initialize_bodies(&mut self) {
        self.bodies.clear();
        self.next_id = 0;
        self.bodies.reserve(self.config.particle_count);
        for _ in 0..self.config.particle_count {
            let id = BodyId(self.next_id);
            self.next_id += 1;
            self.bodies
                .push(Body::spawn(id, &mut self.rng, self.bounds, &self.config));
        }
    }

    /// Discards every body and spawns a fresh batch. Ids restart at 0.
    pub fn reset(&mut self) {
        self.initialize_bodies();
        self.frame_count = 0;
        log::info!(
            "Reset simulation with {} bodies on {}x{}",
            self.bodies.len(),
            self.bounds.x,
            self.bounds.y
        );
    }

    /// New bounds only; bodies are clamped into them on their next update.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.bounds = Vec2::new(width as f32, height as f32);
        log::info!("Resized simulation area to {}x{}", width, height);
    }

    /// One frame: attraction, pointer field, clear, integrate and draw,
    /// collisions, then connections on every `connection_throttle`th frame.
    pub fn tick<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pointer: &PointerState,
    ) -> TickStats {
        let config = &self.config;
        let attracted_pairs = apply_attraction(&mut self.bodies, config);
        let pointer_affected = apply_pointer_field(&mut self.bodies, pointer, config);

        surface.clear_rect(0.0, 0.0, self.bounds.x, self.bounds.y);

        for body in self.bodies.iter_mut() {
            body.update(self.bounds, config.max_speed);
            body.draw(surface);
        }

        let collisions = resolve_collisions(&mut self.bodies, config.collision_cell_size);

        let throttle = u64::from(config.connection_throttle.max(1));
        let links = if self.frame_count % throttle == 0 {
            Some(render_connections(surface, &self.bodies, config))
        } else {
            None
        };
        self.frame_count += 1;

        let stats = TickStats {
            attracted_pairs,
            pointer_affected,
            collisions,
            links,
        };
        log::trace!("frame {}: {:?}", self.frame_count, stats);
        stats
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

// --- End of File: simulation.rs ---
