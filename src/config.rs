// --- File: config.rs ---
use crate::constants::*;
use crate::error::ConfigError;
use std::str::FromStr;

/// Every tunable of the particle field. Passed to the driver at construction.
#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub particle_count: usize,
    // Spawn speed is default_speed + U[0, variant_speed)
    pub default_speed: f32,
    pub variant_speed: f32,
    // Spawn radius is default_radius + U[0, variant_radius)
    pub default_radius: f32,
    pub variant_radius: f32,
    pub max_speed: f32,
    pub link_radius: f32,
    pub interaction_radius: f32,
    pub min_force_distance: f32,
    pub force_strength: f32,
    pub attraction_strength: f32,
    pub collision_cell_size: f32,
    pub attraction_cell_size: f32,
    pub connection_cell_size: f32,
    pub connection_throttle: u32,
    pub particle_color: [f32; 4],
    pub line_color: [f32; 4],
    pub line_width: f32,
    // Max per-channel tint jitter applied at spawn. 0.0 keeps every body the same color.
    pub color_variation: f32,
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            default_speed: DEFAULT_SPEED,
            variant_speed: VARIANT_SPEED,
            default_radius: DEFAULT_RADIUS,
            variant_radius: VARIANT_RADIUS,
            max_speed: MAX_SPEED,
            link_radius: LINK_RADIUS,
            interaction_radius: INTERACTION_RADIUS,
            min_force_distance: MIN_FORCE_DISTANCE,
            force_strength: FORCE_STRENGTH,
            attraction_strength: ATTRACTION_STRENGTH,
            collision_cell_size: COLLISION_CELL_SIZE,
            attraction_cell_size: ATTRACTION_CELL_SIZE,
            connection_cell_size: CONNECTION_CELL_SIZE,
            connection_throttle: CONNECTION_THROTTLE,
            particle_color: PARTICLE_COLOR,
            line_color: LINE_COLOR,
            line_width: LINE_WIDTH,
            color_variation: 0.0,
            seed: None,
        }
    }
}

impl ParticleConfig {
    /// Defaults with optional overrides from `STARFIELD_PARTICLES`, `STARFIELD_SEED`,
    /// `STARFIELD_THROTTLE` and `STARFIELD_COLOR_VARIATION`. Unparsable values are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(count) = parse_override(&lookup, "STARFIELD_PARTICLES") {
            config.particle_count = count;
        }
        if let Some(seed) = parse_override(&lookup, "STARFIELD_SEED") {
            config.seed = Some(seed);
        }
        if let Some(throttle) = parse_override(&lookup, "STARFIELD_THROTTLE") {
            config.connection_throttle = throttle;
        }
        if let Some(variation) = parse_override(&lookup, "STARFIELD_COLOR_VARIATION") {
            config.color_variation = variation;
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            (self.collision_cell_size, "collision_cell_size"),
            (self.attraction_cell_size, "attraction_cell_size"),
            (self.connection_cell_size, "connection_cell_size"),
            (self.max_speed, "max_speed"),
            (self.link_radius, "link_radius"),
            (self.interaction_radius, "interaction_radius"),
        ];
        for (value, name) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }
        if self.default_speed < 0.0 || self.variant_speed < 0.0 {
            return Err(ConfigError::InvalidRange("speed range must be non-negative"));
        }
        if self.default_radius < 0.0 || self.variant_radius < 0.0 {
            return Err(ConfigError::InvalidRange("radius range must be non-negative"));
        }
        if self.min_force_distance < 0.0 || self.min_force_distance >= self.interaction_radius {
            return Err(ConfigError::InvalidRange(
                "min_force_distance must lie in [0, interaction_radius)",
            ));
        }
        if !(self.color_variation >= 0.0) {
            return Err(ConfigError::InvalidRange("color_variation must be non-negative"));
        }
        if self.connection_cell_size < self.link_radius {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.connection_cell_size,
                link_radius: self.link_radius,
            });
        }
        if self.connection_throttle == 0 {
            return Err(ConfigError::ZeroThrottle);
        }
        Ok(())
    }

    #[inline]
    pub fn interaction_radius_sq(&self) -> f32 {
        self.interaction_radius * self.interaction_radius
    }

    #[inline]
    pub fn min_force_distance_sq(&self) -> f32 {
        self.min_force_distance * self.min_force_distance
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

// --- End of File: config.rs ---
