//! Error types for configuration and the execution host boundary.

use thiserror::Error;

/// Rejected [`ParticleConfig`](crate::config::ParticleConfig) values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive (cell sizes, radii, max speed).
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    /// A range whose lower bound or span is unusable.
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),
    /// The connection grid is too coarse-grained for the link radius to be found by a 3x3 scan.
    #[error("connection cell size {cell_size} is smaller than link radius {link_radius}")]
    CellTooSmall { cell_size: f32, link_radius: f32 },
    #[error("connection throttle must be at least 1")]
    ZeroThrottle,
}

/// Failures at the offload boundary. None of these are fatal to the window.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to spawn simulation worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("simulation worker disconnected")]
    Disconnected,
}
