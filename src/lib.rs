//! Decorative particle field: moving, colliding, mutually attracting points
//! linked by translucent lines, reacting to a shared pointer.
//!
//! The [`driver::Driver`] runs the per-frame pipeline over any
//! [`surface::DrawSurface`]. It can be ticked inline from a window's frame
//! callback or moved onto a worker thread through [`host::OffloadHost`].

pub mod attraction;
pub mod body;
pub mod collision;
pub mod config;
pub mod connections;
pub mod constants;
pub mod driver;
pub mod error;
pub mod grid;
pub mod host;
pub mod pointer;
pub mod simulation;
pub mod surface;
pub mod utils;

pub use body::{Body, BodyId};
pub use config::ParticleConfig;
pub use driver::Driver;
pub use host::{Host, HostMessage, start_host};
pub use pointer::PointerState;
pub use simulation::{Simulation, TickStats};
pub use surface::{DrawCommand, DrawList, DrawSurface};
