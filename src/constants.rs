// --- File: constants.rs ---
use std::time::Duration;

// --- Window / Host Constants ---
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);
// Quiet period before a burst of resize events is forwarded to the driver.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);
pub const FPS_UPDATE_INTERVAL_SECS: f64 = 0.5;
// Frames queued between the offload worker and the window. Extra frames are dropped.
pub const FRAME_CHANNEL_CAPACITY: usize = 2;
pub const WORKER_THREAD_NAME: &str = "starfield-sim-worker";

// --- Particle Defaults ---
pub const DEFAULT_PARTICLE_COUNT: usize = 40;
pub const DEFAULT_SPEED: f32 = 0.5;
pub const VARIANT_SPEED: f32 = 0.5;
pub const DEFAULT_RADIUS: f32 = 2.0;
pub const VARIANT_RADIUS: f32 = 2.0;
pub const MAX_SPEED: f32 = 1.4;

// --- Force / Link Defaults ---
pub const LINK_RADIUS: f32 = 250.0;
pub const INTERACTION_RADIUS: f32 = 200.0;
// Below this separation no force is applied (distance² guard of 25).
pub const MIN_FORCE_DISTANCE: f32 = 5.0;
pub const FORCE_STRENGTH: f32 = 100.0;
pub const ATTRACTION_STRENGTH: f32 = 0.05;
pub const LINE_WIDTH: f32 = 0.5;

// --- Grid Defaults ---
pub const COLLISION_CELL_SIZE: f32 = 50.0;
pub const ATTRACTION_CELL_SIZE: f32 = 50.0;
pub const CONNECTION_CELL_SIZE: f32 = LINK_RADIUS;
// Connections are drawn on every Nth frame.
pub const CONNECTION_THROTTLE: u32 = 2;

// rgb(143, 143, 143)
pub const PARTICLE_COLOR: [f32; 4] = [143.0 / 255.0, 143.0 / 255.0, 143.0 / 255.0, 1.0];
pub const LINE_COLOR: [f32; 4] = [143.0 / 255.0, 143.0 / 255.0, 143.0 / 255.0, 1.0];

// --- End of File: constants.rs ---
