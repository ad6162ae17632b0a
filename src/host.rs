// --- File: host.rs ---
//! Execution hosts for the driver.
//!
//! The inline host ticks the driver from the window's own frame callback. The
//! offload host moves the driver onto a worker thread that owns an
//! [`OffscreenSurface`]; the window side only posts [`HostMessage`]s and picks
//! up finished frames. Nothing is shared between the two sides except what
//! travels through the channels.

use crate::config::ParticleConfig;
use crate::constants::{FRAME_CHANNEL_CAPACITY, FRAME_INTERVAL, RESIZE_DEBOUNCE, WORKER_THREAD_NAME};
use crate::driver::Driver;
use crate::error::HostError;
use crate::surface::{DrawList, DrawSurface};
use glam::{Vec2, Vec4};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::thread;
use std::time::{Duration, Instant};

/// Messages crossing the host boundary. `Init` transfers ownership of the surface.
#[derive(Debug)]
pub enum HostMessage<S> {
    Init { surface: S, width: u32, height: u32 },
    Mouse { x: f32, y: f32, pressed: bool },
    Resize { width: u32, height: u32 },
    Reset,
}

// --- Offscreen Surface ---

/// Drawing surface owned by the worker. Each presented frame is handed to the
/// window side; if the window is behind, the frame is dropped.
pub struct OffscreenSurface {
    frame: DrawList,
    frames: SyncSender<DrawList>,
    closed: bool,
}

impl OffscreenSurface {
    pub fn new(width: u32, height: u32, frames: SyncSender<DrawList>) -> Self {
        Self {
            frame: DrawList::new(width, height),
            frames,
            closed: false,
        }
    }

    /// The receiving side has gone away.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DrawSurface for OffscreenSurface {
    fn width(&self) -> u32 {
        self.frame.width()
    }

    fn height(&self) -> u32 {
        self.frame.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.frame.resize(width, height);
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.frame.clear_rect(x, y, width, height);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.frame.fill_circle(center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.frame.stroke_line(from, to, width, color);
    }

    fn present(&mut self) {
        if self.closed {
            return;
        }
        match self.frames.try_send(self.frame.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Frame receiver dropped; offscreen surface stops presenting");
                self.closed = true;
            }
        }
    }
}

// --- Frame Pacing ---

/// Fixed-interval scheduler for the worker loop.
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    /// Sleeps until the next frame is due. A late frame resets the schedule
    /// instead of trying to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
            self.next += self.interval;
        } else {
            self.next = now + self.interval;
        }
    }
}

// --- Offload Host ---

pub struct OffloadHost {
    tx: Option<Sender<HostMessage<OffscreenSurface>>>,
    frames: Receiver<DrawList>,
    latest: Option<DrawList>,
    handle: Option<thread::JoinHandle<()>>,
}

impl OffloadHost {
    /// Spawns the worker and transfers a fresh offscreen surface to it.
    pub fn spawn(config: ParticleConfig, width: u32, height: u32) -> Result<Self, HostError> {
        let (tx, rx) = mpsc::channel::<HostMessage<OffscreenSurface>>();
        let (frame_tx, frame_rx) = mpsc::sync_channel::<DrawList>(FRAME_CHANNEL_CAPACITY);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || run_worker(Driver::new(config), rx, FRAME_INTERVAL))?;

        let surface = OffscreenSurface::new(width, height, frame_tx);
        tx.send(HostMessage::Init {
            surface,
            width,
            height,
        })
        .map_err(|_| HostError::Disconnected)?;

        Ok(Self {
            tx: Some(tx),
            frames: frame_rx,
            latest: None,
            handle: Some(handle),
        })
    }

    /// Fire-and-forget. A worker that already stopped simply misses the message.
    pub fn post(&self, message: HostMessage<OffscreenSurface>) {
        if let Some(tx) = &self.tx {
            if tx.send(message).is_err() {
                log::debug!("Simulation worker is gone; dropping message");
            }
        }
    }

    /// Newest frame the worker has presented so far.
    pub fn latest_frame(&mut self) -> Option<&DrawList> {
        while let Ok(frame) = self.frames.try_recv() {
            self.latest = Some(frame);
        }
        self.latest.as_ref()
    }
}

impl Drop for OffloadHost {
    fn drop(&mut self) {
        // Closing the channel is the worker's shutdown signal.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Simulation worker panicked");
            }
        }
    }
}

/// Worker loop: block until `Init`, then tick once per `interval`, applying
/// every queued message before each tick. Exits when the sender side is
/// dropped or the frame receiver goes away.
pub fn run_worker(
    mut driver: Driver<OffscreenSurface>,
    rx: Receiver<HostMessage<OffscreenSurface>>,
    interval: Duration,
) {
    while !driver.is_running() {
        match rx.recv() {
            Ok(message) => driver.handle(message),
            Err(_) => return,
        }
    }

    let mut clock = FrameClock::new(interval);
    loop {
        loop {
            match rx.try_recv() {
                Ok(message) => driver.handle(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("Host closed the channel; stopping simulation worker");
                    return;
                }
            }
        }

        driver.tick();
        if driver.surface().is_some_and(OffscreenSurface::is_closed) {
            return;
        }
        clock.wait();
    }
}

// --- Inline Host ---

pub struct InlineHost {
    driver: Driver<DrawList>,
}

impl InlineHost {
    pub fn new(config: ParticleConfig, width: u32, height: u32) -> Self {
        let mut driver = Driver::new(config);
        driver.handle(HostMessage::Init {
            surface: DrawList::new(width, height),
            width,
            height,
        });
        Self { driver }
    }

    pub fn post(&mut self, message: HostMessage<DrawList>) {
        self.driver.handle(message);
    }

    /// Runs one tick and returns the frame it drew.
    pub fn next_frame(&mut self) -> Option<&DrawList> {
        self.driver.tick();
        self.driver.surface()
    }
}

// --- Host Selection ---

pub enum Host {
    Inline(InlineHost),
    Offload(OffloadHost),
}

impl Host {
    pub fn pointer(&mut self, x: f32, y: f32, pressed: bool) {
        match self {
            Host::Inline(host) => host.post(HostMessage::Mouse { x, y, pressed }),
            Host::Offload(host) => host.post(HostMessage::Mouse { x, y, pressed }),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        match self {
            Host::Inline(host) => host.post(HostMessage::Resize { width, height }),
            Host::Offload(host) => host.post(HostMessage::Resize { width, height }),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Host::Inline(host) => host.post(HostMessage::Reset),
            Host::Offload(host) => host.post(HostMessage::Reset),
        }
    }

    /// Frame to show now. Inline hosts simulate one step here; offload hosts
    /// return whatever the worker last presented.
    pub fn frame(&mut self) -> Option<&DrawList> {
        match self {
            Host::Inline(host) => host.next_frame(),
            Host::Offload(host) => host.latest_frame(),
        }
    }

    #[inline]
    pub fn is_offloaded(&self) -> bool {
        matches!(self, Host::Offload(_))
    }
}

/// Picks the offload host when asked for and available, otherwise runs inline.
pub fn start_host(config: ParticleConfig, width: u32, height: u32, prefer_offload: bool) -> Host {
    if prefer_offload {
        match OffloadHost::spawn(config.clone(), width, height) {
            Ok(host) => {
                log::info!("Particle simulation offloaded to worker thread");
                return Host::Offload(host);
            }
            Err(err) => log::warn!("{}; running simulation inline", err),
        }
    }
    Host::Inline(InlineHost::new(config, width, height))
}

// --- Resize Debounce ---

/// Collapses a burst of resize events into the last one, released after a
/// quiet period.
#[derive(Debug)]
pub struct ResizeDebouncer {
    quiet: Duration,
    pending: Option<(u32, u32)>,
    last_event: Option<Instant>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_event: None,
        }
    }

    pub fn push(&mut self, width: u32, height: u32, now: Instant) {
        self.pending = Some((width, height));
        self.last_event = Some(now);
    }

    pub fn poll(&mut self, now: Instant) -> Option<(u32, u32)> {
        let last = self.last_event?;
        if now.duration_since(last) < self.quiet {
            return None;
        }
        self.last_event = None;
        self.pending.take()
    }
}

// --- End of File: host.rs ---
