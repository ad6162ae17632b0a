// --- File: driver.rs ---
use crate::config::ParticleConfig;
use crate::host::HostMessage;
use crate::pointer::PointerState;
use crate::simulation::{Simulation, TickStats};
use crate::surface::DrawSurface;

pub enum DriverState<S> {
    Uninitialized,
    Running {
        surface: S,
        simulation: Simulation,
    },
}

/// Runs the simulation on whatever surface the host hands over in `Init`.
/// Owns the pointer state; every other input arrives as a [`HostMessage`].
pub struct Driver<S> {
    config: ParticleConfig,
    pointer: PointerState,
    state: DriverState<S>,
}

impl<S: DrawSurface> Driver<S> {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            pointer: PointerState::default(),
            state: DriverState::Uninitialized,
        }
    }

    pub fn handle(&mut self, message: HostMessage<S>) {
        match message {
            HostMessage::Init {
                mut surface,
                width,
                height,
            } => {
                if self.is_running() {
                    log::warn!("Received a second init; replacing surface and re-seeding bodies");
                }
                surface.resize(width, height);
                let simulation = Simulation::new(self.config.clone(), width, height);
                log::info!(
                    "Simulation running with {} bodies on {}x{}",
                    simulation.bodies().len(),
                    width,
                    height
                );
                self.state = DriverState::Running {
                    surface,
                    simulation,
                };
            }
            HostMessage::Mouse { x, y, pressed } => self.pointer.update(x, y, pressed),
            HostMessage::Resize { width, height } => match &mut self.state {
                DriverState::Running {
                    surface,
                    simulation,
                } => {
                    surface.resize(width, height);
                    simulation.resize(width, height);
                }
                DriverState::Uninitialized => {
                    log::debug!("Ignoring resize to {}x{} before init", width, height);
                }
            },
            HostMessage::Reset => match &mut self.state {
                DriverState::Running { simulation, .. } => simulation.reset(),
                DriverState::Uninitialized => log::debug!("Ignoring reset before init"),
            },
        }
    }

    /// Runs one frame and presents it. `None` until initialized.
    pub fn tick(&mut self) -> Option<TickStats> {
        match &mut self.state {
            DriverState::Running {
                surface,
                simulation,
            } => {
                let stats = simulation.tick(surface, &self.pointer);
                surface.present();
                Some(stats)
            }
            DriverState::Uninitialized => None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            DriverState::Running { surface, .. } => Some(surface),
            DriverState::Uninitialized => None,
        }
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        match &self.state {
            DriverState::Running { simulation, .. } => Some(simulation),
            DriverState::Uninitialized => None,
        }
    }

    #[inline]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;
    use glam::Vec2;

    fn driver(count: usize) -> Driver<DrawList> {
        Driver::new(ParticleConfig {
            particle_count: count,
            seed: Some(1),
            ..Default::default()
        })
    }

    #[test]
    fn ticks_are_no_ops_until_init() {
        let mut driver = driver(5);
        assert!(driver.tick().is_none());
        assert!(driver.surface().is_none());

        driver.handle(HostMessage::Init {
            surface: DrawList::default(),
            width: 400,
            height: 300,
        });
        assert!(driver.is_running());
        assert!(driver.tick().is_some());
        let surface = driver.surface().map(|s| (s.width(), s.height()));
        assert_eq!(surface, Some((400, 300)));
    }

    #[test]
    fn pointer_before_init_is_kept() {
        let mut driver = driver(5);
        driver.handle(HostMessage::Mouse {
            x: 12.0,
            y: 34.0,
            pressed: true,
        });
        assert_eq!(driver.pointer().position, Some(Vec2::new(12.0, 34.0)));
        assert!(driver.pointer().pressed);
    }

    #[test]
    fn resize_before_init_is_ignored() {
        let mut driver = driver(5);
        driver.handle(HostMessage::Resize {
            width: 10,
            height: 10,
        });
        driver.handle(HostMessage::Reset);
        assert!(!driver.is_running());
    }

    #[test]
    fn resize_updates_surface_and_bounds() {
        let mut driver = driver(5);
        driver.handle(HostMessage::Init {
            surface: DrawList::default(),
            width: 400,
            height: 300,
        });
        driver.handle(HostMessage::Resize {
            width: 800,
            height: 600,
        });
        let bounds = driver.simulation().map(Simulation::bounds);
        assert_eq!(bounds, Some(Vec2::new(800.0, 600.0)));
        assert_eq!(driver.surface().map(DrawSurface::width), Some(800));
    }
}
// --- End of File: driver.rs ---
