mod renderer;

use renderer::Renderer;
use starfield::constants::{FPS_UPDATE_INTERVAL_SECS, FRAME_INTERVAL, WINDOW_HEIGHT, WINDOW_WIDTH};
use starfield::host::{ResizeDebouncer, start_host};
use starfield::ParticleConfig;
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// Set to any value to keep the simulation on the event-loop thread.
const INLINE_ENV_VAR: &str = "STARFIELD_INLINE";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ParticleConfig::from_env();
    if let Err(err) = config.validate() {
        log::error!("Invalid particle configuration: {}", err);
        return Err(err.into());
    }

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Starfield")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );
    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;

    let prefer_offload = std::env::var_os(INLINE_ENV_VAR).is_none();
    let mut host = start_host(
        config,
        renderer.size.width,
        renderer.size.height,
        prefer_offload,
    );
    let mode = if host.is_offloaded() {
        "offloaded"
    } else {
        "inline"
    };

    let mut debouncer = ResizeDebouncer::default();
    let mut cursor: Option<(f32, f32)> = None;
    let mut pressed = false;
    let mut next_redraw = Instant::now();
    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| match event {
        Event::AboutToWait => {
            let now = Instant::now();
            if let Some((width, height)) = debouncer.poll(now) {
                log::debug!("Forwarding resize to {}x{}", width, height);
                host.resize(width, height);
            }
            if now >= next_redraw {
                next_redraw = now + FRAME_INTERVAL;
                window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::WaitUntil(next_redraw));
        }
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(physical_size) => {
                renderer.resize(physical_size);
                debouncer.push(renderer.size.width, renderer.size.height, Instant::now());
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                renderer.resize(window.inner_size());
                debouncer.push(renderer.size.width, renderer.size.height, Instant::now());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                cursor = Some((x, y));
                host.pointer(x, y, pressed);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                pressed = state == ElementState::Pressed;
                // Without a known position the field stays off.
                if let Some((x, y)) = cursor {
                    host.pointer(x, y, pressed);
                }
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state == ElementState::Pressed && !key_event.repeat {
                    match key_event.physical_key {
                        PhysicalKey::Code(KeyCode::KeyR) => host.reset(),
                        PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                frames_since_last_fps_update += 1;
                let now = Instant::now();
                let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                    current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                    last_fps_update_time = now;
                    frames_since_last_fps_update = 0;
                }

                let frame = host.frame();
                let body_count = frame.map_or(0, |frame| frame.circles().count());
                match renderer.render(frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("WGPU Error: OutOfMemory");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("WGPU Error: {:?}", e),
                }

                window.set_title(&format!(
                    "Starfield - Bodies: {} - FPS: {:.1} ({})",
                    body_count, current_fps, mode
                ));
            }
            _ => {}
        },
        _ => {}
    })?;
    Ok(())
}
