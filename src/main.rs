use std::sync::Arc;
use std::time::Instant;

use alien_flight::cli::Cli;
use alien_flight::config::SimConfig;
use alien_flight::core::{translate, InputEvent, KeyState, Viewport, WinitHost};
use alien_flight::frame::FrameClock;
use alien_flight::renderer::{HudStats, Renderer};
use alien_flight::scene::build_scene;
use alien_flight::session::Session;
use alien_flight::simulation::Simulation;
use anyhow::{anyhow, Result};
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "Alien Ship Simulator";

// === Application ===

struct App {
    cli: Cli,
    config: SimConfig,
    host: WinitHost,
    session: Option<Session>,
    renderer: Option<Renderer>,
    clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, config: SimConfig) -> Self {
        Self {
            cli,
            config,
            host: WinitHost::default(),
            session: None,
            renderer: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn start(&mut self, window: Arc<Window>) -> Result<()> {
        self.host = WinitHost::new(Some(window.clone()));
        let scene = build_scene(&self.config.scene);
        let show_hud = !self.cli.no_ui;

        let (session, renderer) = Session::start_with(&self.config, &mut self.host, |session| {
            let initial = session.simulation().render_frame();
            pollster::block_on(Renderer::new(window, scene, &initial, show_hud))
        })?;

        self.session = Some(session);
        self.renderer = Some(renderer);
        self.clock.reset();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = &mut self.session {
            session.teardown(&mut self.host);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) {
        self.clock.tick();

        let (Some(session), Some(renderer)) = (&mut self.session, &mut self.renderer) else {
            return;
        };
        let Some(frame) = session.frame() else {
            return;
        };

        let stats = HudStats {
            fps: self.clock.fps(),
            frame_time_ms: self.clock.frame_time_ms(),
            altitude: frame.craft.position.y,
            speed: frame.craft.velocity.length(),
        };
        if let Err(e) = renderer.render(&frame, &stats) {
            log::error!("Render error: {:#}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow!("Failed to create window: {}", e));
                return;
            }
        };

        if let Err(e) = self.start(window) {
            self.fail(event_loop, e.context("Failed to start flight session"));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => match translate(&event) {
                Some(InputEvent::KeyDown("Escape")) => self.shutdown(event_loop),
                Some(input) => {
                    if let (InputEvent::Resize(viewport), Some(renderer)) =
                        (input, &mut self.renderer)
                    {
                        renderer.resize(viewport);
                    }
                    if let Some(session) = &mut self.session {
                        self.host.dispatch(session, input);
                    }
                }
                None => {}
            },
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &self.renderer {
            renderer.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &mut self.session {
            session.teardown(&mut self.host);
        }
    }
}

/// Fly forward for a fixed number of frames without a window and report
/// step timings
fn run_headless(config: &SimConfig, frames: u64) -> Result<()> {
    let viewport = Viewport::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT);
    let mut sim = Simulation::new(config, viewport);
    let mut keys = KeyState::new();
    keys.press("ArrowUp");

    let started = Instant::now();
    for _ in 0..frames {
        sim.step(&keys);
    }
    let elapsed = started.elapsed();

    let craft = sim.craft();
    log::info!(
        "Headless run: {} frames in {:.2?} ({:.3} ms/frame)",
        frames,
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64
    );
    log::info!(
        "Craft at {:.2?}, speed {:.3}, terrain offset {:.2?}",
        craft.position,
        craft.velocity.length(),
        sim.terrain().offset()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.sim_config()?;

    if let Some(frames) = cli.headless {
        return run_headless(&config, frames);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    log::info!("Controls: arrow keys fly, W/S climb and descend, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
