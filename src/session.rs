use thiserror::Error;

use crate::config::SimConfig;
use crate::core::{KeyState, Viewport};
use crate::simulation::{RenderFrame, Simulation};

/// Host event streams a session subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    KeyDown,
    KeyUp,
    Resize,
}

/// Handle returned by [`Host::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The environment a session runs in: a display surface plus event streams
pub trait Host {
    /// Current drawable size, or `None` if no surface is mounted
    fn surface_size(&self) -> Option<Viewport>;

    /// Start delivering `listener` events to the session
    fn register(&mut self, listener: Listener) -> ListenerId;

    /// Stop delivering events for a registration
    fn unregister(&mut self, id: ListenerId);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The host has no display surface to render into
    #[error("display surface is not mounted")]
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    TornDown,
}

/// One interactive flight: owns the simulation and the key table, and the
/// host registrations that feed them.
pub struct Session {
    sim: Simulation,
    keys: KeyState,
    registrations: Vec<(Listener, ListenerId)>,
    state: State,
}

impl Session {
    /// Check the host has a surface, subscribe to its events and build the
    /// simulation. Fails without side effects if there is no surface.
    pub fn start(config: &SimConfig, host: &mut dyn Host) -> Result<Self, SessionError> {
        let viewport = host.surface_size().ok_or(SessionError::SurfaceUnavailable)?;

        let registrations = [Listener::KeyDown, Listener::KeyUp, Listener::Resize]
            .into_iter()
            .map(|listener| (listener, host.register(listener)))
            .collect();

        log::info!("Session started at {}x{}", viewport.width, viewport.height);
        Ok(Self {
            sim: Simulation::new(config, viewport),
            keys: KeyState::new(),
            registrations,
            state: State::Running,
        })
    }

    /// Start a session, then run `setup` against it. If setup fails, the
    /// registrations made by `start` are released before the error returns.
    pub fn start_with<T, E>(
        config: &SimConfig,
        host: &mut dyn Host,
        setup: impl FnOnce(&Session) -> Result<T, E>,
    ) -> Result<(Self, T), E>
    where
        E: From<SessionError>,
    {
        let mut session = Self::start(config, host)?;
        match setup(&session) {
            Ok(value) => Ok((session, value)),
            Err(e) => {
                session.teardown(host);
                Err(e)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn key_down(&mut self, token: &str) {
        if self.is_running() {
            self.keys.press(token);
        }
    }

    pub fn key_up(&mut self, token: &str) {
        if self.is_running() {
            self.keys.release(token);
        }
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys.clear();
    }

    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.is_running() && self.sim.resize(viewport)
    }

    /// Run one simulation step. `None` once the session is torn down.
    pub fn frame(&mut self) -> Option<RenderFrame<'_>> {
        if !self.is_running() {
            return None;
        }
        Some(self.sim.step(&self.keys))
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Listeners still registered with the host
    pub fn active_listeners(&self) -> impl Iterator<Item = Listener> + '_ {
        self.registrations.iter().map(|(listener, _)| *listener)
    }

    /// Release every host registration. Safe to call more than once; only
    /// the first call does anything, and it returns true.
    pub fn teardown(&mut self, host: &mut dyn Host) -> bool {
        if self.state == State::TornDown {
            log::debug!("Session already torn down");
            return false;
        }
        self.state = State::TornDown;
        for (listener, id) in self.registrations.drain(..) {
            log::debug!("Releasing {:?} listener", listener);
            host.unregister(id);
        }
        self.keys.clear();
        log::info!("Session torn down after {} frames", self.sim.frame_number());
        true
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.registrations.is_empty() {
            log::warn!(
                "Session dropped with {} listeners still registered",
                self.registrations.len()
            );
        }
    }
}
