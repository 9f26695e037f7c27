use std::collections::HashMap;
use std::sync::Arc;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use super::window::Viewport;
use crate::session::{Host, Listener, ListenerId, Session};

/// Host-side events the session cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent<'a> {
    KeyDown(&'a str),
    KeyUp(&'a str),
    Resize(Viewport),
    FocusLost,
}

impl InputEvent<'_> {
    /// Registration that must be live for this event to be delivered
    pub fn listener(&self) -> Option<Listener> {
        match self {
            InputEvent::KeyDown(_) => Some(Listener::KeyDown),
            InputEvent::KeyUp(_) => Some(Listener::KeyUp),
            InputEvent::Resize(_) => Some(Listener::Resize),
            InputEvent::FocusLost => None,
        }
    }
}

/// Name a key the way browsers report `KeyboardEvent.key`
pub fn key_token(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft"),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight"),
        Key::Named(NamedKey::Escape) => Some("Escape"),
        Key::Character(text) => Some(text.as_str()),
        _ => None,
    }
}

/// Translate a winit window event into an [`InputEvent`]
pub fn translate(event: &WindowEvent) -> Option<InputEvent<'_>> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let token = key_token(&event.logical_key)?;
            Some(match event.state {
                ElementState::Pressed => InputEvent::KeyDown(token),
                ElementState::Released => InputEvent::KeyUp(token),
            })
        }
        WindowEvent::Resized(size) => Some(InputEvent::Resize((*size).into())),
        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
        _ => None,
    }
}

/// Adapter that bridges a winit window to the session [`Host`] contract.
///
/// winit delivers every event to the application handler, so registrations
/// are tracked here and [`WinitHost::dispatch`] only forwards events whose
/// listener is still live.
#[derive(Debug, Default)]
pub struct WinitHost {
    window: Option<Arc<Window>>,
    live: HashMap<ListenerId, Listener>,
    next_id: u64,
}

impl WinitHost {
    pub fn new(window: Option<Arc<Window>>) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    pub fn accepts(&self, listener: Listener) -> bool {
        self.live.values().any(|l| *l == listener)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Forward an event to the session if its listener is registered.
    /// Returns true if the session consumed it.
    pub fn dispatch(&self, session: &mut Session, event: InputEvent<'_>) -> bool {
        if let Some(listener) = event.listener() {
            if !self.accepts(listener) {
                return false;
            }
        }
        match event {
            InputEvent::KeyDown(token) => session.key_down(token),
            InputEvent::KeyUp(token) => session.key_up(token),
            InputEvent::Resize(viewport) => {
                session.resize(viewport);
            }
            InputEvent::FocusLost => session.release_all(),
        }
        true
    }
}

impl Host for WinitHost {
    fn surface_size(&self) -> Option<Viewport> {
        self.window.as_ref().map(|w| w.inner_size().into())
    }

    fn register(&mut self, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.live.insert(id, listener);
        id
    }

    fn unregister(&mut self, id: ListenerId) {
        if self.live.remove(&id).is_none() {
            log::warn!("Unregistering unknown listener {:?}", id);
        }
    }
}
