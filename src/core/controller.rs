use std::collections::HashMap;

/// Key tokens the flight controls respond to. Anything else is ignored.
pub const RECOGNIZED_KEYS: [&str; 8] = [
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "w",
    "W",
    "s",
    "S",
];

/// Returns true if `token` is one of the keys the flight controls read
pub fn is_recognized(token: &str) -> bool {
    RECOGNIZED_KEYS.iter().any(|key| *key == token)
}

/// Controller - answers "is this key held right now"
pub trait Controller {
    /// Check if the key named by `token` is currently held
    fn is_down(&self, token: &str) -> bool;
}

/// Table of held keys, keyed by key token ("ArrowUp", "w", ...)
///
/// Written by the input handlers on press/release, read by the simulation
/// step. A key with no entry is not held.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keys: HashMap<String, bool>,
}

impl KeyState {
    /// Create an empty key table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event
    pub fn press(&mut self, token: &str) {
        self.set(token, true);
    }

    /// Record a key-up event
    pub fn release(&mut self, token: &str) {
        self.set(token, false);
    }

    /// Forget every held key
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Tokens currently held, in no particular order
    pub fn held(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys
            .iter()
            .filter(|(_, down)| **down)
            .map(|(token, _)| token.as_str())
    }

    fn set(&mut self, token: &str, down: bool) {
        if !is_recognized(token) {
            log::trace!("Ignoring unrecognized key {:?}", token);
            return;
        }
        match self.keys.get_mut(token) {
            Some(state) => *state = down,
            None => {
                self.keys.insert(token.to_string(), down);
            }
        }
    }
}

impl Controller for KeyState {
    fn is_down(&self, token: &str) -> bool {
        self.keys.get(token).copied().unwrap_or(false)
    }
}

/// Flight inputs decoded from a key snapshot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlightControls {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub ascend: bool,
    pub descend: bool,
}

impl FlightControls {
    /// Decode the recognized keys from any controller
    pub fn from_controller(controller: &dyn Controller) -> Self {
        Self {
            forward: controller.is_down("ArrowUp"),
            backward: controller.is_down("ArrowDown"),
            turn_left: controller.is_down("ArrowLeft"),
            turn_right: controller.is_down("ArrowRight"),
            ascend: controller.is_down("w") || controller.is_down("W"),
            descend: controller.is_down("s") || controller.is_down("S"),
        }
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// +1 when only forward is held, -1 when only backward, 0 otherwise
    pub const fn thrust(&self) -> f32 {
        Self::to_direction(self.forward, self.backward)
    }

    /// +1 when only ascend is held, -1 when only descend, 0 otherwise
    pub const fn lift(&self) -> f32 {
        Self::to_direction(self.ascend, self.descend)
    }

    /// +1 when only turn-left is held, -1 when only turn-right, 0 otherwise
    pub const fn turn(&self) -> f32 {
        Self::to_direction(self.turn_left, self.turn_right)
    }
}
