use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::FlightConfig;
use crate::core::FlightControls;

/// Craft pose and motion.
///
/// `rotation` holds Euler angles applied in XYZ order: x is pitch, y is yaw,
/// z is roll. Yaw is driven directly by the turn keys; pitch and roll are
/// cosmetic and derived from velocity every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Vec3,
}

impl CraftTransform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-world matrix (rotation then translation)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }
}

/// Arcade damped-velocity flight model.
///
/// Every step adds a fixed increment per held key, decays the whole velocity
/// by `damping`, then integrates position with a unit time step. Holding one
/// key settles at `acceleration * damping / (1 - damping)`.
#[derive(Debug, Clone)]
pub struct FlightModel {
    acceleration: f32,
    turn_rate: f32,
    damping: f32,
    roll_factor: f32,
    pitch_factor: f32,
    craft: CraftTransform,
}

impl FlightModel {
    pub fn new(config: &FlightConfig) -> Self {
        Self {
            acceleration: config.acceleration,
            turn_rate: config.turn_rate,
            damping: config.damping,
            roll_factor: config.roll_factor,
            pitch_factor: config.pitch_factor,
            craft: CraftTransform::at(Vec3::from_array(config.start_position)),
        }
    }

    pub fn craft(&self) -> &CraftTransform {
        &self.craft
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Advance one frame
    pub fn update(&mut self, controls: &FlightControls) {
        let craft = &mut self.craft;

        // Forward is -Z. Yaw does not steer the thrust axis.
        craft.velocity.z -= controls.thrust() * self.acceleration;
        craft.velocity.y += controls.lift() * self.acceleration;
        craft.rotation.y += controls.turn() * self.turn_rate;

        craft.velocity *= self.damping;
        craft.position += craft.velocity;

        craft.rotation.z = craft.velocity.x * self.roll_factor;
        craft.rotation.x = craft.velocity.z * self.pitch_factor;
    }

    /// Upper bound on per-axis speed for a single held key
    pub fn speed_bound(&self) -> f32 {
        self.acceleration / (1.0 - self.damping)
    }
}
