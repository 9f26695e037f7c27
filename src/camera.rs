use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::core::Viewport;
use crate::flight::CraftTransform;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    /// Recompute the aspect ratio for a new viewport.
    /// Returns false (and keeps the old aspect) when either side is zero.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        match viewport.aspect_ratio() {
            Some(aspect) => {
                self.aspect = aspect;
                true
            }
            None => false,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Chase camera that trails the craft.
///
/// The desired position is a fixed offset in the craft's local frame. Each
/// update moves a fixed fraction of the remaining distance toward it, so the
/// camera lags and never snaps. The look-at target jumps straight to the craft.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
    offset: Vec3,
    follow_factor: f32,
    projection: Projection,
}

impl FollowCamera {
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        Self {
            position: Vec3::from_array(config.start_position),
            target: Vec3::ZERO,
            offset: Vec3::from_array(config.offset),
            follow_factor: config.follow_factor,
            projection: Projection {
                fov_y: config.fov_degrees.to_radians(),
                aspect: viewport.aspect_ratio().unwrap_or(1.0),
                near: config.near,
                far: config.far,
            },
        }
    }

    /// World-space point the camera is easing toward
    pub fn desired_position(&self, craft: &CraftTransform) -> Vec3 {
        craft.matrix().transform_point3(self.offset)
    }

    pub fn update(&mut self, craft: &CraftTransform) {
        let desired = self.desired_position(craft);
        self.position = self.position.lerp(desired, self.follow_factor);
        self.target = craft.position;
    }

    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.projection.resize(viewport)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn aspect(&self) -> f32 {
        self.projection.aspect
    }

    pub fn follow_factor(&self) -> f32 {
        self.follow_factor
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }
}
