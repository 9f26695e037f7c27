use glam::{Mat4, Vec3};

use crate::camera::FollowCamera;
use crate::config::SimConfig;
use crate::core::{FlightControls, KeyState, Viewport};
use crate::flight::{CraftTransform, FlightModel};
use crate::noise_field::{build_noise, NoiseField};
use crate::terrain::{TerrainPatch, TerrainView};
use crate::types::GlobalsUniform;

/// Everything the renderer needs for one frame, borrowed from the simulation
#[derive(Clone, Copy)]
pub struct RenderFrame<'a> {
    pub number: u64,
    pub craft: CraftTransform,
    pub terrain: TerrainView<'a>,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub view_projection: Mat4,
}

impl RenderFrame<'_> {
    /// Camera part of the per-frame shader uniform
    pub fn globals(&self) -> GlobalsUniform {
        GlobalsUniform::new(self.view_projection, self.camera_position)
    }
}

/// The simulation core: flight model, terrain patch and chase camera.
///
/// Driven by an external loop that calls [`Simulation::step`] once per
/// displayed frame. Each step runs input, flight, terrain, camera in that
/// order, so terrain and camera always see this frame's craft transform.
pub struct Simulation {
    flight: FlightModel,
    terrain: TerrainPatch,
    camera: FollowCamera,
    noise: Box<dyn NoiseField>,
    frame: u64,
}

impl Simulation {
    pub fn new(config: &SimConfig, viewport: Viewport) -> Self {
        let noise = build_noise(config.noise.kind, config.noise.seed);
        Self::with_noise(config, viewport, noise)
    }

    /// Build with a caller-supplied noise source
    pub fn with_noise(config: &SimConfig, viewport: Viewport, noise: Box<dyn NoiseField>) -> Self {
        let flight = FlightModel::new(&config.flight);
        let mut terrain = TerrainPatch::new(&config.terrain);
        terrain.regenerate(noise.as_ref(), flight.craft().position);

        Self {
            flight,
            terrain,
            camera: FollowCamera::new(&config.camera, viewport),
            noise,
            frame: 0,
        }
    }

    /// Advance one frame from a key snapshot
    pub fn step(&mut self, keys: &KeyState) -> RenderFrame<'_> {
        let controls = FlightControls::from_controller(keys);
        self.flight.update(&controls);

        let craft = *self.flight.craft();
        self.terrain.regenerate(self.noise.as_ref(), craft.position);
        self.camera.update(&craft);

        self.frame += 1;
        if self.frame % 600 == 0 {
            log::debug!(
                "frame {}: craft at {:.1?}, speed {:.3}",
                self.frame,
                craft.position,
                craft.velocity.length()
            );
        }
        self.render_frame()
    }

    /// Borrow the current state without stepping
    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            number: self.frame,
            craft: *self.flight.craft(),
            terrain: self.terrain.view(),
            camera_position: self.camera.position,
            camera_target: self.camera.target,
            view_projection: self.camera.view_projection(),
        }
    }

    /// Apply a new viewport size; returns false if it was degenerate
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let applied = self.camera.resize(viewport);
        if !applied {
            log::debug!("Ignoring degenerate viewport {}x{}", viewport.width, viewport.height);
        }
        applied
    }

    pub fn craft(&self) -> &CraftTransform {
        self.flight.craft()
    }

    pub fn flight(&self) -> &FlightModel {
        &self.flight
    }

    pub fn terrain(&self) -> &TerrainPatch {
        &self.terrain
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn noise(&self) -> &dyn NoiseField {
        self.noise.as_ref()
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }
}
