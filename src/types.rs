use glam::{Mat4, Vec3};

use crate::scene::Lighting;

/// Mesh vertex as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame uniform shared by every draw (group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad0: f32,
    pub light_dir: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub fog_near: f32,
    pub ambient: [f32; 3],
    pub fog_far: f32,
    pub fog_color: [f32; 3],
    pub _pad: f32,
}

impl GlobalsUniform {
    pub fn new(view_proj: Mat4, camera_pos: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            _pad0: 0.0,
            light_dir: [0.0, 1.0, 0.0],
            light_intensity: 1.0,
            light_color: [1.0; 3],
            fog_near: f32::MAX,
            ambient: [0.0; 3],
            fog_far: f32::MAX,
            fog_color: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Fill in light and fog parameters
    pub fn with_lighting(mut self, lighting: &Lighting) -> Self {
        self.light_dir = lighting.light_direction.normalize_or_zero().to_array();
        self.light_intensity = lighting.light_intensity;
        self.light_color = lighting.light_color;
        self.ambient = lighting.ambient;
        self.fog_color = lighting.fog_color;
        self.fog_near = lighting.fog_near;
        self.fog_far = lighting.fog_far;
        self
    }
}

/// Per-object uniform (group 1)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Base color, alpha in w
    pub color: [f32; 4],
    /// Emissive color, w unused
    pub emissive: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, color: [f32; 3], opacity: f32, emissive: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
            emissive: [emissive[0], emissive[1], emissive[2], 0.0],
        }
    }
}
