//! Static decoration geometry: the craft mesh, the alien structures, and
//! the light/fog setup. None of this changes after startup.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SceneConfig;
use crate::math::hex_to_linear;
use crate::types::Vertex;

pub const BACKGROUND_HEX: u32 = 0x112233;

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(position.to_array(), normal.to_array()));
        index
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Surface parameters, colors in linear RGB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub opacity: f32,
}

impl Material {
    pub fn solid(hex: u32) -> Self {
        Self {
            color: hex_to_linear(hex),
            emissive: [0.0; 3],
            opacity: 1.0,
        }
    }

    pub fn glowing(hex: u32, emissive_hex: u32, intensity: f32) -> Self {
        Self {
            emissive: hex_to_linear(emissive_hex).map(|c| c * intensity),
            ..Self::solid(hex)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// What an object's model matrix follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Moves with the craft transform
    Craft,
    /// Fixed in world space
    World,
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: Mesh,
    pub material: Material,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    pub light_color: [f32; 3],
    pub light_intensity: f32,
    /// Direction toward the light
    pub light_direction: Vec3,
    pub fog_color: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: hex_to_linear(0x404040),
            light_color: hex_to_linear(0x99aaff),
            light_intensity: 0.5,
            light_direction: Vec3::new(50.0, 50.0, 50.0),
            fog_color: hex_to_linear(BACKGROUND_HEX),
            fog_near: 50.0,
            fog_far: 200.0,
        }
    }
}

pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub terrain_material: Material,
    pub lighting: Lighting,
    pub background: [f32; 3],
}

/// Build the craft and the decoration structures
pub fn build_scene(config: &SceneConfig) -> Scene {
    let mut objects = vec![
        SceneObject {
            name: "hull",
            mesh: cone(3.0, 7.0, 10),
            material: Material::glowing(0x4488cc, 0x00aaff, 0.6),
            anchor: Anchor::Craft,
        },
        SceneObject {
            name: "structures",
            mesh: structures(config.structure_count, config.structure_seed),
            material: Material::solid(0x7744aa),
            anchor: Anchor::World,
        },
        SceneObject {
            name: "ring",
            mesh: torus(4.0, 0.5, 100, 16),
            material: Material::glowing(0x00aaff, 0x00aaff, 0.3).with_opacity(0.6),
            anchor: Anchor::Craft,
        },
    ];
    // Transparent objects draw last
    objects.sort_by_key(|o| o.material.is_transparent());

    log::info!(
        "Scene built: {} objects, {} triangles",
        objects.len(),
        objects.iter().map(|o| o.mesh.triangle_count()).sum::<usize>()
    );

    Scene {
        objects,
        terrain_material: Material::solid(0x336655),
        lighting: Lighting::default(),
        background: hex_to_linear(BACKGROUND_HEX),
    }
}

/// Cone centered on the origin, apex at +Y
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    let half = height / 2.0;
    let apex = Vec3::new(0.0, half, 0.0);
    let base_center = Vec3::new(0.0, -half, 0.0);
    let step = std::f32::consts::TAU / segments as f32;

    for i in 0..segments {
        let (t0, t1) = (i as f32 * step, (i + 1) as f32 * step);
        let rim = |t: f32| Vec3::new(radius * t.cos(), -half, radius * t.sin());
        let side_normal = |t: f32| Vec3::new(t.cos() * height, radius, t.sin() * height).normalize();

        let a = mesh.push(apex, side_normal((t0 + t1) * 0.5));
        let b = mesh.push(rim(t1), side_normal(t1));
        let c = mesh.push(rim(t0), side_normal(t0));
        mesh.indices.extend_from_slice(&[a, b, c]);

        let d = mesh.push(base_center, Vec3::NEG_Y);
        let e = mesh.push(rim(t0), Vec3::NEG_Y);
        let f = mesh.push(rim(t1), Vec3::NEG_Y);
        mesh.indices.extend_from_slice(&[d, e, f]);
    }
    mesh
}

/// Torus lying in the XZ plane around the Y axis
pub fn torus(radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * std::f32::consts::TAU;
        let dir = Vec3::new(u.cos(), 0.0, u.sin());
        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
            let normal = dir * v.cos() + Vec3::Y * v.sin();
            mesh.push(dir * radius + normal * tube, normal);
        }
    }

    let stride = radial_segments + 1;
    for i in 0..tubular_segments {
        for j in 0..radial_segments {
            let a = i * stride + j;
            let b = a + stride;
            let c = a + 1;
            let d = b + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    mesh
}

/// Axis-aligned box with flat-shaded faces
pub fn cuboid(center: Vec3, size: Vec3) -> Mesh {
    let half = size * 0.5;
    // (normal, u, v) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = Mesh::default();
    for (normal, u, v) in faces {
        let face_center = center + normal * half.dot(normal.abs());
        let hu = u * half.dot(u);
        let hv = v * half.dot(v);
        let corners = [-hu - hv, hu - hv, hu + hv, -hu + hv];
        let first = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.push(face_center + corner, normal);
        }
        mesh.indices
            .extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
    }
    mesh
}

/// Pillars scattered over the starting area
pub fn structures(count: usize, seed: u64) -> Mesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mesh = Mesh::default();
    for _ in 0..count {
        let x = rng.gen_range(-50.0..50.0);
        let z = rng.gen_range(-50.0..50.0);
        mesh.append(cuboid(Vec3::new(x, 5.0, z), Vec3::new(2.0, 10.0, 2.0)));
    }
    mesh
}
