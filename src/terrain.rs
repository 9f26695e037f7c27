use glam::Vec3;

use crate::config::TerrainConfig;
use crate::noise_field::NoiseField;

/// Square height-field patch that follows the craft.
///
/// The grid has `(subdivisions + 1)^2` vertices laid out row-major, rows
/// running along +Z and columns along +X. Vertex positions are stored in the
/// patch's local frame: the horizontal coordinates never change, only the
/// heights. `offset` moves the whole patch under the craft, so
/// `local + offset` is the world position used when sampling noise.
pub struct TerrainPatch {
    size: f32,
    subdivisions: u32,
    frequency: f64,
    amplitude: f64,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    offset: Vec3,
}

/// Read-only borrow of the patch buffers handed to the renderer
#[derive(Clone, Copy)]
pub struct TerrainView<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub indices: &'a [u32],
    pub offset: Vec3,
}

impl TerrainPatch {
    pub fn new(config: &TerrainConfig) -> Self {
        let size = config.size;
        let n = config.subdivisions;
        let stride = (n + 1) as usize;

        let mut positions = Vec::with_capacity(stride * stride);
        for row in 0..=n {
            for col in 0..=n {
                positions.push([
                    Self::base_coordinate(col, n, size),
                    0.0,
                    Self::base_coordinate(row, n, size),
                ]);
            }
        }

        let mut patch = Self {
            size,
            subdivisions: n,
            frequency: config.frequency,
            amplitude: config.amplitude,
            normals: vec![[0.0, 1.0, 0.0]; positions.len()],
            positions,
            indices: Self::build_indices(n),
            offset: Vec3::ZERO,
        };
        patch.recompute_normals();

        log::debug!(
            "Terrain patch: {} vertices, {} triangles, {} world units",
            patch.vertex_count(),
            patch.triangle_count(),
            size
        );
        patch
    }

    /// Horizontal coordinate of grid line `i` out of `n`, centered on zero
    fn base_coordinate(i: u32, n: u32, size: f32) -> f32 {
        (i as f32 / n as f32) * size - size / 2.0
    }

    /// Two counter-clockwise (seen from +Y) triangles per cell
    fn build_indices(n: u32) -> Vec<u32> {
        let stride = n + 1;
        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for row in 0..n {
            for col in 0..n {
                let a = row * stride + col;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }
        indices
    }

    /// Resample every height around `craft_position`, rebuild the normals and
    /// move the patch under the craft.
    pub fn regenerate(&mut self, noise: &dyn NoiseField, craft_position: Vec3) {
        let (offset_x, offset_z) = (craft_position.x, craft_position.z);

        for vertex in &mut self.positions {
            let x = vertex[0] + offset_x;
            let z = vertex[2] + offset_z;
            let height = noise.sample(x as f64 * self.frequency, z as f64 * self.frequency, 0.0)
                * self.amplitude;
            vertex[1] = height as f32;
        }

        self.recompute_normals();
        self.offset = Vec3::new(offset_x, 0.0, offset_z);
    }

    /// Smooth normals: area-weighted sum of the adjacent face normals
    fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let a = Vec3::from_array(self.positions[ia]);
            let b = Vec3::from_array(self.positions[ib]);
            let c = Vec3::from_array(self.positions[ic]);
            let face = (b - a).cross(c - a);
            accum[ia] += face;
            accum[ib] += face;
            accum[ic] += face;
        }

        for (normal, sum) in self.normals.iter_mut().zip(accum) {
            *normal = sum.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }

    pub fn view(&self) -> TerrainView<'_> {
        TerrainView {
            positions: &self.positions,
            normals: &self.normals,
            indices: &self.indices,
            offset: self.offset,
        }
    }

    /// Row-major index of the vertex at (`row`, `col`)
    pub fn index_of(&self, row: u32, col: u32) -> usize {
        (row * (self.subdivisions + 1) + col) as usize
    }

    /// Local horizontal coordinate of a vertex, as (x, z)
    pub fn base_xz(&self, index: usize) -> (f32, f32) {
        let p = self.positions[index];
        (p[0], p[2])
    }

    pub fn height_at(&self, index: usize) -> f32 {
        self.positions[index][1]
    }

    pub fn normal_at(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.normals[index])
    }

    pub fn world_position(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.positions[index]) + self.offset
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
