use alien_flight::config::{SimConfig, TerrainConfig};
use alien_flight::core::{KeyState, Viewport};
use alien_flight::noise_field::{build_noise, NoiseField, NoiseKind, PerlinField};
use alien_flight::simulation::Simulation;
use alien_flight::terrain::TerrainPatch;
use glam::Vec3;

fn assert_heights_match_noise(patch: &TerrainPatch, noise: &dyn NoiseField, config: &TerrainConfig) {
    for index in 0..patch.vertex_count() {
        let world = patch.world_position(index);
        let expected = (noise.sample(
            world.x as f64 * config.frequency,
            world.z as f64 * config.frequency,
            0.0,
        ) * config.amplitude) as f32;
        assert_eq!(
            patch.height_at(index),
            expected,
            "vertex {} at ({}, {})",
            index,
            world.x,
            world.z
        );
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn test_default_patch_dimensions() {
        let patch = TerrainPatch::new(&TerrainConfig::default());
        assert_eq!(patch.vertex_count(), 129 * 129);
        assert_eq!(patch.triangle_count(), 128 * 128 * 2);
        assert_eq!(patch.size(), 100.0);
    }

    #[test]
    fn test_row_major_grid_spans_patch() {
        let patch = TerrainPatch::new(&TerrainConfig::default());
        assert_eq!(patch.base_xz(patch.index_of(0, 0)), (-50.0, -50.0));
        assert_eq!(patch.base_xz(patch.index_of(0, 128)), (50.0, -50.0));
        assert_eq!(patch.base_xz(patch.index_of(128, 0)), (-50.0, 50.0));
        assert_eq!(patch.base_xz(patch.index_of(64, 64)), (0.0, 0.0));
        assert_eq!(patch.index_of(1, 0), 129);
    }

    #[test]
    fn test_indices_reference_valid_vertices() {
        let patch = TerrainPatch::new(&TerrainConfig::default());
        let count = patch.vertex_count() as u32;
        assert!(patch.view().indices.iter().all(|&i| i < count));
    }
}

#[cfg(test)]
mod sampling_tests {
    use super::*;

    #[test]
    fn test_center_vertex_height_at_origin() {
        let config = TerrainConfig::default();
        let noise = PerlinField::new(0);
        let mut patch = TerrainPatch::new(&config);
        patch.regenerate(&noise, Vec3::ZERO);

        let center = patch.index_of(64, 64);
        let expected = (noise.sample(0.0, 0.0, 0.0) * 10.0) as f32;
        assert_eq!(patch.height_at(center), expected);
    }

    #[test]
    fn test_heights_follow_craft_offset() {
        let config = TerrainConfig::default();
        let noise = PerlinField::new(3);
        let mut patch = TerrainPatch::new(&config);

        let craft = Vec3::new(12.34, 50.0, -87.6);
        patch.regenerate(&noise, craft);

        assert_eq!(patch.offset(), Vec3::new(craft.x, 0.0, craft.z));
        assert_heights_match_noise(&patch, &noise, &config);
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let config = TerrainConfig::default();
        let noise = build_noise(NoiseKind::Perlin, 11);
        let mut a = TerrainPatch::new(&config);
        let mut b = TerrainPatch::new(&config);

        a.regenerate(noise.as_ref(), Vec3::new(5.0, 0.0, 5.0));
        b.regenerate(noise.as_ref(), Vec3::new(-40.0, 0.0, 9.0));
        b.regenerate(noise.as_ref(), Vec3::new(5.0, 0.0, 5.0));

        assert_eq!(a.view().positions, b.view().positions);
        assert_eq!(a.view().normals, b.view().normals);
    }

    #[test]
    fn test_heights_stay_within_amplitude() {
        let config = TerrainConfig::default();
        let noise = build_noise(NoiseKind::Simplex, 1);
        let mut patch = TerrainPatch::new(&config);
        patch.regenerate(noise.as_ref(), Vec3::new(300.0, 0.0, -300.0));

        for index in 0..patch.vertex_count() {
            assert!(patch.height_at(index).abs() <= 15.0);
        }
    }

    #[test]
    fn test_normals_are_unit_and_upward() {
        let config = TerrainConfig::default();
        let noise = PerlinField::new(0);
        let mut patch = TerrainPatch::new(&config);
        patch.regenerate(&noise, Vec3::new(20.0, 0.0, 20.0));

        for index in 0..patch.vertex_count() {
            let n = patch.normal_at(index);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.y > 0.0);
        }
    }
}

#[cfg(test)]
mod streaming_tests {
    use super::*;

    #[test]
    fn test_terrain_matches_noise_every_frame_in_flight() {
        let config = SimConfig::default();
        let noise = build_noise(config.noise.kind, config.noise.seed);
        let mut sim = Simulation::new(&config, Viewport::new(800, 600));

        let mut keys = KeyState::new();
        keys.press("ArrowUp");
        keys.press("ArrowLeft");
        for frame in 0..30 {
            if frame == 15 {
                keys.release("ArrowUp");
                keys.press("w");
            }
            sim.step(&keys);
            let craft = sim.craft().position;
            let terrain = sim.terrain();
            assert_eq!(terrain.offset().x, craft.x);
            assert_eq!(terrain.offset().z, craft.z);
            assert_heights_match_noise(terrain, noise.as_ref(), &config.terrain);
            assert_heights_match_noise(terrain, sim.noise(), &config.terrain);
        }
    }
}
