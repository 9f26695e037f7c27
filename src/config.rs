// config.rs - Tunable simulation parameters, loadable from JSON
use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseKind;

/// Craft handling. All rates are per frame; there is no delta-time scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Velocity added per frame while a thrust or lift key is held
    pub acceleration: f32,
    /// Yaw change in radians per frame while a turn key is held
    pub turn_rate: f32,
    /// Per-frame multiplicative velocity decay, in [0, 1)
    pub damping: f32,
    /// Roll angle per unit of lateral velocity
    pub roll_factor: f32,
    /// Pitch angle per unit of forward velocity
    pub pitch_factor: f32,
    pub start_position: [f32; 3],
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.2,
            turn_rate: 0.02,
            damping: 0.95,
            roll_factor: 0.5,
            pitch_factor: 0.2,
            start_position: [0.0, 10.0, 0.0],
        }
    }
}

/// Largest accepted grid resolution. Keeps vertex and index counts well
/// inside `u32`.
pub const MAX_SUBDIVISIONS: u32 = 1024;

/// Height-field patch that follows the craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World-space side length of the square patch
    pub size: f32,
    /// Cells per side; the grid has (subdivisions + 1)^2 vertices
    pub subdivisions: u32,
    /// Scale applied to world coordinates before sampling noise
    pub frequency: f64,
    /// Scale applied to the noise sample to get a height
    pub amplitude: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            subdivisions: 128,
            frequency: 0.05,
            amplitude: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Follow offset in the craft's local frame (behind and above)
    pub offset: [f32; 3],
    /// Fraction of the remaining distance covered each frame, in (0, 1]
    pub follow_factor: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 5.0, 20.0],
            follow_factor: 0.1,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            start_position: [0.0, 10.0, 30.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub kind: NoiseKind,
    pub seed: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Perlin,
            seed: 0,
        }
    }
}

/// Decoration placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub structure_count: usize,
    pub structure_seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            structure_count: 10,
            structure_seed: 0x5eed,
        }
    }
}

/// Full configuration. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub flight: FlightConfig,
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub noise: NoiseConfig,
    pub scene: SceneConfig,
}

impl SimConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let flight = &self.flight;
        ensure!(
            (0.0..1.0).contains(&flight.damping),
            "flight.damping must be in [0, 1), got {}",
            flight.damping
        );
        ensure!(
            [flight.acceleration, flight.turn_rate, flight.roll_factor, flight.pitch_factor]
                .iter()
                .all(|v| v.is_finite()),
            "flight rates must be finite"
        );
        ensure!(
            Vec3::from_array(flight.start_position).is_finite(),
            "flight.start_position must be finite"
        );

        let terrain = &self.terrain;
        ensure!(
            (1..=MAX_SUBDIVISIONS).contains(&terrain.subdivisions),
            "terrain.subdivisions must be in 1..={}, got {}",
            MAX_SUBDIVISIONS,
            terrain.subdivisions
        );
        ensure!(
            terrain.size.is_finite() && terrain.size > 0.0,
            "terrain.size must be positive, got {}",
            terrain.size
        );
        ensure!(
            terrain.frequency.is_finite() && terrain.amplitude.is_finite(),
            "terrain frequency and amplitude must be finite"
        );

        let camera = &self.camera;
        ensure!(
            camera.follow_factor > 0.0 && camera.follow_factor <= 1.0,
            "camera.follow_factor must be in (0, 1], got {}",
            camera.follow_factor
        );
        ensure!(
            camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            "camera.fov_degrees must be in (0, 180), got {}",
            camera.fov_degrees
        );
        ensure!(
            camera.near > 0.0 && camera.far > camera.near,
            "camera clip planes must satisfy 0 < near < far"
        );
        ensure!(
            Vec3::from_array(camera.offset).is_finite()
                && Vec3::from_array(camera.start_position).is_finite(),
            "camera vectors must be finite"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = SimConfig::default();
        assert_eq!(config.flight.acceleration, 0.2);
        assert_eq!(config.flight.damping, 0.95);
        assert_eq!(config.terrain.subdivisions, 128);
        assert_eq!(config.terrain.size, 100.0);
        assert_eq!(config.camera.offset, [0.0, 5.0, 20.0]);
        assert_eq!(config.camera.follow_factor, 0.1);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig::default();
        let text = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(SimConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "flight": { "damping": 0.9 }, "noise": { "kind": "simplex" } }"#)
            .unwrap();
        assert_eq!(config.flight.damping, 0.9);
        assert_eq!(config.flight.acceleration, 0.2);
        assert_eq!(config.noise.kind, NoiseKind::Simplex);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_rejects_damping_at_one() {
        let err = SimConfig::from_json(r#"{ "flight": { "damping": 1.0 } }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("damping"));
    }

    #[test]
    fn test_rejects_zero_subdivisions() {
        let mut config = SimConfig::default();
        config.terrain.subdivisions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_subdivisions() {
        let err = SimConfig::from_json(r#"{ "terrain": { "subdivisions": 4294967295 } }"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("subdivisions"));

        let mut config = SimConfig::default();
        config.terrain.subdivisions = MAX_SUBDIVISIONS + 1;
        assert!(config.validate().is_err());
        config.terrain.subdivisions = MAX_SUBDIVISIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_follow_factor() {
        let mut config = SimConfig::default();
        config.camera.follow_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SimConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{}", err).contains("here.json"));
    }
}
