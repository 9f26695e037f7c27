use alien_flight::config::FlightConfig;
use alien_flight::core::{FlightControls, KeyState};
use alien_flight::flight::FlightModel;
use glam::Vec3;

fn controls(keys: &[&str]) -> FlightControls {
    let mut state = KeyState::new();
    for key in keys {
        state.press(key);
    }
    FlightControls::from_controller(&state)
}

/// Velocity after holding one key for `n` frames from rest
fn held_velocity(a: f32, d: f32, n: i32) -> f32 {
    a * d * (1.0 - d.powi(n)) / (1.0 - d)
}

#[cfg(test)]
mod thrust_tests {
    use super::*;

    #[test]
    fn test_fifty_frames_of_forward_thrust() {
        let mut model = FlightModel::new(&FlightConfig::default());
        let forward = controls(&["ArrowUp"]);
        let (a, d) = (model.acceleration(), model.damping());
        assert_eq!((a, d), (0.2, 0.95));
        let mut previous_z = model.craft().position.z;

        for frame in 1..=50 {
            model.update(&forward);
            let craft = model.craft();

            let expected = -held_velocity(a, d, frame);
            assert!(
                (craft.velocity.z - expected).abs() < 1e-4,
                "frame {}: vz {} expected {}",
                frame,
                craft.velocity.z,
                expected
            );
            assert!(craft.position.z < previous_z, "z must decrease every frame");
            previous_z = craft.position.z;
        }

        let craft = model.craft();
        assert_eq!(craft.velocity.x, 0.0);
        assert_eq!(craft.velocity.y, 0.0);
        assert_eq!(craft.position.y, 10.0);
        assert!(craft.velocity.z.abs() < model.speed_bound());
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let mut fwd = FlightModel::new(&FlightConfig::default());
        let mut back = FlightModel::new(&FlightConfig::default());
        for _ in 0..20 {
            fwd.update(&controls(&["ArrowUp"]));
            back.update(&controls(&["ArrowDown"]));
        }
        assert_eq!(fwd.craft().velocity.z, -back.craft().velocity.z);
    }

    #[test]
    fn test_speed_settles_below_bound() {
        let mut model = FlightModel::new(&FlightConfig::default());
        let up = controls(&["w"]);
        for _ in 0..1000 {
            model.update(&up);
            assert!(model.craft().velocity.y <= model.speed_bound());
        }
        let d = model.damping();
        let steady = model.acceleration() * d / (1.0 - d);
        assert!((model.craft().velocity.y - steady).abs() < 1e-3);
    }
}

#[cfg(test)]
mod damping_tests {
    use super::*;

    #[test]
    fn test_velocity_decays_geometrically_after_release() {
        let mut model = FlightModel::new(&FlightConfig::default());
        for _ in 0..10 {
            model.update(&controls(&["ArrowUp"]));
        }
        let released = model.craft().velocity.z;

        let idle = FlightControls::default();
        for k in 1..=20 {
            model.update(&idle);
            let expected = released * model.damping().powi(k);
            assert!((model.craft().velocity.z - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_decay_approaches_zero_but_keeps_sign() {
        let mut model = FlightModel::new(&FlightConfig::default());
        model.update(&controls(&["s"]));
        for _ in 0..200 {
            model.update(&FlightControls::default());
        }
        let vy = model.craft().velocity.y;
        assert!(vy < 0.0);
        assert!(vy.abs() < 1e-4);
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel_exactly() {
        let mut model = FlightModel::new(&FlightConfig::default());
        let both = controls(&["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "w", "s"]);
        for _ in 0..30 {
            model.update(&both);
        }
        let craft = model.craft();
        assert_eq!(craft.velocity, Vec3::ZERO);
        assert_eq!(craft.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(craft.yaw(), 0.0);
    }

    #[test]
    fn test_uppercase_keys_climb_and_descend() {
        let mut model = FlightModel::new(&FlightConfig::default());
        model.update(&controls(&["W"]));
        assert!(model.craft().velocity.y > 0.0);

        let mut model = FlightModel::new(&FlightConfig::default());
        model.update(&controls(&["S"]));
        assert!(model.craft().velocity.y < 0.0);
    }

    #[test]
    fn test_unrecognized_keys_do_nothing() {
        let mut model = FlightModel::new(&FlightConfig::default());
        for _ in 0..10 {
            model.update(&controls(&["q", "Space", "Enter"]));
        }
        assert_eq!(model.craft().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_turning_is_linear_in_frames() {
        let mut model = FlightModel::new(&FlightConfig::default());
        for _ in 0..25 {
            model.update(&controls(&["ArrowRight"]));
        }
        assert!((model.craft().yaw() + 0.5).abs() < 1e-5);
    }
}
