/// Camera state advanced once per tick: model spin and the oscillating dolly
use std::f32::consts::{PI, TAU};

use crate::geometry::Mesh;
use crate::settings::RenderSettings;

/// Closest the dolly travels toward the camera
pub const MIN_DZ: f32 = 0.5;
/// Initial distance as a multiple of the mesh's largest z coordinate
const DISTANCE_FACTOR: f32 = 2.5;
/// Angular speeds in radians per second
const SPIN_X_SPEED: f32 = 0.5 * PI;
const SPIN_Y_SPEED: f32 = 0.05 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollyDirection {
    /// Moving toward the camera (dz shrinking)
    Approach,
    /// Moving away from the camera (dz growing)
    Recede,
}

impl DollyDirection {
    pub fn sign(&self) -> f32 {
        match self {
            DollyDirection::Approach => -1.0,
            DollyDirection::Recede => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub angle_x: f32,
    pub angle_y: f32,
    /// Distance the model is pushed along +z in front of the camera
    pub dz: f32,
    pub direction: DollyDirection,
    pub min_dz: f32,
    pub max_dz: f32,
}

impl CameraState {
    /// Initial state for a freshly loaded mesh.
    pub fn for_mesh(mesh: &Mesh) -> Self {
        Self::with_distance(DISTANCE_FACTOR * mesh.max_z())
    }

    /// State at distance `dz`, clamped to at least [`MIN_DZ`] so flat models
    /// lying in the z = 0 plane still start in front of the camera.
    pub fn with_distance(dz: f32) -> Self {
        let dz = dz.max(MIN_DZ);
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            dz,
            direction: DollyDirection::Recede,
            min_dz: MIN_DZ,
            max_dz: (dz * 2.0).max(2.0),
        }
    }

    /// Re-derive the dolly range for a newly selected mesh, keeping the current spin.
    pub fn retarget(&mut self, mesh: &Mesh) {
        let fresh = Self::for_mesh(mesh);
        self.dz = fresh.dz;
        self.min_dz = fresh.min_dz;
        self.max_dz = fresh.max_dz;
    }

    /// State after `dt` seconds.
    ///
    /// The dolly direction flips once `dz` has crossed a bound, so `dz` can
    /// overshoot a bound by at most one step.
    pub fn advance(self, dt: f32, settings: &RenderSettings) -> Self {
        let mut next = self;

        if settings.move_enabled {
            next.dz += dt * next.direction.sign() * next.max_dz * 0.5;
            if next.dz > next.max_dz {
                next.direction = DollyDirection::Approach;
            }
            if next.dz < next.min_dz {
                next.direction = DollyDirection::Recede;
            }
        }

        if settings.rotate_enabled {
            next.angle_x = (next.angle_x + SPIN_X_SPEED * dt).rem_euclid(TAU);
            next.angle_y = (next.angle_y + SPIN_Y_SPEED * dt).rem_euclid(TAU);
        }

        next
    }

    /// Send the dolly away from the camera on the next tick.
    pub fn recede(&mut self) {
        self.direction = DollyDirection::Recede;
    }

    /// Largest change of `dz` in a single tick of length `dt`
    pub fn dolly_step(&self, dt: f32) -> f32 {
        dt * self.max_dz * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TICK_RATE;

    const DT: f32 = 1.0 / TICK_RATE;

    fn moving() -> RenderSettings {
        RenderSettings {
            rotate_enabled: false,
            move_enabled: true,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_initial_distance_from_mesh() {
        let state = CameraState::for_mesh(&Mesh::cube(2.0));
        assert!((state.dz - 2.5).abs() < 1e-6);
        assert!((state.max_dz - 5.0).abs() < 1e-6);
        assert_eq!(state.min_dz, MIN_DZ);
        assert_eq!(state.direction, DollyDirection::Recede);

        let small = CameraState::for_mesh(&Mesh::cube(0.5));
        assert_eq!(small.max_dz, 2.0);
    }

    #[test]
    fn test_rotation_advances_and_wraps() {
        let settings = RenderSettings::default();
        let mut state = CameraState::with_distance(3.0);
        state.angle_x = TAU - 0.001;
        let next = state.advance(DT, &settings);
        assert!(next.angle_x >= 0.0 && next.angle_x < TAU);
        assert!(next.angle_x < 0.1);
        assert!((next.angle_y - SPIN_Y_SPEED * DT).abs() < 1e-6);
        assert_eq!(next.dz, state.dz);
    }

    #[test]
    fn test_disabled_settings_freeze_state() {
        let settings = RenderSettings {
            rotate_enabled: false,
            ..RenderSettings::default()
        };
        let state = CameraState::with_distance(3.0);
        assert_eq!(state.advance(DT, &settings), state);
    }

    #[test]
    fn test_dolly_oscillates_with_bounded_overshoot() {
        let settings = moving();
        let mut state = CameraState::with_distance(1.0);
        state.dz = state.min_dz;
        let step = state.dolly_step(DT);

        // outward leg: strictly increasing until the flip
        let mut ticks = 0;
        while state.direction == DollyDirection::Recede {
            let next = state.advance(DT, &settings);
            assert!(next.dz > state.dz);
            state = next;
            ticks += 1;
            assert!(ticks < 10_000, "dolly never reached max_dz");
        }
        assert!(state.dz > state.max_dz);
        assert!(state.dz <= state.max_dz + step + 1e-5);

        // inward leg: strictly decreasing until the flip back
        while state.direction == DollyDirection::Approach {
            let next = state.advance(DT, &settings);
            assert!(next.dz < state.dz);
            state = next;
        }
        assert!(state.dz < state.min_dz);
        assert!(state.dz >= state.min_dz - step - 1e-5);
    }

    #[test]
    fn test_recede_and_retarget() {
        let mut state = CameraState::with_distance(3.0);
        state.direction = DollyDirection::Approach;
        state.angle_x = 1.0;
        state.recede();
        assert_eq!(state.direction, DollyDirection::Recede);

        state.retarget(&Mesh::cube(4.0));
        assert!((state.dz - 5.0).abs() < 1e-6);
        assert_eq!(state.angle_x, 1.0);
    }

    #[test]
    fn test_flat_mesh_starts_in_front_of_camera() {
        let flat = Mesh::from_triangles(
            "flat",
            vec![
                nalgebra::Point3::new(0.0, 0.0, 0.0),
                nalgebra::Point3::new(1.0, 0.0, 0.0),
                nalgebra::Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(CameraState::for_mesh(&flat).dz, MIN_DZ);
    }
}
