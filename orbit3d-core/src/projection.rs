/// Pinhole camera: perspective divide and normalized-device-to-pixel mapping
use nalgebra::Point3;

/// Focal distance of the virtual lens
pub const DEFAULT_FOCAL: f32 = 1.2;
/// Points closer to the camera than this are never projected
pub const NEAR_EPSILON: f32 = 0.01;
/// Logical canvas size in pixels
pub const CANVAS_SIZE: u32 = 800;

/// Camera configuration for 3D rendering.
///
/// The camera sits at the origin looking down +z; the model is pushed in
/// front of it by the dolly distance before projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub focal: f32,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            focal: DEFAULT_FOCAL,
            width,
            height,
        }
    }

    /// Perspective divide. `z` is passed through for depth-based effects.
    ///
    /// No clamping happens here; callers check [`NEAR_EPSILON`] first.
    pub fn project(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::new(
            point.x / point.z * self.focal,
            point.y / point.z * self.focal,
            point.z,
        )
    }

    /// Map normalized device coordinates (`[-1, 1]`, y up) to pixels (y down).
    pub fn to_screen(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::new(
            (point.x + 1.0) / 2.0 * self.width as f32,
            (1.0 - (point.y + 1.0) / 2.0) * self.height as f32,
            point.z,
        )
    }

    /// Project a camera-space point to screen space, or `None` when it is
    /// too close to (or behind) the camera.
    pub fn project_to_screen(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        if point.z < NEAR_EPSILON {
            return None;
        }
        Some(self.to_screen(&self.project(point)))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CANVAS_SIZE, CANVAS_SIZE)
    }
}
