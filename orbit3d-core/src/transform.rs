/// Per-vertex model transforms: the two-axis spin and the camera dolly
use nalgebra::{Point3, Rotation3, Vector3};

/// Transform builder for the model spin and dolly
pub struct Transform;

impl Transform {
    /// Rotate in the YZ plane (about the x axis).
    pub fn rotate_yz(point: &Point3<f32>, angle: f32) -> Point3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * point
    }

    /// Rotate in the XZ plane: `x' = x cos - z sin`, `z' = x sin + z cos`.
    pub fn rotate_xz(point: &Point3<f32>, angle: f32) -> Point3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), -angle) * point
    }

    /// `rotate_xz(rotate_yz(p, angle_y), angle_x)`
    pub fn rotate_both(point: &Point3<f32>, angle_x: f32, angle_y: f32) -> Point3<f32> {
        Self::rotate_xz(&Self::rotate_yz(point, angle_y), angle_x)
    }

    /// The same composition as [`Transform::rotate_both`] as a single rotation,
    /// so a frame can build it once and apply it to every vertex.
    pub fn rotation_matrix(angle_x: f32, angle_y: f32) -> Rotation3<f32> {
        let xz = Rotation3::from_axis_angle(&Vector3::y_axis(), -angle_x);
        let yz = Rotation3::from_axis_angle(&Vector3::x_axis(), angle_y);
        xz * yz
    }

    /// Push a point along z by the camera distance
    pub fn translate_z(point: &Point3<f32>, dz: f32) -> Point3<f32> {
        Point3::new(point.x, point.y, point.z + dz)
    }
}
