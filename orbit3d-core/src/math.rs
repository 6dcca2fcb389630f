/// Small vector helpers shared by the shading and culling code
use nalgebra::{Point3, Vector3};

/// Scale a vector to unit length.
///
/// The input must be non-zero: a zero vector yields NaN components.
pub fn normalize(v: Vector3<f32>) -> Vector3<f32> {
    let length = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
    Vector3::new(v.x / length, v.y / length, v.z / length)
}

pub fn dot(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    a.dot(b)
}

/// Normal of the triangle `p1, p2, p3`, built from the edges `p1 - p2` and `p3 - p2`.
///
/// Counter-clockwise winding (seen from the front) gives a normal pointing
/// toward the viewer. Collinear points produce NaN; see [`try_face_normal`].
pub fn face_normal(p1: &Point3<f32>, p2: &Point3<f32>, p3: &Point3<f32>) -> Vector3<f32> {
    normalize(cross_edges(p1, p2, p3))
}

/// Like [`face_normal`], but returns `None` when the points are collinear
/// (zero-length cross product) or not finite.
pub fn try_face_normal(
    p1: &Point3<f32>,
    p2: &Point3<f32>,
    p3: &Point3<f32>,
) -> Option<Vector3<f32>> {
    let cross = cross_edges(p1, p2, p3);
    let length_squared = cross.norm_squared();
    if length_squared == 0.0 || !length_squared.is_finite() {
        return None;
    }
    Some(normalize(cross))
}

fn cross_edges(p1: &Point3<f32>, p2: &Point3<f32>, p3: &Point3<f32>) -> Vector3<f32> {
    let a = p1 - p2;
    let b = p3 - p2;
    a.cross(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let samples = [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(-0.001, 0.002, 0.0005),
            Vector3::new(120.0, -7.5, 33.0),
            Vector3::new(0.0, 0.0, -9.0),
        ];
        for v in samples {
            let n = normalize(v);
            assert!((n.norm() - 1.0).abs() < 1e-5, "{:?} -> {:?}", v, n);
        }
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = normalize(Vector3::zeros());
        assert!(n.x.is_nan());
    }

    #[test]
    fn test_dot() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, -5.0, 6.0);
        assert!((dot(&a, &b) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_normal_translation_invariant() {
        let p1 = Point3::new(0.0, 1.0, 0.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(1.0, 0.0, 0.0);
        let offset = Vector3::new(5.0, -3.0, 12.5);

        let n = face_normal(&p1, &p2, &p3);
        let moved = face_normal(&(p1 + offset), &(p2 + offset), &(p3 + offset));
        assert!((n - moved).norm() < 1e-5);
    }

    #[test]
    fn test_face_normal_flips_with_winding() {
        let p1 = Point3::new(0.2, 1.0, 0.3);
        let p2 = Point3::new(0.0, 0.1, 0.0);
        let p3 = Point3::new(1.0, 0.0, -0.4);

        let n = face_normal(&p1, &p2, &p3);
        let swapped = face_normal(&p3, &p2, &p1);
        assert!((n + swapped).norm() < 1e-5);
    }

    #[test]
    fn test_face_normal_direction() {
        // p1 - p2 = +y, p3 - p2 = +x, so the cross product points along -z
        let n = face_normal(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert!((n - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_try_face_normal_degenerate() {
        let p = Point3::new(0.0, 0.0, 0.0);
        let q = Point3::new(1.0, 1.0, 1.0);
        let r = Point3::new(2.0, 2.0, 2.0);
        assert!(try_face_normal(&p, &q, &r).is_none());
        assert!(try_face_normal(&p, &p, &p).is_none());
        assert!(try_face_normal(&p, &q, &Point3::new(1.0, 0.0, 0.0)).is_some());
    }

    #[test]
    fn test_try_face_normal_small_triangle() {
        let size = 0.0008;
        let n = try_face_normal(
            &Point3::new(0.0, size, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(size, 0.0, 0.0),
        )
        .unwrap();
        assert!((n - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }
}
