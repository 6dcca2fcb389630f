/// Mesh model: vertex positions plus polygon faces, triangulated once on construction
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Errors raised while assembling a mesh from raw vertex and face tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("face {face} has {len} indices, at least 3 are required")]
    FaceTooShort { face: usize, len: usize },
}

/// A polygon mesh.
///
/// `faces` keeps the authored polygons (used for edge drawing), while
/// `triangles` holds their fan triangulation so the fill path never has to
/// branch on polygon arity.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Point3<f32>>,
    faces: Vec<Vec<usize>>,
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Build a mesh, checking that every face has at least three indices and
    /// that every index addresses an existing vertex.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Point3<f32>>,
        faces: Vec<Vec<usize>>,
    ) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        let mut triangles = Vec::with_capacity(faces.len());

        for (face_index, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::FaceTooShort {
                    face: face_index,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
            triangles.extend(fan_triangulate(face));
        }

        let mesh = Self {
            name: name.into(),
            vertices,
            faces,
            triangles,
        };
        tracing::debug!(
            name = %mesh.name,
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            triangles = mesh.triangles.len(),
            "built mesh"
        );
        Ok(mesh)
    }

    /// Build a mesh whose faces are already triangles.
    pub fn from_triangles(
        name: impl Into<String>,
        vertices: Vec<Point3<f32>>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self, MeshError> {
        let faces = triangles.into_iter().map(|t| t.to_vec()).collect();
        Self::new(name, vertices, faces)
    }

    /// Build a mesh from static vertex and face tables, such as those written by `obj2rs`.
    pub fn from_tables(
        name: &str,
        vertices: &[[f32; 3]],
        faces: &[&[usize]],
    ) -> Result<Self, MeshError> {
        Self::new(
            name,
            vertices.iter().map(|&v| Point3::from(v)).collect(),
            faces.iter().map(|f| f.to_vec()).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Positions of the three corners of a triangle from [`Mesh::triangles`].
    pub fn triangle_points(&self, triangle: &[usize; 3]) -> [Point3<f32>; 3] {
        [
            self.vertices[triangle[0]],
            self.vertices[triangle[1]],
            self.vertices[triangle[2]],
        ]
    }

    /// Outline edges of every face, including the closing edge back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.faces.iter().flat_map(|face| {
            (0..face.len()).map(move |i| (face[i], face[(i + 1) % face.len()]))
        })
    }

    /// Largest z coordinate of any vertex, or 0 for an empty mesh
    pub fn max_z(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.z)
            .fold(None, |acc: Option<f32>, z| Some(acc.map_or(z, |m| m.max(z))))
            .unwrap_or(0.0)
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (
                Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
                Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
            )
        }))
    }

    /// Shift every vertex so the bounding-box center sits on the origin.
    pub fn recentered(mut self) -> Self {
        if let Some((min, max)) = self.bounding_box() {
            let center: Vector3<f32> = (min.coords + max.coords) / 2.0;
            for v in &mut self.vertices {
                *v -= center;
            }
        }
        self
    }

    /// Axis-aligned cube centered on the origin, six quads wound counter-clockwise from outside
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = vec![
            vec![0, 3, 2, 1], // -z
            vec![4, 5, 6, 7], // +z
            vec![0, 4, 7, 3], // -x
            vec![1, 2, 6, 5], // +x
            vec![0, 1, 5, 4], // -y
            vec![3, 7, 6, 2], // +y
        ];
        Self::built_in("cube", vertices, faces)
    }

    /// Regular tetrahedron inscribed in a cube of edge `size`
    pub fn tetrahedron(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Point3::new(h, h, h),
            Point3::new(h, -h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
        ];
        let faces = vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]];
        Self::built_in("tetrahedron", vertices, faces)
    }

    /// Look up a built-in model by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cube" => Some(Self::cube(1.0)),
            "tetrahedron" => Some(Self::tetrahedron(1.0)),
            _ => None,
        }
    }

    /// Names accepted by [`Mesh::builtin`]
    pub const BUILTIN_NAMES: &'static [&'static str] = &["cube", "tetrahedron"];

    fn built_in(name: &str, vertices: Vec<Point3<f32>>, faces: Vec<Vec<usize>>) -> Self {
        let triangles = faces.iter().flat_map(|f| fan_triangulate(f)).collect();
        Self {
            name: name.to_string(),
            vertices,
            faces,
            triangles,
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::cube(1.0)
    }
}

/// Split a polygon into `(0, i, i + 1)` triangles.
pub fn fan_triangulate(face: &[usize]) -> impl Iterator<Item = [usize; 3]> + '_ {
    (1..face.len().saturating_sub(1)).map(move |i| [face[0], face[i], face[i + 1]])
}
