/// Wavefront OBJ importer
///
/// Lines are split on whitespace and dispatched on their keyword; the numeric
/// tokens themselves are parsed with nom so that a malformed number rejects
/// the file instead of leaking NaN into the render pipeline.
use nalgebra::{Point3, Vector2, Vector3};
use nom::{
    character::complete::{char, i64 as signed_index},
    combinator::{all_consuming, map, opt},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::geometry::{fan_triangulate, Mesh, MeshError};

/// Name given to models that carry no `o` or `g` statement
pub const DEFAULT_MODEL_NAME: &str = "custom_model";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjError {
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: invalid face vertex `{token}`")]
    InvalidIndex { line: usize, token: String },

    #[error("line {line}: index {index} points before the start of a list of {len} elements")]
    IndexOutOfRange { line: usize, index: i64, len: usize },

    #[error("line {line}: face has {count} vertices, at least 3 are required")]
    TooFewVertices { line: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported model format {path:?}, expected an .obj file")]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Obj(#[from] ObjError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// One triangle produced by fan-triangulating an `f` statement
#[derive(Debug, Clone, PartialEq)]
pub struct ObjFace {
    pub v: [usize; 3],
    pub vt: Option<[Option<usize>; 3]>,
    pub vn: Option<[Option<usize>; 3]>,
    pub material: Option<String>,
}

/// Everything the importer understands from an OBJ file
#[derive(Debug, Clone, PartialEq)]
pub struct ObjModel {
    pub name: String,
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub faces: Vec<ObjFace>,
    pub mtllib: Option<String>,
    /// Vertex indices of each `f` statement before triangulation
    pub polygons: Vec<Vec<usize>>,
}

impl ObjModel {
    /// Mesh made of the triangulated faces.
    pub fn into_mesh(self) -> Result<Mesh, MeshError> {
        let triangles = self.faces.iter().map(|f| f.v).collect();
        Mesh::from_triangles(self.name, self.vertices, triangles)
    }

    /// Mesh that keeps the authored polygons, so edges follow the authored outlines.
    pub fn into_polygon_mesh(self) -> Result<Mesh, MeshError> {
        Mesh::new(self.name, self.vertices, self.polygons)
    }
}

/// Parse OBJ text.
pub fn parse_obj(input: &str) -> Result<ObjModel, ObjError> {
    let mut model = ObjModel {
        name: DEFAULT_MODEL_NAME.to_string(),
        vertices: Vec::new(),
        normals: Vec::new(),
        uvs: Vec::new(),
        faces: Vec::new(),
        mtllib: None,
        polygons: Vec::new(),
    };
    let mut material: Option<String> = None;
    let mut skipped = 0usize;

    for (line_index, raw) in input.lines().enumerate() {
        let line_no = line_index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                let [x, y, z] = parse_components::<3>(&parts[1..], line_no)?;
                model.vertices.push(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_components::<3>(&parts[1..], line_no)?;
                model.normals.push(Vector3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_components::<2>(&parts[1..], line_no)?;
                model.uvs.push(Vector2::new(u, v));
            }
            "f" => {
                let corners = parts[1..]
                    .iter()
                    .map(|token| resolve_corner(token, line_no, &model))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::TooFewVertices {
                        line: line_no,
                        count: corners.len(),
                    });
                }

                let polygon: Vec<usize> = corners.iter().map(|c| c.v).collect();
                for [a, b, c] in fan_triangulate(&(0..corners.len()).collect::<Vec<_>>()) {
                    let (a, b, c) = (&corners[a], &corners[b], &corners[c]);
                    let vt = [a.vt, b.vt, c.vt];
                    let vn = [a.vn, b.vn, c.vn];
                    model.faces.push(ObjFace {
                        v: [a.v, b.v, c.v],
                        vt: vt.iter().any(Option::is_some).then_some(vt),
                        vn: vn.iter().any(Option::is_some).then_some(vn),
                        material: material.clone(),
                    });
                }
                model.polygons.push(polygon);
            }
            "usemtl" => material = joined(&parts[1..]),
            "mtllib" => model.mtllib = joined(&parts[1..]),
            "o" | "g" => {
                if let Some(name) = parts.get(1) {
                    model.name = name.to_string();
                }
            }
            "s" => {}
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(name = %model.name, skipped, "ignored unsupported OBJ statements");
    }

    tracing::debug!(
        name = %model.name,
        vertices = model.vertices.len(),
        normals = model.normals.len(),
        uvs = model.uvs.len(),
        triangles = model.faces.len(),
        "parsed OBJ"
    );
    Ok(model)
}

/// Parse OBJ text the way the asset converter does: authored polygons are
/// kept and the result is recentered on its bounding-box center.
///
/// The interactive importer ([`parse_obj`] + [`ObjModel::into_mesh`]) does not recenter.
pub fn convert_obj(input: &str) -> Result<Mesh, ImportError> {
    let mesh = parse_obj(input)?.into_polygon_mesh()?;
    Ok(mesh.recentered())
}

/// Reject anything that is not an `.obj` file (extension compared case-insensitively).
pub fn check_extension(path: &Path) -> Result<(), ImportError> {
    let is_obj = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if is_obj {
        Ok(())
    } else {
        Err(ImportError::UnsupportedExtension {
            path: path.to_path_buf(),
        })
    }
}

/// Import model text that was read elsewhere, such as a file picked in a browser.
/// `file_name` goes through the same extension check as [`load_model`].
pub fn import_model(file_name: &str, text: &str) -> Result<Mesh, ImportError> {
    check_extension(Path::new(file_name))?;
    let mesh = parse_obj(text)?.into_mesh()?;
    tracing::info!(
        file = file_name,
        vertices = mesh.vertices().len(),
        triangles = mesh.triangles().len(),
        "imported model"
    );
    Ok(mesh)
}

/// Read and import a model file. Only `.obj` files are accepted.
pub fn load_model(path: &Path) -> Result<Mesh, ImportError> {
    check_extension(path)?;
    let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text)?.into_mesh()?;
    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertices().len(),
        triangles = mesh.triangles().len(),
        "imported model"
    );
    Ok(mesh)
}

struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

fn resolve_corner(token: &str, line: usize, model: &ObjModel) -> Result<Corner, ObjError> {
    let (_, (v, vt, vn)) = face_vertex(token).map_err(|_| ObjError::InvalidIndex {
        line,
        token: token.to_string(),
    })?;
    Ok(Corner {
        v: resolve_index(v, model.vertices.len(), line)?,
        vt: vt
            .map(|i| resolve_index(i, model.uvs.len(), line))
            .transpose()?,
        vn: vn
            .map(|i| resolve_index(i, model.normals.len(), line))
            .transpose()?,
    })
}

/// OBJ indices are 1-based; zero and negative values count back from the end of the list.
fn resolve_index(index: i64, len: usize, line: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 { index - 1 } else { len as i64 + index };
    usize::try_from(resolved).map_err(|_| ObjError::IndexOutOfRange { line, index, len })
}

/// Parse up to `N` numeric components; missing trailing components default to 0.
fn parse_components<const N: usize>(tokens: &[&str], line: usize) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = match number(token) {
            Ok((_, value)) if value.is_finite() => value,
            _ => {
                return Err(ObjError::InvalidNumber {
                    line,
                    token: token.to_string(),
                })
            }
        };
    }
    Ok(out)
}

fn joined(parts: &[&str]) -> Option<String> {
    let text = parts.join(" ");
    (!text.is_empty()).then_some(text)
}

fn number(token: &str) -> IResult<&str, f32> {
    all_consuming(float)(token)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn face_vertex(token: &str) -> IResult<&str, (i64, Option<i64>, Option<i64>)> {
    all_consuming(tuple((
        signed_index,
        map(opt(preceded(char('/'), opt(signed_index))), Option::flatten),
        map(opt(preceded(char('/'), opt(signed_index))), Option::flatten),
    )))(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = parse_obj(&format!("{SQUARE}f 1 2 3 4\n")).unwrap();
        let mesh = model.into_mesh().unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_indices_match_positive() {
        let positive = parse_obj(&format!("{SQUARE}f 1 2 3 4\n")).unwrap();
        let negative = parse_obj(&format!("{SQUARE}f -4 -3 -2 -1\n")).unwrap();
        assert_eq!(positive.faces, negative.faces);
    }

    #[test]
    fn test_slash_forms() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1 2/2 3/3
f 1//1 2//1 3//1
f 1/1/1 2/2/1 3/3/1
";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.faces.len(), 3);
        assert!(model.faces.iter().all(|f| f.v == [0, 1, 2]));

        assert_eq!(model.faces[0].vt, Some([Some(0), Some(1), Some(2)]));
        assert_eq!(model.faces[0].vn, None);
        assert_eq!(model.faces[1].vt, None);
        assert_eq!(model.faces[1].vn, Some([Some(0); 3]));
        assert_eq!(model.faces[2].vn, Some([Some(0); 3]));
    }

    #[test]
    fn test_pentagon_triangulation() {
        let text = "\
v 0 0 0
v 1 0 0
v 2 1 0
v 1 2 0
v 0 1 0
f 1 2 3 4 5
";
        let model = parse_obj(text).unwrap();
        let tris: Vec<_> = model.faces.iter().map(|f| f.v).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
        assert_eq!(model.polygons, vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_names_and_materials() {
        let text = "\
mtllib scene.mtl
o first
g second
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
usemtl Bark Dark
f 1 2 3
";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.name, "second");
        assert_eq!(model.mtllib.as_deref(), Some("scene.mtl"));
        assert_eq!(model.faces[0].material, None);
        assert_eq!(model.faces[1].material.as_deref(), Some("Bark Dark"));
    }

    #[test]
    fn test_default_name_and_ignored_lines() {
        let text = "\
# comment
s off
l 1 2
v 1.5 -2e1 .25

";
        let model = parse_obj(text).unwrap();
        assert_eq!(model.name, DEFAULT_MODEL_NAME);
        assert_eq!(model.vertices, vec![Point3::new(1.5, -20.0, 0.25)]);
        assert!(model.faces.is_empty());
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        let model = parse_obj("v 1 2\nvt 0.5\n").unwrap();
        assert_eq!(model.vertices[0], Point3::new(1.0, 2.0, 0.0));
        assert_eq!(model.uvs[0], Vector2::new(0.5, 0.0));
    }

    #[test]
    fn test_rejects_malformed_number() {
        let err = parse_obj("v 0 0 0\nv 1 abc 0\n").unwrap_err();
        assert_eq!(
            err,
            ObjError::InvalidNumber {
                line: 2,
                token: "abc".to_string()
            }
        );
        assert!(parse_obj("v nan 0 0\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_index() {
        let err = parse_obj(&format!("{SQUARE}f 1 x 3\n")).unwrap_err();
        assert_eq!(
            err,
            ObjError::InvalidIndex {
                line: 5,
                token: "x".to_string()
            }
        );
        assert!(parse_obj(&format!("{SQUARE}f 1/a 2 3\n")).is_err());
    }

    #[test]
    fn test_rejects_index_before_start() {
        let err = parse_obj(&format!("{SQUARE}f -5 1 2\n")).unwrap_err();
        assert_eq!(
            err,
            ObjError::IndexOutOfRange {
                line: 5,
                index: -5,
                len: 4
            }
        );
    }

    #[test]
    fn test_out_of_range_index_rejected_when_building_mesh() {
        let model = parse_obj(&format!("{SQUARE}f 1 2 9\n")).unwrap();
        assert!(matches!(
            model.into_mesh(),
            Err(MeshError::IndexOutOfRange { index: 8, .. })
        ));
    }

    #[test]
    fn test_rejects_short_face() {
        let err = parse_obj(&format!("{SQUARE}f 1 2\n")).unwrap_err();
        assert_eq!(err, ObjError::TooFewVertices { line: 5, count: 2 });
    }

    #[test]
    fn test_convert_recenters_and_keeps_polygons() {
        let text = "\
v 10 10 10
v 12 10 10
v 12 14 10
v 10 14 16
f 1 2 3 4
";
        let mesh = convert_obj(text).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.faces(), &[vec![0, 1, 2, 3]]);
        assert_eq!(mesh.triangles().len(), 2);

        // the interactive importer leaves coordinates alone
        let imported = parse_obj(text).unwrap().into_mesh().unwrap();
        assert_eq!(imported.vertices()[0], Point3::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_load_model_rejects_other_extensions() {
        let err = load_model(Path::new("model.stl")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedExtension { .. }));
        let err = load_model(Path::new("no_extension")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_import_model_checks_file_name() {
        let text = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = import_model("Picked.OBJ", text).unwrap();
        assert_eq!(mesh.name(), "tri");
        assert_eq!(mesh.triangles().len(), 1);

        for name in ["picked.stl", "picked", "obj"] {
            let err = import_model(name, text).unwrap_err();
            assert!(matches!(err, ImportError::UnsupportedExtension { .. }), "{}", name);
        }
    }

    #[test]
    fn test_load_model_missing_file() {
        let err = load_model(Path::new("definitely/not/here.OBJ")).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
