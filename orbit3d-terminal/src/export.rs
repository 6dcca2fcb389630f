/// OBJ to Rust source conversion used by the `obj2rs` tool
use anyhow::{Context, Result};
use orbit3d_core::{convert_obj, Mesh};
use std::fs;
use std::path::{Path, PathBuf};

/// Render a mesh as `NAME`, `VERTICES` and `FACES` constants that
/// [`Mesh::from_tables`] can load back.
pub fn mesh_to_rust_source(mesh: &Mesh, source_name: &str) -> String {
    let mut lines = vec![
        format!("// Generated by obj2rs from {}", source_name),
        "// Vertices are centered on their bounding box.".to_string(),
        String::new(),
        format!("pub const NAME: &str = {:?};", mesh.name()),
        String::new(),
        "pub const VERTICES: &[[f32; 3]] = &[".to_string(),
    ];
    lines.extend(
        mesh.vertices()
            .iter()
            .map(|v| format!("    [{:?}, {:?}, {:?}],", v.x, v.y, v.z)),
    );
    lines.push("];".to_string());
    lines.push(String::new());

    lines.push("pub const FACES: &[&[usize]] = &[".to_string());
    lines.extend(mesh.faces().iter().map(|face| {
        let indices: Vec<String> = face.iter().map(|i| i.to_string()).collect();
        format!("    &[{}],", indices.join(", "))
    }));
    lines.push("];".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Default output path: the input with an `.rs` extension
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("rs")
}

/// Convert an `.obj` file and write the generated source, returning where it went.
pub fn convert_file(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mesh =
        convert_obj(&text).with_context(|| format!("Failed to convert {}", input.display()))?;

    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    let source_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    fs::write(&output, mesh_to_rust_source(&mesh, &source_name))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        vertices = mesh.vertices().len(),
        faces = mesh.faces().len(),
        "converted model"
    );
    Ok(output)
}
