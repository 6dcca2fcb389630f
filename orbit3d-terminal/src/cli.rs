/// Command-line options for the terminal viewer
use clap::Parser;
use orbit3d_core::{load_model, ImportError, Mesh, RenderSettings, Toggle};
use std::path::Path;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "orbit3d-terminal")]
#[command(
    author,
    version,
    about = "Spin a mesh in the terminal with a flat-shaded software rasterizer"
)]
pub struct Cli {
    /// Built-in model name (cube, tetrahedron) or path to an .obj file
    #[arg(default_value = "cube")]
    pub model: String,

    /// Start with the dolly animation running
    #[arg(long = "move")]
    pub move_enabled: bool,

    /// Start with rotation paused
    #[arg(long)]
    pub no_rotate: bool,

    /// Draw vertices as points
    #[arg(long)]
    pub points: bool,

    /// Draw polygon edges
    #[arg(long)]
    pub edges: bool,

    /// Draw faces turned away from the camera
    #[arg(long)]
    pub backfaces: bool,

    /// Skip filling faces
    #[arg(long)]
    pub no_triangles: bool,
}

impl Cli {
    /// Initial render settings: the defaults with each flag applied on top
    pub fn render_settings(&self) -> RenderSettings {
        let mut settings = RenderSettings::default();
        for (toggle, enabled) in [
            (Toggle::Rotate, !self.no_rotate),
            (Toggle::Move, self.move_enabled),
            (Toggle::Points, self.points),
            (Toggle::Edges, self.edges),
            (Toggle::Backfaces, self.backfaces),
            (Toggle::Triangles, !self.no_triangles),
        ] {
            settings.set(toggle, enabled);
        }
        settings
    }

    /// The requested model first, followed by every built-in not already chosen.
    pub fn models(&self) -> Result<Vec<Arc<Mesh>>, ImportError> {
        let first = resolve_model(&self.model)?;
        let mut models = vec![Arc::new(first)];
        for name in Mesh::BUILTIN_NAMES {
            if models.iter().any(|m| m.name() == *name) {
                continue;
            }
            if let Some(mesh) = Mesh::builtin(name) {
                models.push(Arc::new(mesh));
            }
        }
        Ok(models)
    }
}

/// A built-in model name wins; anything else is treated as a file path.
pub fn resolve_model(name_or_path: &str) -> Result<Mesh, ImportError> {
    match Mesh::builtin(name_or_path) {
        Some(mesh) => Ok(mesh),
        None => load_model(Path::new(name_or_path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit3d_core::LineColor;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["orbit3d-terminal"]).unwrap();
        assert_eq!(cli.model, "cube");
        assert_eq!(cli.render_settings(), RenderSettings::default());
    }

    #[test]
    fn test_flags_map_to_settings() {
        let cli = Cli::try_parse_from([
            "orbit3d-terminal",
            "tetrahedron",
            "--move",
            "--no-rotate",
            "--points",
            "--edges",
            "--backfaces",
            "--no-triangles",
        ])
        .unwrap();
        let settings = cli.render_settings();
        assert!(settings.move_enabled);
        assert!(!settings.rotate_enabled);
        assert!(settings.point_size > 0.0);
        assert_ne!(settings.line_color, LineColor::Transparent);
        assert!(settings.render_backfaces);
        assert!(!settings.render_triangles);
    }

    #[test]
    fn test_model_list_starts_with_request() {
        let cli = Cli::try_parse_from(["orbit3d-terminal", "tetrahedron"]).unwrap();
        let names: Vec<_> = cli
            .models()
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["tetrahedron", "cube"]);
    }

    #[test]
    fn test_resolve_model_from_file() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        writeln!(file, "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        let mesh = resolve_model(file.path().to_str().unwrap()).unwrap();
        assert_eq!(mesh.name(), "tri");
        assert_eq!(mesh.triangles().len(), 1);
    }

    #[test]
    fn test_resolve_model_rejects_unknown() {
        assert!(matches!(
            resolve_model("teapot.stl"),
            Err(ImportError::UnsupportedExtension { .. })
        ));
        assert!(matches!(
            resolve_model("missing.obj"),
            Err(ImportError::Io { .. })
        ));
    }
}
