//! orbit3d terminal viewer
//!
//! Spins a flat-shaded mesh inside the terminal using truecolor half blocks.
//!
//! # Usage
//!
//! ```bash
//! orbit3d-terminal
//! orbit3d-terminal tetrahedron --edges
//! orbit3d-terminal model.obj --move --points
//! ```
//!
//! # Keys
//!
//! - r / m / p / e / b / t: toggle rotate, move, points, edges, backfaces, triangles
//! - Tab: next model
//! - q / Esc: quit

use anyhow::{Context, Result};
use clap::Parser;

use orbit3d_terminal::cli::Cli;
use orbit3d_terminal::TerminalApp;

fn main() -> Result<()> {
    orbit3d_terminal::init_logging();

    let cli = Cli::parse();
    let models = cli
        .models()
        .with_context(|| format!("Failed to load model `{}`", cli.model))?;
    tracing::info!(model = %models[0].name(), "starting terminal viewer");

    let mut app = TerminalApp::new(models, cli.render_settings())
        .context("Failed to query terminal size")?;
    app.run().context("Terminal viewer failed")?;

    Ok(())
}
