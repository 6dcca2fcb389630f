/// Example: tick the viewer without a terminal and print per-frame statistics
///
/// Usage: cargo run --example headless -- [model.obj | cube | tetrahedron] [ticks]

use std::env;
use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use orbit3d_core::projection::CANVAS_SIZE;
use orbit3d_core::{
    tick_dt, tick_interval, ManualScheduler, RenderSettings, Scheduler, Toggle, Viewer,
};
use orbit3d_terminal::cli::resolve_model;
use orbit3d_terminal::Framebuffer;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let model = args.get(1).map(String::as_str).unwrap_or("cube");
    let ticks = match args.get(2) {
        Some(n) => n.parse().context("tick count must be a number")?,
        None => 120,
    };

    let mesh = resolve_model(model).with_context(|| format!("Failed to load {}", model))?;
    println!(
        "Loaded {}: {} vertices, {} faces",
        mesh.name(),
        mesh.vertices().len(),
        mesh.faces().len()
    );

    let mut viewer = Viewer::default();
    viewer.set_mesh(Arc::new(mesh));
    let mut settings = RenderSettings::default();
    settings.set(Toggle::Move, true);
    settings.set(Toggle::Edges, true);

    let mut framebuffer = Framebuffer::new(80, 40, CANVAS_SIZE, CANVAS_SIZE);
    let mut scheduler = ManualScheduler::new(ticks);
    let mut frame = 0;
    scheduler.run(tick_interval(), &mut || {
        let stats = viewer.tick(tick_dt(), &settings, &mut framebuffer);
        if frame % 30 == 0 {
            println!(
                "frame {:4}: dz {:.2}, drawn {}, culled {}, edges {}",
                frame,
                viewer.state().dz,
                stats.triangles_drawn,
                stats.triangles_culled,
                stats.edges_drawn
            );
        }
        frame += 1;
        ControlFlow::Continue(())
    });

    Ok(())
}
