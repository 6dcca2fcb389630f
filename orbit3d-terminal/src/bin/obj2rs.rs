//! obj2rs - bake a Wavefront .obj file into Rust source
//!
//! The generated file holds `NAME`, `VERTICES` and `FACES` constants with the
//! model centered on its bounding box, ready for `Mesh::from_tables`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use orbit3d_terminal::export::convert_file;

#[derive(Parser)]
#[command(name = "obj2rs")]
#[command(
    author,
    version,
    about = "Convert a Wavefront .obj file into Rust vertex and face tables"
)]
struct Args {
    /// Input .obj file
    input: PathBuf,

    /// Output .rs file (default: next to the input with an .rs extension)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    orbit3d_terminal::init_logging();

    let args = Args::parse();
    let output = convert_file(&args.input, args.output.as_deref())?;
    println!("{}", output.display());
    Ok(())
}
