//! Application entry point for the sail cloth viewer.
//!
//! Parses the command line, loads (or generates) the sail mesh and hands
//! everything else to [`Viewer`] from the `viewer` module.

mod viewer;

use std::path::PathBuf;

use clap::Parser;
use sail_core::Mesh;
use tracing::info;
use viewer::Viewer;

#[derive(Parser)]
#[command(name = "sail-view")]
#[command(about = "Mass-spring sail cloth simulation viewer")]
#[command(version)]
struct Cli {
    /// OBJ-style mesh file (`v` and `f` records). A grid is used if omitted.
    #[arg(short, long)]
    mesh: Option<PathBuf>,
    /// Grid columns for the default sail
    #[arg(long, default_value_t = 16)]
    cols: usize,
    /// Grid rows for the default sail
    #[arg(long, default_value_t = 12)]
    rows: usize,
    /// Grid spacing for the default sail
    #[arg(long, default_value_t = 0.5)]
    spacing: f32,
    /// Anchor vertices whose rest x is at or below this value
    /// (defaults to the mesh's minimum x)
    #[arg(long)]
    anchor_x: Option<f32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mesh = match &cli.mesh {
        Some(path) => Mesh::load(path)?,
        None => Mesh::grid(cli.cols, cli.rows, cli.spacing),
    };
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.faces.len(),
        "mesh ready"
    );

    let app = Viewer::new(mesh, cli.anchor_x)?;
    eframe::run_native(
        "Sail Cloth",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )?;
    Ok(())
}
