/// wire3d terminal viewer - drag a wireframe cube (or STL model) to rotate it
///
/// Controls:
///   - Left mouse drag: Rotate (horizontal about Y, vertical about X)
///   - WASD / Arrow Keys: Rotate in fixed steps
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::path::PathBuf;
use wire3d_core::{stl, Color, Mesh, OrientedMesh, RenderConfig, Style, Wireframe};
use wire3d_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "wire3d-terminal", version, about = "Rotate a wireframe mesh in the terminal")]
struct Cli {
    /// STL file to show instead of the default cube
    #[arg(long)]
    stl: Option<PathBuf>,

    /// Canvas pixels per model unit (defaults to fitting the terminal)
    #[arg(long)]
    scale: Option<f64>,

    /// Point marker radius in canvas pixels
    #[arg(long, default_value_t = 0.6)]
    radius: f64,

    /// Degrees of rotation per canvas pixel dragged
    #[arg(long, default_value_t = 1.0)]
    sensitivity: f64,

    /// Keep the original coordinates and accumulate a single orientation
    #[arg(long)]
    drift_free: bool,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::Builder::from_default_env().init(),
    }
    Ok(())
}

fn load_mesh(path: Option<&PathBuf>) -> Result<Mesh> {
    let Some(path) = path else {
        return Ok(Mesh::cube(2.0));
    };
    let mut mesh = stl::load_stl(path)
        .with_context(|| format!("failed to load STL file {}", path.display()))?;
    mesh.recenter();
    info!(
        "loaded {}: {} points, {} segments",
        path.display(),
        mesh.points().len(),
        mesh.segments().len()
    );
    Ok(mesh)
}

fn run<W: Wireframe>(model: W, config: RenderConfig) -> Result<()> {
    let mut app = TerminalApp::new(model, config)?;
    app.run()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mesh = load_mesh(cli.stl.as_ref())?;

    let scale = match cli.scale {
        Some(scale) => scale,
        None => {
            // Fit the model's bounding sphere into the smaller canvas dimension
            let (cols, rows) = crossterm::terminal::size()?;
            let span = (cols as f64).min(rows as f64 * wire3d_terminal::CELL_ASPECT);
            0.4 * span / mesh.radius().max(f64::EPSILON)
        }
    };

    let config = RenderConfig::default()
        .with_pixels_per_unit(scale)
        .with_point_radius(cli.radius)
        .with_degrees_per_pixel(cli.sensitivity)
        .with_edge_style(Style::new(Color::rgb(0xc0, 0xc0, 0xc0)))
        .with_point_style(Style::new(Color::rgb(0xff, 0x60, 0x40)));

    if cli.drift_free {
        run(OrientedMesh::new(mesh), config)
    } else {
        run(mesh, config)
    }
}
