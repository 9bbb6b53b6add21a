mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use profile_svg_core::{Figure, FigureSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "profile-svg")]
#[command(version, about = "Zoom and hover a profile figure in the terminal", long_about = None)]
struct Args {
    /// Figure description (JSON)
    figure: PathBuf,

    /// Write logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Log to a file only; the terminal belongs to the preview.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let data = std::fs::read(&args.figure)
        .with_context(|| format!("reading {}", args.figure.display()))?;
    let source = FigureSource::from_json(&data)?;
    let clock = Instant::now();
    let (figure, commands) = Figure::initialize(source, 0.0)?;
    info!(figure = %figure.id(), rects = figure.rects().len(), "loaded figure");

    renderer::run_preview(figure, &commands, clock)
}
