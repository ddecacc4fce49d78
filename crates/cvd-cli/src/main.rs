//! cvd - color-vision-deficiency simulator
//!
//! Renders images and colors the way they appear with protanopia,
//! deuteranopia, tritanopia or achromatopsia.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use cvd_core::Rgba8;
use cvd_vision::VisionCondition;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cvd")]
#[command(author, version, about = "Color-vision-deficiency simulator")]
#[command(long_about = "
Simulates color vision deficiencies on images and single colors.

Conditions: typical, protanopia, deuteranopia, tritanopia, achromatopsia
(short forms: protan, deutan, tritan, achroma).

Examples:
  cvd simulate photo.png -c protanopia -o photo_protan.png
  cvd simulate photo.png --all -o out/            # one file per condition
  cvd simulate logo.png -c tritan --flatten '#ffffff'
  cvd color '#c89664'                           # every condition
  cvd color '#ff0000' -c deutan
  cvd matrices
  cvd batch 'shots/*.png' -o out/ -c achromatopsia
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a condition on an image
    #[command(visible_alias = "s")]
    Simulate(SimulateArgs),

    /// Simulate a single color
    Color(ColorArgs),

    /// Print the RGB/LMS and condition matrices
    Matrices,

    /// Simulate a condition on every image matching a pattern
    Batch(BatchArgs),
}

#[derive(Args)]
struct SimulateArgs {
    /// Input image
    input: PathBuf,

    /// Output image, or output directory with --all
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Condition to simulate
    #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
    condition: Option<VisionCondition>,

    /// Write one image per deficient condition
    #[arg(long)]
    all: bool,

    /// Composite translucent pixels over this color first (e.g. #ffffff)
    #[arg(long, value_name = "COLOR")]
    flatten: Option<Rgba8>,
}

#[derive(Args)]
struct ColorArgs {
    /// Color as #rgb, #rrggbb or #rrggbbaa
    color: Rgba8,

    /// Condition to simulate (default: all)
    #[arg(short, long)]
    condition: Option<VisionCondition>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input glob pattern (e.g. "shots/*.png")
    input: String,

    /// Output directory
    #[arg(short = 'o', long = "output")]
    output_dir: PathBuf,

    /// Condition to simulate
    #[arg(short, long)]
    condition: VisionCondition,

    /// Composite translucent pixels over this color first
    #[arg(long, value_name = "COLOR")]
    flatten: Option<Rgba8>,
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins over the `-v` count. The returned guard flushes the log
/// file on drop and must outlive the command.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("Invalid log file: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args, cli.verbose),
        Commands::Color(args) => commands::color::run(args),
        Commands::Matrices => commands::matrices::run(),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}
