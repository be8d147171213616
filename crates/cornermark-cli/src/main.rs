//! cornermark - corner watermark compositor CLI
//!
//! Decodes a base and a mark image, composites the mark into one corner of
//! an N×N grid over the base, and encodes the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cornermark_ops::{Compositor, Corner, Filter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cornermark")]
#[command(author, version, about = "Place a watermark in a corner of an image")]
#[command(long_about = "
Scales a watermark to one cell of an N×N grid laid over the base image and
pastes it into one of the four corner cells, optionally faded.

Corners are numbered 1-4 (top-left, top-right, bottom-left, bottom-right)
or named tl, tr, bl, br.

Examples:
  cornermark apply photo.jpg logo.png -o marked.png
  cornermark apply photo.jpg logo.png -o marked.png -p br -t 0.4
  cornermark preview photo.jpg logo.png -o preview.png -p 2
  cornermark grid photo.jpg --squares 10 --json
  cornermark batch -i 'shots/*.jpg' -m logo.png -o out/ -t 0.6
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite a mark onto a base image and save the result
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Composite, then shrink the result to fit a preview box
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// Show the placement grid and corner rectangles for an image
    #[command(visible_alias = "g")]
    Grid(GridArgs),

    /// Apply the same mark to many images in parallel
    Batch(BatchArgs),
}

/// Placement options shared by every compositing command.
#[derive(Args, Debug, Clone)]
struct CompositeOpts {
    /// Corner: 1-4 or tl, tr, bl, br
    #[arg(short, long, default_value = "1")]
    position: Corner,

    /// Mark opacity, 0.0 (invisible) to 1.0 (opaque)
    #[arg(short, long, default_value = "1.0", allow_negative_numbers = true)]
    transparency: f32,

    /// Grid divisor: the mark is scaled to 1/N of each dimension
    #[arg(long, default_value = "8")]
    squares: u32,

    /// Resampling filter: nearest, bilinear, bicubic, lanczos
    #[arg(short, long, default_value = "bicubic")]
    filter: Filter,
}

impl CompositeOpts {
    fn compositor(&self) -> Result<Compositor> {
        let compositor = Compositor::new()
            .with_squares(self.squares)
            .context("Invalid --squares")?
            .with_filter(self.filter);
        Ok(compositor)
    }
}

#[derive(Args)]
struct ApplyArgs {
    /// Base image
    base: PathBuf,

    /// Watermark image
    mark: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    opts: CompositeOpts,
}

#[derive(Args)]
struct PreviewArgs {
    /// Base image
    base: PathBuf,

    /// Watermark image
    mark: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Preview box width
    #[arg(long, default_value = "800")]
    max_width: u32,

    /// Preview box height
    #[arg(long, default_value = "700")]
    max_height: u32,

    #[command(flatten)]
    opts: CompositeOpts,
}

#[derive(Args)]
struct GridArgs {
    /// Input image
    input: PathBuf,

    /// Grid divisor
    #[arg(long, default_value = "8")]
    squares: u32,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Input pattern (glob)
    #[arg(short, long)]
    input: String,

    /// Watermark image
    #[arg(short, long)]
    mark: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Output format extension
    #[arg(long, default_value = "png")]
    format: String,

    #[command(flatten)]
    opts: CompositeOpts,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Preview(args) => commands::preview::run(args, cli.verbose),
        Commands::Grid(args) => commands::grid::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}
