//! Batch command - watermark every file matching a pattern
//!
//! The output directory is created on the first successful composite, so a
//! run where every file fails leaves the filesystem untouched.

use crate::BatchArgs;
use anyhow::{Context, Result, bail};
use cornermark_core::RasterImage;
use cornermark_ops::Compositor;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

pub fn run(args: BatchArgs, verbose: u8) -> Result<()> {
    trace!(pattern = %args.input, mark = %args.mark.display(), "batch::run");

    let compositor = args.opts.compositor()?;

    // Find matching files
    let files: Vec<PathBuf> = glob::glob(&args.input)?
        .filter_map(|r| match r {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        bail!("No files match pattern: {}", args.input);
    }

    info!(files = files.len(), pattern = %args.input, "Starting batch processing");

    if verbose > 0 {
        println!("Found {} files matching '{}'", files.len(), args.input);
    }

    let mark = super::load_image(&args.mark)?;

    // One owned base per task; the mark is shared read-only
    let results: Vec<Result<PathBuf>> = files
        .par_iter()
        .map(|input| {
            process_file(
                input,
                &args.output_dir,
                &args.format,
                &compositor,
                &mark,
                &args.opts,
            )
        })
        .collect();

    let mut success = 0;
    let mut failed = 0;
    for r in results {
        match r {
            Ok(output) => {
                success += 1;
                if verbose > 0 {
                    println!("  {}", output.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error: {e:#}");
            }
        }
    }

    info!(success, failed, "Batch processing complete");
    println!("Processed: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} files failed", failed);
    }

    Ok(())
}

fn process_file(
    input: &Path,
    output_dir: &Path,
    format: &str,
    compositor: &Compositor,
    mark: &RasterImage,
    opts: &crate::CompositeOpts,
) -> Result<PathBuf> {
    let output = output_path(input, output_dir, format);
    debug!(input = %input.display(), output = %output.display(), "Processing");

    let base = super::load_image(input)?;
    let result = compositor
        .composite(base, mark, opts.position.index(), opts.transparency)
        .map_err(|e| anyhow::anyhow!("{}: {e}", input.display()))?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create: {}", output_dir.display()))?;
    super::save_image(&output, &result)?;
    Ok(output)
}

fn output_path(input: &Path, output_dir: &Path, format: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.{}", stem, format.trim_start_matches('.')))
}
