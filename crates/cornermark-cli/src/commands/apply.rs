//! Apply command - composite a mark into one corner and save

use crate::ApplyArgs;
use crate::commands::{load_image, save_image};
use anyhow::{Context, Result};
use tracing::{info, trace};

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    trace!(base = %args.base.display(), mark = %args.mark.display(), "apply::run");

    let compositor = args.opts.compositor()?;
    let base = load_image(&args.base)?;
    let mark = load_image(&args.mark)?;

    info!(
        base = %format!("{}x{}", base.width(), base.height()),
        mark = %format!("{}x{}", mark.width(), mark.height()),
        position = %args.opts.position,
        transparency = args.opts.transparency,
        "Compositing"
    );

    let result = compositor
        .composite(base, &mark, args.opts.position.index(), args.opts.transparency)
        .with_context(|| format!("Failed to watermark {}", args.base.display()))?;

    save_image(&args.output, &result)?;

    if verbose > 0 {
        println!("Saved: {}", args.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompositeOpts;
    use cornermark_core::{PixelLayout, RasterImage};
    use cornermark_ops::{Corner, Filter};
    use std::path::Path;
    use tempfile::tempdir;

    fn write_inputs(dir: &Path, base: &RasterImage) -> ApplyArgs {
        let base_path = dir.join("base.png");
        let mark_path = dir.join("mark.png");
        cornermark_io::write(&base_path, base).unwrap();
        let mark = RasterImage::filled(30, 30, PixelLayout::Rgba, &[255, 0, 0, 255]).unwrap();
        cornermark_io::write(&mark_path, &mark).unwrap();

        ApplyArgs {
            base: base_path,
            mark: mark_path,
            output: dir.join("out.png"),
            opts: CompositeOpts {
                position: Corner::BottomRight,
                transparency: 1.0,
                squares: 8,
                filter: Filter::Bicubic,
            },
        }
    }

    #[test]
    fn test_apply_writes_output() {
        let dir = tempdir().unwrap();
        let base = RasterImage::filled(800, 640, PixelLayout::Rgb, &[0, 0, 255]).unwrap();
        let args = write_inputs(dir.path(), &base);
        let output = args.output.clone();

        run(args, 0).unwrap();

        let out = cornermark_io::read(&output).unwrap();
        assert_eq!(out.dimensions(), (800, 640));
        assert_eq!(out.pixel(750, 600), &[255, 0, 0]);
        assert_eq!(out.pixel(699, 600), &[0, 0, 255]);
    }

    #[test]
    fn test_apply_base_too_small_writes_nothing() {
        let dir = tempdir().unwrap();
        let base = RasterImage::filled(7, 300, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
        let args = write_inputs(dir.path(), &base);
        let output = args.output.clone();

        let err = run(args, 0).unwrap_err();
        assert!(format!("{err:#}").contains("too small"));
        assert!(!output.exists());
    }

    #[test]
    fn test_apply_bad_transparency_writes_nothing() {
        let dir = tempdir().unwrap();
        let base = RasterImage::filled(64, 64, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
        let mut args = write_inputs(dir.path(), &base);
        args.opts.transparency = 1.5;
        let output = args.output.clone();

        let err = run(args, 0).unwrap_err();
        assert!(format!("{err:#}").contains("invalid transparency"));
        assert!(!output.exists());
    }

    #[test]
    fn test_apply_missing_base_names_file() {
        let dir = tempdir().unwrap();
        let base = RasterImage::filled(64, 64, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
        let mut args = write_inputs(dir.path(), &base);
        args.base = dir.path().join("missing.png");
        let output = args.output.clone();

        let err = run(args, 0).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
        assert!(!output.exists());
    }
}
