//! Preview command - composite, then shrink to fit a display box

use crate::PreviewArgs;
use crate::commands::{load_image, save_image};
use anyhow::{Context, Result, bail};
use cornermark_core::RasterImage;
use cornermark_ops::Filter;
use cornermark_ops::resize::{fit_dimensions, resize_image};
use tracing::{debug, trace};

pub fn run(args: PreviewArgs, verbose: u8) -> Result<()> {
    trace!(base = %args.base.display(), mark = %args.mark.display(), "preview::run");

    if args.max_width == 0 || args.max_height == 0 {
        bail!("Preview box must be at least 1x1, got {}x{}", args.max_width, args.max_height);
    }

    let compositor = args.opts.compositor()?;
    let base = load_image(&args.base)?;
    let mark = load_image(&args.mark)?;

    let result = compositor
        .composite(base, &mark, args.opts.position.index(), args.opts.transparency)
        .with_context(|| format!("Failed to watermark {}", args.base.display()))?;

    let preview = shrink_to_fit(&result, args.max_width, args.max_height, args.opts.filter)?;
    save_image(&args.output, &preview)?;

    if verbose > 0 {
        println!(
            "Preview {}x{} saved: {}",
            preview.width(),
            preview.height(),
            args.output.display()
        );
    }

    Ok(())
}

/// Scales `image` down to fit `max_w` x `max_h`, keeping aspect. Never enlarges.
fn shrink_to_fit(image: &RasterImage, max_w: u32, max_h: u32, filter: Filter) -> Result<RasterImage> {
    if image.width() <= max_w && image.height() <= max_h {
        return Ok(image.clone());
    }

    let (w, h) = fit_dimensions(
        image.width() as usize,
        image.height() as usize,
        max_w as usize,
        max_h as usize,
    );
    let (w, h) = ((w as u32).min(max_w), (h as u32).min(max_h));
    debug!(w, h, "Preview size");

    resize_image(image, w, h, filter).context("Failed to scale preview")
}
