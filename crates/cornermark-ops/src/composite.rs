//! Pasting a prepared mark into the base image.
//!
//! The mark must already have the exact size of the target rectangle.
//! Pixels are combined per channel:
//!
//! - mark without alpha: the rectangle is overwritten
//! - mark with alpha α: `result = base·(1−α) + mark·α`
//!
//! When the base carries alpha it is interpolated the same way, with the
//! mark's own alpha as the "mark" value, so an opaque mark always leaves an
//! opaque pixel behind.
//!
//! # Example
//!
//! ```rust
//! use cornermark_core::{PixelLayout, RasterImage, Rect};
//! use cornermark_ops::composite::paste;
//!
//! let mut base = RasterImage::filled(4, 4, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
//! let mark = RasterImage::filled(2, 2, PixelLayout::Rgba, &[200, 100, 0, 255]).unwrap();
//! paste(&mut base, &mark, Rect::new(2, 2, 4, 4)).unwrap();
//! assert_eq!(base.pixel(3, 3), &[200, 100, 0]);
//! assert_eq!(base.pixel(1, 1), &[0, 0, 0]);
//! ```

use crate::{OpsError, OpsResult};
use cornermark_core::{RasterImage, Rect};
use tracing::{debug, trace};

/// Linear interpolation of one 8-bit sample by an 8-bit alpha.
///
/// `alpha == 0` returns `base` and `alpha == 255` returns `mark` exactly.
#[inline]
pub fn lerp_u8(base: u8, mark: u8, alpha: u8) -> u8 {
    match alpha {
        0 => base,
        u8::MAX => mark,
        _ => {
            let a = alpha as f32 / 255.0;
            (base as f32 * (1.0 - a) + mark as f32 * a).round() as u8
        }
    }
}

/// Blends one mark pixel onto one base pixel.
///
/// `dst` is RGB or RGBA; `src` is RGB (treated as opaque) or RGBA.
#[inline]
pub fn blend_pixel(dst: &mut [u8], src: &[u8]) {
    let alpha = src.get(3).copied().unwrap_or(u8::MAX);
    for c in 0..3 {
        dst[c] = lerp_u8(dst[c], src[c], alpha);
    }
    if let Some(dst_alpha) = dst.get_mut(3) {
        *dst_alpha = lerp_u8(*dst_alpha, alpha, alpha);
    }
}

/// Pastes `mark` into `base` at `rect`.
///
/// Pixels outside `rect` are never touched.
///
/// # Errors
///
/// - [`OpsError::SizeMismatch`] if the mark is not exactly `rect`'s size
/// - [`OpsError::Core`] if `rect` does not fit inside the base
pub fn paste(base: &mut RasterImage, mark: &RasterImage, rect: Rect) -> OpsResult<()> {
    trace!(%rect, mark_w = mark.width(), mark_h = mark.height(), "composite::paste");

    if mark.dimensions() != rect.size() {
        return Err(OpsError::SizeMismatch(format!(
            "mark is {}x{}, target rectangle {} is {}x{}",
            mark.width(),
            mark.height(),
            rect,
            rect.width(),
            rect.height()
        )));
    }
    if !rect.fits_within(base.width(), base.height()) {
        return Err(cornermark_core::Error::invalid_region(rect, base.width(), base.height()).into());
    }

    let dst_ch = base.channels();
    let src_ch = mark.channels();
    let overwrite = !mark.has_alpha();
    debug!(overwrite, dst_ch, src_ch, "Pasting mark");

    for row in 0..rect.height() {
        let src_row = mark.row(row);
        let dst_row = base.row_mut(rect.top + row);
        let dst_span =
            &mut dst_row[rect.left as usize * dst_ch..rect.right as usize * dst_ch];

        for (dst, src) in dst_span.chunks_exact_mut(dst_ch).zip(src_row.chunks_exact(src_ch)) {
            if overwrite {
                dst[..3].copy_from_slice(&src[..3]);
                if dst_ch == 4 {
                    dst[3] = u8::MAX;
                }
            } else {
                blend_pixel(dst, src);
            }
        }
    }

    Ok(())
}
