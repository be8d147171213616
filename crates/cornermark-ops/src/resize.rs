//! Mark resampling.
//!
//! The mark is stretched to exactly one grid cell, so aspect ratio is never
//! preserved here. Resampling is separable: a horizontal pass followed by a
//! vertical pass, each driven by a precomputed table of filter weights.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation (smooth but blurry)
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic (default)
//! - [`Filter::Lanczos3`] - Sinc-based, sharpest when downscaling
//!
//! # Example
//!
//! ```rust
//! use cornermark_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.5f32; 16 * 16 * 4];
//! let dst = resize_f32(&src, 16, 16, 4, 100, 80, Filter::Bicubic).unwrap();
//! assert_eq!(dst.len(), 100 * 80 * 4);
//! ```

use crate::alpha::{premultiply_inplace, unpremultiply_inplace};
use crate::{OpsError, OpsResult};
use cornermark_core::RasterImage;
use std::str::FromStr;
use tracing::{debug, trace};

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    Bilinear,
    /// Bicubic interpolation (sharper than bilinear).
    #[default]
    Bicubic,
    /// Lanczos-3 (high quality, best for downscaling).
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => nearest_weight(x),
            Filter::Bilinear => bilinear_weight(x),
            Filter::Bicubic => bicubic_weight(x),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Bicubic => "bicubic",
            Filter::Lanczos3 => "lanczos3",
        }
    }
}

impl FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" | "box" => Ok(Filter::Nearest),
            "bilinear" | "linear" => Ok(Filter::Bilinear),
            "bicubic" | "cubic" | "mitchell" => Ok(Filter::Bicubic),
            "lanczos" | "lanczos3" => Ok(Filter::Lanczos3),
            other => Err(OpsError::InvalidDimensions(format!(
                "unknown filter '{other}' (expected nearest, bilinear, bicubic, lanczos3)"
            ))),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Nearest-neighbor weight function.
#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

/// Bilinear (triangle) weight function.
#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Bicubic (Mitchell-Netravali) weight function.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    // Mitchell-Netravali with B=1/3, C=1/3
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

/// Lanczos weight function.
#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized filter taps for one destination sample.
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Builds the tap table mapping `dst_len` samples onto `src_len` samples.
fn build_taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let first = ((center - support).floor().max(0.0)) as usize;
            let last = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (first..=last)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();

            if sum.abs() > 1e-8 {
                for w in &mut weights {
                    *w /= sum;
                }
                Taps { start: first, weights }
            } else {
                // Kernel fell exactly between samples; take the nearest one.
                let nearest = (center.round().max(0.0) as usize).min(src_len - 1);
                Taps { start: nearest, weights: vec![1.0] }
            }
        })
        .collect()
}

/// Resizes interleaved f32 samples.
///
/// # Arguments
///
/// * `src` - Source samples, `src_w * src_h * channels` long
/// * `src_w`, `src_h` - Source dimensions
/// * `channels` - Samples per pixel
/// * `dst_w`, `dst_h` - Destination dimensions, both > 0
/// * `filter` - Resampling filter
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    let expected = src_w * src_h * channels;
    if src_w == 0 || src_h == 0 || src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples for {}x{}x{}, got {}",
            expected,
            src_w,
            src_h,
            channels,
            src.len()
        )));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }

    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w, filter);
    Ok(resize_vertical(&temp, dst_w, src_h, channels, dst_h, filter))
}

/// Horizontal resize pass.
fn resize_horizontal(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let taps = build_taps(src_w, dst_w, filter);
    let mut dst = vec![0.0f32; dst_w * src_h * channels];

    for y in 0..src_h {
        let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
        let dst_row = &mut dst[y * dst_w * channels..(y + 1) * dst_w * channels];
        for (x, tap) in taps.iter().enumerate() {
            let out = &mut dst_row[x * channels..(x + 1) * channels];
            for (k, &w) in tap.weights.iter().enumerate() {
                let idx = (tap.start + k) * channels;
                for c in 0..channels {
                    out[c] += src_row[idx + c] * w;
                }
            }
        }
    }

    dst
}

/// Vertical resize pass.
fn resize_vertical(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
    filter: Filter,
) -> Vec<f32> {
    let taps = build_taps(src_h, dst_h, filter);
    let stride = src_w * channels;
    let mut dst = vec![0.0f32; stride * dst_h];

    for (y, tap) in taps.iter().enumerate() {
        let dst_row = &mut dst[y * stride..(y + 1) * stride];
        for (k, &w) in tap.weights.iter().enumerate() {
            let src_row = &src[(tap.start + k) * stride..(tap.start + k + 1) * stride];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d += s * w;
            }
        }
    }

    dst
}

/// Resizes a raster image to exactly `dst_w` x `dst_h`.
///
/// Images with alpha are premultiplied before filtering and unpremultiplied
/// afterwards, so fully transparent pixels contribute no color. Resizing to
/// the current size returns an unfiltered copy.
pub fn resize_image(
    image: &RasterImage,
    dst_w: u32,
    dst_h: u32,
    filter: Filter,
) -> OpsResult<RasterImage> {
    trace!(
        src_w = image.width(),
        src_h = image.height(),
        dst_w,
        dst_h,
        %filter,
        "resize::resize_image"
    );

    if image.dimensions() == (dst_w, dst_h) {
        return Ok(image.clone());
    }

    let channels = image.channels();
    let mut samples = image.to_f32();
    if image.has_alpha() {
        premultiply_inplace(&mut samples);
    }

    let mut resized = resize_f32(
        &samples,
        image.width() as usize,
        image.height() as usize,
        channels,
        dst_w as usize,
        dst_h as usize,
        filter,
    )?;

    if image.has_alpha() {
        for px in resized.chunks_exact_mut(4) {
            px[3] = px[3].clamp(0.0, 1.0);
        }
        unpremultiply_inplace(&mut resized);
    }

    debug!(dst_w, dst_h, channels, "Resized mark");
    Ok(RasterImage::from_f32(dst_w, dst_h, image.layout(), &resized)?)
}

/// Calculates the aspect-preserving dimensions for a target size.
///
/// # Example
///
/// ```rust
/// use cornermark_ops::resize::fit_dimensions;
///
/// // Fit 1920x1080 into 640x480 box
/// let (w, h) = fit_dimensions(1920, 1080, 640, 480);
/// assert_eq!((w, h), (640, 360));
/// ```
pub fn fit_dimensions(
    src_w: usize,
    src_h: usize,
    max_w: usize,
    max_h: usize,
) -> (usize, usize) {
    let scale_w = max_w as f32 / src_w as f32;
    let scale_h = max_h as f32 / src_h as f32;
    let scale = scale_w.min(scale_h);

    let new_w = ((src_w as f32 * scale).round() as usize).max(1);
    let new_h = ((src_h as f32 * scale).round() as usize).max(1);

    (new_w, new_h)
}
