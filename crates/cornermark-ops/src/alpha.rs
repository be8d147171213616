//! Transparency and alpha-channel handling.
//!
//! A mark's opacity is adjusted by extracting its alpha channel, scaling
//! every sample linearly by the transparency factor, and writing it back:
//! `alpha' = round(alpha × t)`. Marks without alpha are treated as fully
//! opaque first.
//!
//! # Example
//!
//! ```rust
//! use cornermark_core::{PixelLayout, RasterImage};
//! use cornermark_ops::alpha::{apply_transparency, Transparency};
//!
//! let mark = RasterImage::filled(2, 2, PixelLayout::Rgb, &[255, 0, 0]).unwrap();
//! let faded = apply_transparency(&mark, Transparency::new(0.5).unwrap()).unwrap();
//! assert_eq!(faded.pixel(0, 0), &[255, 0, 0, 128]);
//! ```

use crate::{OpsError, OpsResult};
use cornermark_core::RasterImage;
use tracing::trace;

/// Opacity factor for the mark, validated to lie in `[0.0, 1.0]`.
///
/// `1.0` leaves the mark as is; `0.0` makes it invisible.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Transparency(f32);

impl Transparency {
    /// Fully opaque: the mark's alpha is left untouched.
    pub const OPAQUE: Transparency = Transparency(1.0);

    /// Validates a transparency factor.
    ///
    /// Out-of-range values and NaN are rejected, never clamped.
    pub fn new(value: f32) -> OpsResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OpsError::InvalidTransparency(value))
        }
    }

    /// The factor as a float.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns `true` when no alpha adjustment is needed.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.0 >= 1.0
    }
}

impl Default for Transparency {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl TryFrom<f32> for Transparency {
    type Error = OpsError;

    fn try_from(value: f32) -> OpsResult<Self> {
        Self::new(value)
    }
}

/// Scales 8-bit alpha samples in place by `factor`.
pub fn scale_alpha(alpha: &mut [u8], factor: f32) {
    for a in alpha {
        *a = (*a as f32 * factor).round().clamp(0.0, 255.0) as u8;
    }
}

/// Returns an RGBA copy of `mark` with its alpha scaled by `transparency`.
///
/// RGB marks gain an opaque alpha channel before scaling.
pub fn apply_transparency(mark: &RasterImage, transparency: Transparency) -> OpsResult<RasterImage> {
    trace!(
        width = mark.width(),
        height = mark.height(),
        transparency = transparency.value(),
        "alpha::apply_transparency"
    );

    let mut rgba = mark.to_rgba();
    let mut alpha = rgba
        .alpha_channel()
        .ok_or_else(|| OpsError::UnsupportedPixelFormat(format!("{} has no alpha", rgba.layout())))?;
    scale_alpha(&mut alpha, transparency.value());
    rgba.set_alpha_channel(&alpha)?;
    Ok(rgba)
}

/// Premultiplies alpha in-place for RGBA f32 samples.
///
/// Converts straight alpha to premultiplied: `RGB *= A`.
pub fn premultiply_inplace(data: &mut [f32]) {
    for chunk in data.chunks_exact_mut(4) {
        let a = chunk[3];
        chunk[0] *= a;
        chunk[1] *= a;
        chunk[2] *= a;
    }
}

/// Unpremultiplies alpha in-place for RGBA f32 samples.
///
/// Converts premultiplied to straight alpha: `RGB /= A`. Fully transparent
/// pixels become black.
pub fn unpremultiply_inplace(data: &mut [f32]) {
    for chunk in data.chunks_exact_mut(4) {
        let a = chunk[3];
        if a > 1e-8 {
            let inv_a = 1.0 / a;
            chunk[0] *= inv_a;
            chunk[1] *= inv_a;
            chunk[2] *= inv_a;
        } else {
            chunk[0] = 0.0;
            chunk[1] = 0.0;
            chunk[2] = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cornermark_core::PixelLayout;

    #[test]
    fn test_transparency_bounds() {
        assert!(Transparency::new(0.0).is_ok());
        assert!(Transparency::new(1.0).is_ok());
        assert!(matches!(Transparency::new(1.5), Err(OpsError::InvalidTransparency(_))));
        assert!(matches!(Transparency::new(-0.1), Err(OpsError::InvalidTransparency(_))));
        assert!(Transparency::new(f32::NAN).is_err());
        assert!(Transparency::try_from(0.3f32).is_ok());
        assert!(Transparency::default().is_opaque());
        assert!(!Transparency::new(0.99).unwrap().is_opaque());
    }

    #[test]
    fn test_scale_alpha() {
        let mut alpha = [255, 200, 1, 0];
        scale_alpha(&mut alpha, 0.5);
        assert_eq!(alpha, [128, 100, 1, 0]);

        let mut alpha = [255, 17];
        scale_alpha(&mut alpha, 0.0);
        assert_eq!(alpha, [0, 0]);
    }

    #[test]
    fn test_apply_transparency_keeps_color() {
        let mark = RasterImage::filled(3, 1, PixelLayout::Rgba, &[10, 20, 30, 100]).unwrap();
        let out = apply_transparency(&mark, Transparency::new(0.25).unwrap()).unwrap();
        assert_eq!(out.pixel(2, 0), &[10, 20, 30, 25]);
    }

    #[test]
    fn test_apply_transparency_rgb_is_opaque_first() {
        let mark = RasterImage::filled(1, 1, PixelLayout::Rgb, &[1, 2, 3]).unwrap();
        let out = apply_transparency(&mark, Transparency::new(0.2).unwrap()).unwrap();
        assert_eq!(out.layout(), PixelLayout::Rgba);
        assert_eq!(out.pixel(0, 0), &[1, 2, 3, 51]);
    }

    #[test]
    fn test_premultiply_roundtrip() {
        let mut px = vec![1.0, 0.5, 0.0, 0.5, 0.3, 0.3, 0.3, 0.0];
        premultiply_inplace(&mut px);
        assert_abs_diff_eq!(px[0], 0.5);
        assert_abs_diff_eq!(px[1], 0.25);
        assert_abs_diff_eq!(px[4], 0.0);
        unpremultiply_inplace(&mut px);
        assert_abs_diff_eq!(px[0], 1.0);
        assert_abs_diff_eq!(px[1], 0.5);
        assert_abs_diff_eq!(px[3], 0.5);
        assert_abs_diff_eq!(px[4], 0.0);
    }
}
