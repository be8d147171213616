//! Error types for cornermark-core.
//!
//! Covers the ways a [`crate::RasterImage`] can fail to be built or
//! accessed: zero-sized images, buffers of the wrong length, channel counts
//! without a supported layout, and out-of-range regions.
//!
//! # Usage
//!
//! ```rust
//! use cornermark_core::{Error, RasterImage};
//!
//! let err = RasterImage::from_raw(0, 10, 3, vec![]).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by core image types.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, or the buffer size would overflow.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Pixel buffer length does not match `width * height * channels`.
    #[error("buffer holds {got} samples, expected {expected}")]
    BufferSize {
        /// Expected sample count
        expected: usize,
        /// Actual sample count
        got: usize,
    },

    /// Channel count has no matching [`crate::PixelLayout`].
    #[error("unsupported pixel format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },

    /// Region does not fit inside the image.
    #[error("region ({left}, {top})-({right}, {bottom}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region left edge
        left: u32,
        /// Region top edge
        top: u32,
        /// Region right edge (exclusive)
        right: u32,
        /// Region bottom edge (exclusive)
        bottom: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::InvalidRegion`] error for `rect` inside a `width`x`height` image.
    #[inline]
    pub fn invalid_region(rect: crate::Rect, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
            width,
            height,
        }
    }

    /// Returns `true` if this error was caused by an unsupported pixel layout.
    #[inline]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = Error::invalid_dimensions(0, 20, "width must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("0x20"));
        assert!(msg.contains("width must be > 0"));
    }

    #[test]
    fn test_invalid_region_message() {
        let err = Error::invalid_region(Rect::new(90, 0, 110, 10), 100, 100);
        let msg = err.to_string();
        assert!(msg.contains("(90, 0)-(110, 10)"));
        assert!(msg.contains("100x100"));
    }

    #[test]
    fn test_format_error() {
        assert!(Error::unsupported_format("2 channels").is_format_error());
        assert!(!Error::BufferSize { expected: 3, got: 2 }.is_format_error());
    }
}
