//! Error types for compositing operations.

use thiserror::Error;

/// Error type for compositing operations.
///
/// Every variant is an input-validation failure; nothing here is transient,
/// so callers should report rather than retry.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Position index is not one of the four corners.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Transparency is outside `[0.0, 1.0]` or not a number.
    #[error("invalid transparency {0}: expected a value in [0.0, 1.0]")]
    InvalidTransparency(f32),

    /// Base image is smaller than one pixel per grid cell.
    #[error("image {width}x{height} is too small for a {squares}x{squares} grid")]
    DimensionTooSmall {
        /// Base width
        width: u32,
        /// Base height
        height: u32,
        /// Grid divisor
        squares: u32,
    },

    /// Image cannot be brought into an alpha-capable layout.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Grid divisor cannot produce four distinct corners.
    #[error("invalid grid divisor {0}: expected at least 2")]
    InvalidGrid(u32),

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Error raised by a core image type.
    #[error(transparent)]
    Core(cornermark_core::Error),
}

impl From<cornermark_core::Error> for OpsError {
    fn from(err: cornermark_core::Error) -> Self {
        if err.is_format_error() {
            OpsError::UnsupportedPixelFormat(err.to_string())
        } else {
            OpsError::Core(err)
        }
    }
}

/// Result type for compositing operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_map_to_pixel_format() {
        let err: OpsError = cornermark_core::Error::unsupported_format("2 channels").into();
        assert!(matches!(err, OpsError::UnsupportedPixelFormat(_)));

        let err: OpsError = cornermark_core::Error::BufferSize { expected: 4, got: 3 }.into();
        assert!(matches!(err, OpsError::Core(_)));
    }

    #[test]
    fn test_messages() {
        let err = OpsError::DimensionTooSmall { width: 7, height: 100, squares: 8 };
        assert_eq!(err.to_string(), "image 7x100 is too small for a 8x8 grid");
        assert!(OpsError::InvalidTransparency(1.5).to_string().contains("1.5"));
    }
}
