//! # cornermark-io
//!
//! Decoding and encoding of base and mark images.
//!
//! - **PNG** - Lossless, keeps alpha; the default output format
//! - **JPEG** - Lossy, no alpha
//!
//! Everything decodes to an 8-bit [`RasterImage`] (RGB or RGBA), the only
//! representation the compositor works with.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cornermark_io::{read, write};
//!
//! let image = read("photo.jpg")?;
//! write("photo.png", &image)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Input variants |
//! |--------|------|-------|----------------|
//! | PNG | Yes | Yes | 1-16 bit, gray, gray+alpha, RGB, RGBA, indexed |
//! | JPEG | Yes | Yes | RGB, gray (8/16), CMYK |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use cornermark_core::RasterImage;
pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;

/// Reads an image from a file, auto-detecting the format.
///
/// Magic bytes decide first; the extension is only consulted when the
/// header is not recognized.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    tracing::debug!(path = %path.display(), %format, "Reading image");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        #[allow(unreachable_patterns)]
        _ => Err(unsupported(path)),
    }
}

/// Writes an image to a file, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not a supported format
/// - The file cannot be created
/// - Encoding fails
pub fn write<P: AsRef<Path>>(path: P, image: &RasterImage) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    tracing::debug!(path = %path.display(), %format, "Writing image");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image),

        #[allow(unreachable_patterns)]
        _ => Err(unsupported(path)),
    }
}

/// Decodes an image from bytes, detecting the format from its header.
pub fn read_from_memory(data: &[u8]) -> IoResult<RasterImage> {
    match Format::from_bytes(data) {
        #[cfg(feature = "png")]
        Format::Png => png::read_from_memory(data),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read_from_memory(data),

        #[allow(unreachable_patterns)]
        format => Err(IoError::UnsupportedFormat(format.to_string())),
    }
}

/// Encodes an image to bytes in the given format.
///
/// JPEG uses default options (quality 90).
pub fn write_to_memory(image: &RasterImage, format: Format) -> IoResult<Vec<u8>> {
    match format {
        #[cfg(feature = "png")]
        Format::Png => png::write_to_memory(image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write_to_memory(image, &jpeg::JpegOptions::default()),

        #[allow(unreachable_patterns)]
        format => Err(IoError::UnsupportedFormat(format.to_string())),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

#[cfg(all(test, feature = "png", feature = "jpeg"))]
mod tests {
    use super::*;
    use cornermark_core::PixelLayout;

    #[test]
    fn test_write_read_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = RasterImage::filled(10, 6, PixelLayout::Rgba, &[1, 2, 3, 4]).unwrap();

        let png_path = dir.path().join("a.png");
        write(&png_path, &image).unwrap();
        assert_eq!(read(&png_path).unwrap(), image);

        let jpg_path = dir.path().join("a.JPEG");
        write(&jpg_path, &image).unwrap();
        let back = read(&jpg_path).unwrap();
        assert_eq!(back.layout(), PixelLayout::Rgb);
        assert_eq!(back.dimensions(), (10, 6));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = RasterImage::new(2, 2, PixelLayout::Rgb).unwrap();
        let err = write(dir.path().join("a.bmp"), &image).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat(ref ext) if ext == "bmp"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(read("/definitely/not/here.png"), Err(IoError::Io(_))));
    }

    #[test]
    fn test_memory_roundtrip_detects_format() {
        let image = RasterImage::filled(3, 3, PixelLayout::Rgb, &[9, 9, 9]).unwrap();
        let png = write_to_memory(&image, Format::Png).unwrap();
        assert_eq!(Format::from_bytes(&png), Format::Png);
        assert_eq!(read_from_memory(&png).unwrap(), image);

        let jpg = write_to_memory(&image, Format::Jpeg).unwrap();
        assert_eq!(Format::from_bytes(&jpg), Format::Jpeg);
        assert_eq!(read_from_memory(&jpg).unwrap().dimensions(), (3, 3));

        assert!(matches!(read_from_memory(b"GIF89a"), Err(IoError::UnsupportedFormat(_))));
    }
}
