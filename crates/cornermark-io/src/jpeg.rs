//! JPEG format support.
//!
//! Decoding accepts RGB, 8/16-bit grayscale and CMYK and always yields
//! 8-bit RGB. JPEG has no alpha channel, so RGBA images are flattened to
//! RGB on write, with a warning.
//!
//! # Example
//!
//! ```rust,ignore
//! use cornermark_io::jpeg::{self, JpegOptions};
//!
//! let image = jpeg::read("photo.jpg")?;
//! jpeg::write_with_options("small.jpg", &image, &JpegOptions { quality: 70 })?;
//! ```

use crate::{IoError, IoResult};
use cornermark_core::{PixelLayout, RasterImage};
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Options for writing JPEG files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Quality level 1-100. Higher = better quality, larger files.
    pub quality: u8,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// Reads a JPEG file from disk.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let path = path.as_ref();
    trace!(path = %path.display(), "jpeg::read");
    let file = std::fs::File::open(path)?;
    decode(file)
}

/// Reads a JPEG from a byte slice.
pub fn read_from_memory(data: &[u8]) -> IoResult<RasterImage> {
    trace!(len = data.len(), "jpeg::read_from_memory");
    decode(Cursor::new(data))
}

/// Writes a JPEG file with default options (quality 90).
pub fn write<P: AsRef<Path>>(path: P, image: &RasterImage) -> IoResult<()> {
    write_with_options(path, image, &JpegOptions::default())
}

/// Writes a JPEG file with the given options.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    image: &RasterImage,
    options: &JpegOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), quality = options.quality, "jpeg::write");
    let data = write_to_memory(image, options)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Encodes an image to JPEG bytes.
pub fn write_to_memory(image: &RasterImage, options: &JpegOptions) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "{}x{} exceeds the JPEG limit of 65535 pixels per side",
                image.width(),
                image.height()
            )));
        }
    };

    if image.has_alpha() {
        warn!("JPEG has no alpha channel; alpha is dropped");
    }
    let rgb = match image.layout() {
        PixelLayout::Rgb => std::borrow::Cow::Borrowed(image),
        PixelLayout::Rgba => std::borrow::Cow::Owned(image.to_rgb()),
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, options.quality.clamp(1, 100));
    encoder
        .encode(rgb.data(), width, height, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    debug!(bytes = buffer.len(), "Encoded JPEG");
    Ok(buffer)
}

fn decode<R: Read>(reader: R) -> IoResult<RasterImage> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    debug!(width, height, pixel_format = ?info.pixel_format, "Decoded JPEG");

    let data = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| {
                let g = l16[0];
                [g, g, g]
            })
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0).round() as u8;
                [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
            })
            .collect(),
    };

    Ok(RasterImage::from_layout(width, height, PixelLayout::Rgb, data)?)
}
