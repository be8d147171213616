//! PNG format support.
//!
//! Every PNG variant decodes to 8-bit RGB or RGBA:
//!
//! - indexed and sub-byte grayscale are expanded by the decoder
//! - `tRNS` transparency becomes a real alpha channel
//! - grayscale is replicated to RGB
//! - 16-bit samples are rounded to 8 bits
//!
//! Writing keeps the image's layout, so an RGBA image round-trips exactly.
//!
//! # Example
//!
//! ```rust,ignore
//! use cornermark_io::png;
//!
//! let image = png::read("mark.png")?;
//! png::write("copy.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use cornermark_core::{PixelLayout, RasterImage};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RasterImage> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png::read");
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Reads a PNG from a byte slice.
pub fn read_from_memory(data: &[u8]) -> IoResult<RasterImage> {
    trace!(len = data.len(), "png::read_from_memory");
    decode(Cursor::new(data))
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &RasterImage) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), width = image.width(), height = image.height(), "png::write");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encodes an image to PNG bytes.
pub fn write_to_memory(image: &RasterImage) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode(&mut buffer, image)?;
    Ok(buffer)
}

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<RasterImage> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        bit_depth = ?info.bit_depth,
        "Decoded PNG frame"
    );

    let samples = match info.bit_depth {
        png::BitDepth::Eight => buf,
        png::BitDepth::Sixteen => u16_be_to_u8(&buf),
        depth => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, depth
            )));
        }
    };

    let (layout, data) = match info.color_type {
        png::ColorType::Rgb => (PixelLayout::Rgb, samples),
        png::ColorType::Rgba => (PixelLayout::Rgba, samples),
        png::ColorType::Grayscale => {
            let rgb = samples.iter().flat_map(|&g| [g, g, g]).collect();
            (PixelLayout::Rgb, rgb)
        }
        png::ColorType::GrayscaleAlpha => {
            let rgba = samples
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            (PixelLayout::Rgba, rgba)
        }
        color_type => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, info.bit_depth
            )));
        }
    };

    Ok(RasterImage::from_layout(info.width, info.height, layout, data)?)
}

fn encode<W: Write>(writer: W, image: &RasterImage) -> IoResult<()> {
    let color_type = match image.layout() {
        PixelLayout::Rgb => png::ColorType::Rgb,
        PixelLayout::Rgba => png::ColorType::Rgba,
    };

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// Rounds big-endian 16-bit samples to 8 bits.
fn u16_be_to_u8(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(2)
        .map(|c| {
            let v = u16::from_be_bytes([c[0], c[1]]) as u32;
            ((v * 255 + 32_767) / 65_535) as u8
        })
        .collect()
}
