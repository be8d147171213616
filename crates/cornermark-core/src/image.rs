//! Raster image buffer.
//!
//! [`RasterImage`] is the one image type the compositor works with: an
//! owned, 8-bit, interleaved bitmap in either RGB or RGBA layout.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with no row
//! padding:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  ← Row 0
//!         [R G B R G B R G B ...]  ← Row 1
//!         ...
//! ```
//!
//! For RGBA images, alpha is interleaved: `[R G B A R G B A ...]`
//!
//! # Usage
//!
//! ```rust
//! use cornermark_core::{PixelLayout, RasterImage};
//!
//! let mut img = RasterImage::new(64, 48, PixelLayout::Rgb).unwrap();
//! img.pixel_mut(10, 5).copy_from_slice(&[255, 128, 0]);
//! assert_eq!(img.pixel(10, 5), &[255, 128, 0]);
//!
//! let rgba = img.to_rgba();
//! assert_eq!(rgba.pixel(10, 5), &[255, 128, 0, 255]);
//! ```

use crate::{Error, Rect, Result};

/// Channel layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, straight (non-premultiplied) alpha.
    Rgba,
}

impl PixelLayout {
    /// Number of interleaved channels.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Returns `true` if the layout carries an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// The alpha-carrying counterpart of this layout.
    #[inline]
    pub const fn with_alpha(self) -> Self {
        Self::Rgba
    }

    /// Maps a channel count to a layout.
    ///
    /// Only 3 and 4 channels are accepted; gray images are expanded to RGB
    /// by the decoders before they reach this point.
    pub fn from_channels(channels: u32) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(Error::unsupported_format(format!("{n} channels"))),
        }
    }
}

impl std::fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb => f.write_str("RGB"),
            Self::Rgba => f.write_str("RGBA"),
        }
    }
}

/// Owned 8-bit raster image.
///
/// # Invariants
///
/// - `width > 0` and `height > 0`
/// - `data.len() == width * height * layout.channels()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

/// Checked `width * height * channels`.
fn sample_count(width: u32, height: u32, layout: PixelLayout) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(layout.channels()))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}

impl RasterImage {
    /// Creates a zero-filled image (black, and fully transparent for RGBA).
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
        let len = sample_count(width, height, layout)?;
        Ok(Self {
            width,
            height,
            layout,
            data: vec![0; len],
        })
    }

    /// Creates an image with every pixel set to `pixel`.
    ///
    /// `pixel` must have exactly `layout.channels()` samples.
    ///
    /// ```rust
    /// use cornermark_core::{PixelLayout, RasterImage};
    ///
    /// let img = RasterImage::filled(4, 4, PixelLayout::Rgba, &[10, 20, 30, 255]).unwrap();
    /// assert_eq!(img.pixel(3, 3), &[10, 20, 30, 255]);
    /// ```
    pub fn filled(width: u32, height: u32, layout: PixelLayout, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != layout.channels() {
            return Err(Error::BufferSize {
                expected: layout.channels(),
                got: pixel.len(),
            });
        }
        let len = sample_count(width, height, layout)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / layout.channels() {
            data.extend_from_slice(pixel);
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Wraps decoded samples with a raw channel count.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if `channels` is not 3 or 4
    /// - [`Error::InvalidDimensions`] if width or height is zero
    /// - [`Error::BufferSize`] if `data` has the wrong length
    pub fn from_raw(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let layout = PixelLayout::from_channels(channels)?;
        Self::from_layout(width, height, layout, data)
    }

    /// Wraps samples already known to be in `layout`.
    pub fn from_layout(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height, layout)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Quantizes normalized `[0, 1]` samples back to 8 bits.
    ///
    /// Values are rounded to the nearest level and clamped, so resampling
    /// overshoot never wraps around.
    pub fn from_f32(width: u32, height: u32, layout: PixelLayout, samples: &[f32]) -> Result<Self> {
        let data = samples.iter().map(|&v| quantize(v)).collect();
        Self::from_layout(width, height, layout, data)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Number of interleaved channels (3 or 4).
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Returns `true` if the image carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Rectangle covering the whole image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its samples.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// Samples of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        &self.data[offset..offset + self.channels()]
    }

    /// Mutable samples of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        let channels = self.channels();
        &mut self.data[offset..offset + channels]
    }

    /// Samples of the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row out of bounds");
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row out of bounds");
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Returns an RGBA copy; a missing alpha channel becomes fully opaque.
    pub fn to_rgba(&self) -> RasterImage {
        self.clone().into_rgba()
    }

    /// Converts to RGBA in place of `self`; a no-op for RGBA input.
    pub fn into_rgba(self) -> RasterImage {
        match self.layout {
            PixelLayout::Rgba => self,
            PixelLayout::Rgb => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                    .collect();
                RasterImage {
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgba,
                    data,
                }
            }
        }
    }

    /// Returns an RGB copy with any alpha channel discarded.
    pub fn to_rgb(&self) -> RasterImage {
        match self.layout {
            PixelLayout::Rgb => self.clone(),
            PixelLayout::Rgba => {
                let data = self
                    .data
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                RasterImage {
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgb,
                    data,
                }
            }
        }
    }

    /// Extracts the alpha channel, one sample per pixel.
    ///
    /// Returns `None` for RGB images.
    pub fn alpha_channel(&self) -> Option<Vec<u8>> {
        if !self.has_alpha() {
            return None;
        }
        Some(self.data.chunks_exact(4).map(|px| px[3]).collect())
    }

    /// Writes an alpha channel back, one sample per pixel.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if the image has no alpha channel
    /// - [`Error::BufferSize`] if `alpha` is not one sample per pixel
    pub fn set_alpha_channel(&mut self, alpha: &[u8]) -> Result<()> {
        if !self.has_alpha() {
            return Err(Error::unsupported_format(format!(
                "{} image has no alpha channel",
                self.layout
            )));
        }
        if alpha.len() != self.pixel_count() {
            return Err(Error::BufferSize {
                expected: self.pixel_count(),
                got: alpha.len(),
            });
        }
        for (px, &a) in self.data.chunks_exact_mut(4).zip(alpha) {
            px[3] = a;
        }
        Ok(())
    }

    /// Normalized `[0, 1]` samples, for resampling.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32 / 255.0).collect()
    }
}

/// Rounds a normalized sample to the nearest 8-bit level.
#[inline]
pub fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
