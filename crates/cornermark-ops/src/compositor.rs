//! The corner watermark compositor.
//!
//! Scales a mark to one cell of an N×N grid laid over the base, optionally
//! fades its alpha, and pastes it into one of the four corner cells.
//!
//! All inputs are validated before the base is touched, so an error never
//! leaves a half-modified image behind.
//!
//! # Example
//!
//! ```rust
//! use cornermark_core::{PixelLayout, RasterImage};
//! use cornermark_ops::compositor::composite;
//!
//! let base = RasterImage::filled(800, 640, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
//! let mark = RasterImage::filled(300, 300, PixelLayout::Rgb, &[255, 255, 255]).unwrap();
//!
//! let out = composite(base, &mark, 3, 1.0).unwrap();
//! assert_eq!(out.dimensions(), (800, 640));
//! assert_eq!(out.pixel(750, 600), &[255, 255, 255]);
//! assert_eq!(out.pixel(650, 600), &[0, 0, 0]);
//! ```

use crate::alpha::{apply_transparency, Transparency};
use crate::composite::paste;
use crate::grid::{Corner, PlacementGrid, DEFAULT_SQUARES};
use crate::resize::{resize_image, Filter};
use crate::{OpsError, OpsResult};
use cornermark_core::{RasterImage, Rect};
use tracing::{debug, trace};

/// Compositor configuration: grid divisor and resampling filter.
///
/// Holds no per-call state, so one value can serve any number of calls,
/// including concurrent ones on distinct bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    squares: u32,
    filter: Filter,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            squares: DEFAULT_SQUARES,
            filter: Filter::default(),
        }
    }
}

impl Compositor {
    /// Compositor with an 8×8 grid and bicubic resampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grid divisor.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidGrid`] if `squares < 2`.
    pub fn with_squares(mut self, squares: u32) -> OpsResult<Self> {
        if squares < 2 {
            return Err(OpsError::InvalidGrid(squares));
        }
        self.squares = squares;
        Ok(self)
    }

    /// Sets the resampling filter used to scale the mark.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Grid divisor N.
    #[inline]
    pub fn squares(&self) -> u32 {
        self.squares
    }

    /// Resampling filter.
    #[inline]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Placement grid for a base image.
    pub fn grid_for(&self, base: &RasterImage) -> OpsResult<PlacementGrid> {
        PlacementGrid::new(base.width(), base.height(), self.squares)
    }

    /// Fades and scales the mark to exactly `cell`.
    ///
    /// The fade runs first so the resampler sees the final alpha; an opaque
    /// transparency leaves the mark's layout as is.
    pub fn prepare_mark(
        &self,
        mark: &RasterImage,
        cell: (u32, u32),
        transparency: Transparency,
    ) -> OpsResult<RasterImage> {
        let (cw, ch) = cell;
        if transparency.is_opaque() {
            resize_image(mark, cw, ch, self.filter)
        } else {
            let faded = apply_transparency(mark, transparency)?;
            resize_image(&faded, cw, ch, self.filter)
        }
    }

    /// Composites `mark` into `corner` of `base`, returning the target
    /// rectangle.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidGrid`] / [`OpsError::DimensionTooSmall`] if the
    ///   base cannot hold the grid
    /// - [`OpsError::UnsupportedPixelFormat`] if the mark cannot take alpha
    pub fn composite_in_place(
        &self,
        base: &mut RasterImage,
        mark: &RasterImage,
        corner: Corner,
        transparency: Transparency,
    ) -> OpsResult<Rect> {
        trace!(
            base_w = base.width(),
            base_h = base.height(),
            mark_w = mark.width(),
            mark_h = mark.height(),
            %corner,
            transparency = transparency.value(),
            squares = self.squares,
            "compositor::composite_in_place"
        );

        let grid = self.grid_for(base)?;
        let rect = grid.corner_rect(corner);
        debug!(cell = ?grid.cell_size(), %rect, "Placement");

        let prepared = self.prepare_mark(mark, grid.cell_size(), transparency)?;
        paste(base, &prepared, rect)?;
        Ok(rect)
    }

    /// Validates raw inputs and composites, consuming and returning the base.
    ///
    /// `position` is 0=top-left, 1=top-right, 2=bottom-left,
    /// 3=bottom-right.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidPosition`] if `position > 3`
    /// - [`OpsError::InvalidTransparency`] if `transparency` is outside
    ///   `[0.0, 1.0]`
    /// - anything [`Compositor::composite_in_place`] returns
    pub fn composite(
        &self,
        mut base: RasterImage,
        mark: &RasterImage,
        position: usize,
        transparency: f32,
    ) -> OpsResult<RasterImage> {
        let corner = Corner::from_index(position)?;
        let transparency = Transparency::new(transparency)?;
        self.composite_in_place(&mut base, mark, corner, transparency)?;
        Ok(base)
    }

    /// Runs a [`CompositeRequest`].
    pub fn run(&self, request: CompositeRequest<'_>) -> OpsResult<RasterImage> {
        let CompositeRequest {
            base,
            mark,
            position,
            transparency,
        } = request;
        self.composite(base, mark, position, transparency)
    }
}

/// One compositing call's inputs, bundled.
#[derive(Debug, Clone)]
pub struct CompositeRequest<'a> {
    /// Image to watermark; returned mutated.
    pub base: RasterImage,
    /// Watermark, borrowed.
    pub mark: &'a RasterImage,
    /// Corner index, 0..=3.
    pub position: usize,
    /// Opacity factor, 0.0..=1.0.
    pub transparency: f32,
}

impl<'a> CompositeRequest<'a> {
    /// Request with full opacity.
    pub fn new(base: RasterImage, mark: &'a RasterImage, position: usize) -> Self {
        Self {
            base,
            mark,
            position,
            transparency: 1.0,
        }
    }

    /// Sets the transparency factor.
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }
}

/// Composites with the default [`Compositor`] (8×8 grid, bicubic).
pub fn composite(
    base: RasterImage,
    mark: &RasterImage,
    position: usize,
    transparency: f32,
) -> OpsResult<RasterImage> {
    Compositor::default().composite(base, mark, position, transparency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cornermark_core::PixelLayout;

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::new(width, height, PixelLayout::Rgb).unwrap();
        for y in 0..height {
            for x in 0..width {
                let px = img.pixel_mut(x, y);
                px[0] = (x % 256) as u8;
                px[1] = (y % 256) as u8;
                px[2] = ((x + y) % 256) as u8;
            }
        }
        img
    }

    fn assert_outside_untouched(before: &RasterImage, after: &RasterImage, rect: Rect) {
        for y in 0..before.height() {
            for x in 0..before.width() {
                if !rect.contains(x, y) {
                    assert_eq!(before.pixel(x, y), after.pixel(x, y), "pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_dimensions_preserved_for_every_position() {
        let mark = RasterImage::filled(37, 21, PixelLayout::Rgba, &[9, 9, 9, 200]).unwrap();
        for position in 0..4 {
            let out = composite(gradient(203, 117), &mark, position, 0.7).unwrap();
            assert_eq!(out.dimensions(), (203, 117));
            assert_eq!(out.layout(), PixelLayout::Rgb);
        }
    }

    #[test]
    fn test_reference_scenario_bottom_right() {
        let base = gradient(800, 640);
        let mark = gradient(100, 80);

        let mut out = base.clone();
        let rect = Compositor::new()
            .composite_in_place(&mut out, &mark, Corner::BottomRight, Transparency::OPAQUE)
            .unwrap();

        assert_eq!(rect, Rect::new(700, 560, 800, 640));
        for y in 0..80 {
            for x in 0..100 {
                assert_eq!(out.pixel(700 + x, 560 + y), mark.pixel(x, y));
            }
        }
        assert_outside_untouched(&base, &out, rect);
    }

    #[test]
    fn test_prepared_mark_is_exactly_one_cell() {
        let c = Compositor::new();
        let mark = gradient(333, 17);
        let grid = c.grid_for(&gradient(800, 640)).unwrap();
        let prepared = c.prepare_mark(&mark, grid.cell_size(), Transparency::OPAQUE).unwrap();
        assert_eq!(prepared.dimensions(), (100, 80));

        let faded = c
            .prepare_mark(&mark, grid.cell_size(), Transparency::new(0.5).unwrap())
            .unwrap();
        assert_eq!(faded.dimensions(), (100, 80));
        assert_eq!(faded.layout(), PixelLayout::Rgba);
    }

    #[test]
    fn test_opaque_overwrite_is_deterministic() {
        let mark = gradient(50, 50);
        let a = composite(gradient(320, 240), &mark, 1, 1.0).unwrap();
        let b = composite(gradient(320, 240), &mark, 1, 1.0).unwrap();
        assert_eq!(a, b);

        let rect = Rect::new(280, 0, 320, 30);
        let white = RasterImage::filled(50, 50, PixelLayout::Rgb, &[255, 255, 255]).unwrap();
        let out = composite(gradient(320, 240), &white, 1, 1.0).unwrap();
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                assert_eq!(out.pixel(x, y), &[255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_zero_transparency_leaves_base_unchanged() {
        let base = gradient(160, 96);
        let mark = RasterImage::filled(20, 20, PixelLayout::Rgb, &[255, 0, 0]).unwrap();
        for position in 0..4 {
            let out = composite(base.clone(), &mark, position, 0.0).unwrap();
            assert_eq!(out, base);
        }
    }

    #[test]
    fn test_half_transparency_blends() {
        let base = RasterImage::filled(16, 16, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
        let mark = RasterImage::filled(2, 2, PixelLayout::Rgba, &[255, 255, 255, 255]).unwrap();
        let out = composite(base.clone(), &mark, 0, 0.5).unwrap();

        let rect = Rect::new(0, 0, 2, 2);
        assert_eq!(out.pixel(0, 0), &[128, 128, 128]);
        assert_eq!(out.pixel(1, 1), &[128, 128, 128]);
        assert_outside_untouched(&base, &out, rect);
    }

    #[test]
    fn test_rgba_base_keeps_layout() {
        let base = RasterImage::filled(16, 16, PixelLayout::Rgba, &[0, 0, 0, 0]).unwrap();
        let mark = RasterImage::filled(2, 2, PixelLayout::Rgb, &[10, 20, 30]).unwrap();
        let out = composite(base, &mark, 2, 1.0).unwrap();
        assert_eq!(out.layout(), PixelLayout::Rgba);
        assert_eq!(out.pixel(0, 14), &[10, 20, 30, 255]);
        assert_eq!(out.pixel(0, 13), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_faded_mark_on_opaque_rgba_base() {
        // Base alpha is lerped toward the mark alpha: 255·(1−a) + a·a with a = 128/255
        let base = RasterImage::filled(16, 16, PixelLayout::Rgba, &[0, 0, 0, 255]).unwrap();
        let mark = RasterImage::filled(2, 2, PixelLayout::Rgb, &[255, 255, 255]).unwrap();
        let out = composite(base, &mark, 3, 0.5).unwrap();
        assert_eq!(out.pixel(14, 14), &[128, 128, 128, 191]);
        assert_eq!(out.pixel(15, 15), &[128, 128, 128, 191]);
        assert_eq!(out.pixel(13, 15), &[0, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_position() {
        let mark = gradient(4, 4);
        assert!(matches!(
            composite(gradient(64, 64), &mark, 4, 1.0),
            Err(OpsError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_invalid_transparency() {
        let mark = gradient(4, 4);
        for t in [1.5, -0.1, f32::NAN] {
            assert!(matches!(
                composite(gradient(64, 64), &mark, 0, t),
                Err(OpsError::InvalidTransparency(_))
            ));
        }
    }

    #[test]
    fn test_position_checked_before_transparency() {
        let mark = gradient(4, 4);
        assert!(matches!(
            composite(gradient(4, 4), &mark, 9, 3.0),
            Err(OpsError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_base_too_small() {
        let mark = gradient(4, 4);
        assert!(matches!(
            composite(gradient(7, 300), &mark, 0, 1.0),
            Err(OpsError::DimensionTooSmall { width: 7, height: 300, squares: 8 })
        ));
    }

    #[test]
    fn test_exact_grid_size_base_is_accepted() {
        let base = RasterImage::filled(8, 8, PixelLayout::Rgb, &[0, 0, 0]).unwrap();
        let mark = RasterImage::filled(3, 3, PixelLayout::Rgb, &[255, 255, 255]).unwrap();
        let out = composite(base, &mark, 3, 1.0).unwrap();
        assert_eq!(out.pixel(7, 7), &[255, 255, 255]);
        assert_eq!(out.pixel(6, 7), &[0, 0, 0]);
    }

    #[test]
    fn test_error_leaves_base_untouched() {
        let base = gradient(7, 300);
        let mut work = base.clone();
        let mark = gradient(4, 4);
        let res = Compositor::new().composite_in_place(
            &mut work,
            &mark,
            Corner::TopLeft,
            Transparency::OPAQUE,
        );
        assert!(res.is_err());
        assert_eq!(work, base);
    }

    #[test]
    fn test_custom_squares_and_filter() {
        let c = Compositor::new()
            .with_squares(4)
            .unwrap()
            .with_filter(Filter::Nearest);
        assert_eq!(c.squares(), 4);
        assert_eq!(c.filter(), Filter::Nearest);

        let mut base = gradient(100, 60);
        let rect = c
            .composite_in_place(&mut base, &gradient(5, 5), Corner::TopRight, Transparency::OPAQUE)
            .unwrap();
        assert_eq!(rect, Rect::new(75, 0, 100, 15));

        assert!(matches!(Compositor::new().with_squares(1), Err(OpsError::InvalidGrid(1))));
    }

    #[test]
    fn test_request() {
        let mark = gradient(8, 8);
        let request = CompositeRequest::new(gradient(64, 64), &mark, 3).with_transparency(0.25);
        assert_eq!(request.transparency, 0.25);
        let out = Compositor::default().run(request).unwrap();
        assert_eq!(out.dimensions(), (64, 64));

        let bad = CompositeRequest::new(gradient(64, 64), &mark, 0).with_transparency(2.0);
        assert!(Compositor::default().run(bad).is_err());
    }
}
