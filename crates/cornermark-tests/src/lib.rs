//! Integration tests for cornermark crates.
//!
//! End-to-end checks of decode -> composite -> encode across the
//! `cornermark-io` and `cornermark-ops` crates.

#[cfg(test)]
mod tests {
    use cornermark_core::{PixelLayout, RasterImage, Rect};
    use cornermark_ops::{Compositor, Corner, OpsError, Transparency, composite};
    use tempfile::tempdir;

    fn photo(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::new(width, height, PixelLayout::Rgb).unwrap();
        for y in 0..height {
            for x in 0..width {
                let px = img.pixel_mut(x, y);
                px[0] = (x * 255 / width) as u8;
                px[1] = (y * 255 / height) as u8;
                px[2] = 90;
            }
        }
        img
    }

    fn logo(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::new(width, height, PixelLayout::Rgba).unwrap();
        for y in 0..height {
            for x in 0..width {
                let on = (x / 4 + y / 4) % 2 == 0;
                img.pixel_mut(x, y)
                    .copy_from_slice(if on { &[255, 255, 255, 255] } else { &[0, 0, 0, 0] });
            }
        }
        img
    }

    /// Decode from disk, composite, encode, decode again.
    #[test]
    fn test_png_pipeline() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("base.png");
        let mark_path = dir.path().join("mark.png");
        let out_path = dir.path().join("out.png");

        let base = photo(800, 640);
        let mark = logo(100, 80);
        cornermark_io::write(&base_path, &base).expect("Failed to write base");
        cornermark_io::write(&mark_path, &mark).expect("Failed to write mark");

        let base_in = cornermark_io::read(&base_path).unwrap();
        let mark_in = cornermark_io::read(&mark_path).unwrap();
        assert_eq!(base_in, base);
        assert_eq!(mark_in, mark);

        let result = composite(base_in, &mark_in, 3, 1.0).unwrap();
        cornermark_io::write(&out_path, &result).expect("Failed to write result");
        let loaded = cornermark_io::read(&out_path).unwrap();

        assert_eq!(loaded.dimensions(), (800, 640));
        assert_eq!(loaded, result);

        // Mark is already one cell, so opaque texels land unchanged
        assert_eq!(loaded.pixel(700, 560), &[255, 255, 255]);
        // Transparent texels show the base
        assert_eq!(loaded.pixel(704, 560), base.pixel(704, 560));
        // Outside the bottom-right cell nothing moves
        assert_eq!(loaded.pixel(699, 639), base.pixel(699, 639));
        assert_eq!(loaded.pixel(0, 0), base.pixel(0, 0));
    }

    #[test]
    fn test_jpeg_base_png_mark() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("base.jpg");
        cornermark_io::write(&base_path, &photo(640, 480)).unwrap();

        let base = cornermark_io::read(&base_path).unwrap();
        assert_eq!(base.layout(), PixelLayout::Rgb);

        let mark = logo(300, 200);
        for position in 0..4 {
            let out = composite(base.clone(), &mark, position, 0.5).unwrap();
            assert_eq!(out.dimensions(), (640, 480));
            assert_eq!(out.layout(), PixelLayout::Rgb);
        }
    }

    #[test]
    fn test_pixels_outside_rect_untouched() {
        let base = photo(413, 287);
        let mark = logo(64, 64);
        let compositor = Compositor::new().with_squares(5).unwrap();

        for corner in Corner::ALL {
            let mut out = base.clone();
            let rect = compositor
                .composite_in_place(&mut out, &mark, corner, Transparency::new(0.8).unwrap())
                .unwrap();
            assert_eq!(rect.size(), (82, 57));
            for y in 0..base.height() {
                for x in 0..base.width() {
                    if !rect.contains(x, y) {
                        assert_eq!(out.pixel(x, y), base.pixel(x, y));
                    }
                }
            }
        }
    }

    #[test]
    fn test_repeated_runs_identical() {
        let base = photo(256, 256);
        let mark = logo(50, 30);
        let a = composite(base.clone(), &mark, 2, 0.35).unwrap();
        let b = composite(base, &mark, 2, 0.35).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transparent_mark_leaves_base() {
        let base = photo(160, 160);
        let out = composite(base.clone(), &logo(40, 40), 1, 0.0).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_errors_surface_before_io() {
        let dir = tempdir().unwrap();
        let tiny_path = dir.path().join("tiny.png");
        cornermark_io::write(&tiny_path, &photo(6, 6)).unwrap();
        let tiny = cornermark_io::read(&tiny_path).unwrap();

        let err = composite(tiny, &logo(8, 8), 0, 1.0).unwrap_err();
        assert!(matches!(err, OpsError::DimensionTooSmall { width: 6, height: 6, squares: 8 }));

        let err = composite(photo(64, 64), &logo(8, 8), 4, 1.0).unwrap_err();
        assert!(matches!(err, OpsError::InvalidPosition(_)));

        let err = composite(photo(64, 64), &logo(8, 8), 0, 1.5).unwrap_err();
        assert!(matches!(err, OpsError::InvalidTransparency(_)));
    }

    #[test]
    fn test_reference_geometry() {
        let grid = Compositor::new().grid_for(&photo(800, 640)).unwrap();
        assert_eq!(grid.cell_size(), (100, 80));
        assert_eq!(grid.corner_rect(Corner::BottomRight), Rect::new(700, 560, 800, 640));
    }
}
