//! # cornermark-ops
//!
//! The corner watermark compositor.
//!
//! Given a base image and a mark, the compositor lays an N×N grid over the
//! base, scales the mark to exactly one cell, optionally fades its alpha,
//! and pastes it into one of the four corner cells.
//!
//! # Modules
//!
//! - [`grid`] - Grid geometry and corner rectangles
//! - [`alpha`] - Transparency factor and alpha scaling
//! - [`resize`] - Separable resampling of the mark
//! - [`composite`] - Pasting and alpha blending
//! - [`compositor`] - The end-to-end operation and its configuration
//!
//! # Example
//!
//! ```rust
//! use cornermark_core::{PixelLayout, RasterImage};
//! use cornermark_ops::{Compositor, Filter};
//!
//! let base = RasterImage::filled(640, 480, PixelLayout::Rgb, &[30, 30, 30]).unwrap();
//! let mark = RasterImage::filled(64, 64, PixelLayout::Rgba, &[255, 255, 255, 255]).unwrap();
//!
//! let compositor = Compositor::new().with_squares(10).unwrap().with_filter(Filter::Lanczos3);
//! let out = compositor.composite(base, &mark, 0, 0.5).unwrap();
//! assert_eq!(out.dimensions(), (640, 480));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod alpha;
pub mod composite;
pub mod compositor;
pub mod grid;
pub mod resize;

pub use alpha::Transparency;
pub use compositor::{composite, CompositeRequest, Compositor};
pub use error::{OpsError, OpsResult};
pub use grid::{Corner, PlacementGrid};
pub use resize::Filter;
