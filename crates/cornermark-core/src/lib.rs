//! # cornermark-core
//!
//! Core types shared by every cornermark crate:
//!
//! - [`RasterImage`] - Owned 8-bit interleaved bitmap (RGB or RGBA)
//! - [`PixelLayout`] - Channel layout of a [`RasterImage`]
//! - [`Rect`] - Placement rectangle in pixel coordinates
//! - [`Error`] / [`Result`] - Construction and access errors
//!
//! ## Crate Structure
//!
//! ```text
//! cornermark-core (this crate)
//!    ^
//!    |
//!    +-- cornermark-ops (compositor: grid, alpha, resample, paste)
//!    +-- cornermark-io  (PNG/JPEG decode and encode)
//!    +-- cornermark-cli (command-line shell)
//! ```
//!
//! The crate has no knowledge of files or formats. Decoding lives in
//! `cornermark-io`, pixel operations in `cornermark-ops`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod rect;

pub use error::{Error, Result};
pub use image::{PixelLayout, RasterImage};
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use cornermark_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{PixelLayout, RasterImage};
    pub use crate::rect::Rect;
}
