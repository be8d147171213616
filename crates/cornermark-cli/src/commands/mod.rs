//! CLI command implementations

pub mod apply;
pub mod batch;
pub mod grid;
pub mod preview;

use anyhow::{Context, Result};
use cornermark_core::RasterImage;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<RasterImage> {
    cornermark_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &RasterImage) -> Result<()> {
    cornermark_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}
