//! Placement grid and corner geometry.
//!
//! The base image is divided into an N×N grid (N = "squares"). The mark is
//! scaled to exactly one cell and placed in one of the four corner cells.
//!
//! ```text
//!  0        cw      cw·(N-1)   cw·N  width
//!  ┌────────┬── ··· ──┬────────┐ ┊
//!  │  TL    │         │   TR   │ ┊
//!  ├────────┤         ├────────┤ ch
//!  ┊                           ┊ ┊
//!  ├────────┤         ├────────┤ ch·(N-1)
//!  │  BL    │         │   BR   │ ┊
//!  └────────┴── ··· ──┴────────┘ ch·N
//!                                ┊ remainder rows ignored
//! ```
//!
//! Cell sizes use floor division, so up to `N - 1` columns and rows on the
//! right and bottom edges never belong to any cell.
//!
//! # Example
//!
//! ```rust
//! use cornermark_ops::grid::{Corner, PlacementGrid};
//! use cornermark_core::Rect;
//!
//! let grid = PlacementGrid::new(800, 640, 8).unwrap();
//! assert_eq!(grid.cell_size(), (100, 80));
//! assert_eq!(grid.corner_rect(Corner::BottomRight), Rect::new(700, 560, 800, 640));
//! ```

use crate::{OpsError, OpsResult};
use cornermark_core::Rect;
use std::str::FromStr;

/// Grid divisor used when none is configured.
pub const DEFAULT_SQUARES: u32 = 8;

/// One of the four corner cells of the grid.
///
/// The numeric index is the position index callers pass to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Index 0.
    TopLeft,
    /// Index 1.
    TopRight,
    /// Index 2.
    BottomLeft,
    /// Index 3.
    BottomRight,
}

impl Corner {
    /// All corners in index order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Maps a 0-based position index to a corner.
    ///
    /// Anything outside `0..=3` is rejected; indices never wrap.
    pub fn from_index(index: usize) -> OpsResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| OpsError::InvalidPosition(format!("{index} (expected 0..=3)")))
    }

    /// Maps a 1-based position number (1..=4) to a corner.
    pub fn from_one_based(number: usize) -> OpsResult<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| OpsError::InvalidPosition(format!("{number} (expected 1..=4)")))
    }

    /// 0-based position index.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// Kebab-case name, e.g. `top-left`.
    pub const fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    #[inline]
    const fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    #[inline]
    const fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses corner names and 1-based numbers.
///
/// Accepted: `tl`, `tr`, `bl`, `br`, `top-left` (and `top_left`,
/// `topleft`), ..., and `1`–`4`.
impl FromStr for Corner {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "tl" | "top-left" | "topleft" => Ok(Corner::TopLeft),
            "tr" | "top-right" | "topright" => Ok(Corner::TopRight),
            "bl" | "bottom-left" | "bottomleft" => Ok(Corner::BottomLeft),
            "br" | "bottom-right" | "bottomright" => Ok(Corner::BottomRight),
            _ => match key.parse::<usize>() {
                Ok(n) => Corner::from_one_based(n),
                Err(_) => Err(OpsError::InvalidPosition(format!(
                    "'{s}' (expected tl, tr, bl, br or 1..=4)"
                ))),
            },
        }
    }
}

/// Rectangle of a corner cell for cell size `(cw, ch)` in an `n`×`n` grid.
///
/// Pure function of its inputs:
///
/// | corner | rectangle |
/// |--------|-----------|
/// | top-left | `(0, 0, cw, ch)` |
/// | top-right | `(cw·(n−1), 0, cw·n, ch)` |
/// | bottom-left | `(0, ch·(n−1), cw, ch·n)` |
/// | bottom-right | `(cw·(n−1), ch·(n−1), cw·n, ch·n)` |
///
/// Returns `None` when `cw·n` or `ch·n` does not fit in a `u32`.
pub fn corner_rect(corner: Corner, cw: u32, ch: u32, n: u32) -> Option<Rect> {
    let last = n.saturating_sub(1);
    let left = if corner.is_right() { cw.checked_mul(last)? } else { 0 };
    let top = if corner.is_bottom() { ch.checked_mul(last)? } else { 0 };
    Some(Rect {
        left,
        top,
        right: left.checked_add(cw)?,
        bottom: top.checked_add(ch)?,
    })
}

/// N×N division of a base image.
///
/// Derived per call from the base dimensions; never stored between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementGrid {
    squares: u32,
    cell_width: u32,
    cell_height: u32,
    rects: [Rect; 4],
}

impl PlacementGrid {
    /// Builds the grid for a `width` x `height` image.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidGrid`] if `squares < 2`
    /// - [`OpsError::DimensionTooSmall`] if either cell dimension is zero,
    ///   i.e. the image is narrower or shorter than `squares` pixels
    pub fn new(width: u32, height: u32, squares: u32) -> OpsResult<Self> {
        if squares < 2 {
            return Err(OpsError::InvalidGrid(squares));
        }
        let cell_width = width / squares;
        let cell_height = height / squares;
        if cell_width == 0 || cell_height == 0 {
            return Err(OpsError::DimensionTooSmall {
                width,
                height,
                squares,
            });
        }
        // cw·N <= width, so the corner arithmetic cannot overflow here
        let mut rects = [Rect::default(); 4];
        for (slot, corner) in rects.iter_mut().zip(Corner::ALL) {
            *slot = corner_rect(corner, cell_width, cell_height, squares).ok_or(
                OpsError::DimensionTooSmall {
                    width,
                    height,
                    squares,
                },
            )?;
        }
        Ok(Self {
            squares,
            cell_width,
            cell_height,
            rects,
        })
    }

    /// Grid divisor N.
    #[inline]
    pub fn squares(&self) -> u32 {
        self.squares
    }

    /// `(cw, ch)`: the size the mark is scaled to.
    #[inline]
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Rectangle of the given corner cell.
    #[inline]
    pub fn corner_rect(&self, corner: Corner) -> Rect {
        self.rects[corner.index()]
    }

    /// All four corner rectangles in index order.
    pub fn corners(&self) -> [(Corner, Rect); 4] {
        Corner::ALL.map(|c| (c, self.corner_rect(c)))
    }

    /// Area covered by whole cells, `(0, 0, cw·N, ch·N)`.
    #[inline]
    pub fn covered(&self) -> Rect {
        Rect::from_size(
            self.cell_width * self.squares,
            self.cell_height * self.squares,
        )
    }
}
