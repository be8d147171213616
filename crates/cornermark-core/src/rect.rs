//! Placement rectangles.
//!
//! A [`Rect`] is stored as its four edges, the same `(left, top, right,
//! bottom)` tuple the compositor computes for each grid corner.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) is at the **top-left** corner of the base image
//! - `left`/`top` are inclusive, `right`/`bottom` are exclusive
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   (left,top)
//!   │       ┌──────────┐
//!   │       │   mark   │
//!   │       └──────────┘
//!   │             (right,bottom)
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cornermark_core::Rect;
//!
//! let rect = Rect::new(700, 560, 800, 640);
//! assert_eq!(rect.width(), 100);
//! assert_eq!(rect.height(), 80);
//! assert!(rect.contains(799, 639));
//! assert!(!rect.contains(800, 639));
//! ```

/// A rectangle given by its edges, in pixels.
///
/// # Invariants
///
/// - `left <= right` and `top <= bottom`; [`Rect::new`] normalizes swapped
///   edges
/// - A rectangle with zero width or height is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive)
    pub left: u32,
    /// Top edge (inclusive)
    pub top: u32,
    /// Right edge (exclusive)
    pub right: u32,
    /// Bottom edge (exclusive)
    pub bottom: u32,
}

impl Rect {
    /// Creates a rectangle from its edges.
    ///
    /// If an edge pair is swapped it is normalized.
    ///
    /// ```rust
    /// use cornermark_core::Rect;
    ///
    /// let rect = Rect::new(110, 70, 10, 20);
    /// assert_eq!(rect, Rect::new(10, 20, 110, 70));
    /// ```
    #[inline]
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Creates a rectangle at `(x, y)` with the given size.
    #[inline]
    pub const fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Creates a rectangle covering `width` x `height` from the origin.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::from_xywh(0, 0, width, height)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// `(width, height)` pair.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.left && px < self.right && py >= self.top && py < self.bottom
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    ///
    /// Empty rectangles never intersect anything.
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Returns the overlap of two rectangles, or `None` if they are disjoint.
    ///
    /// ```rust
    /// use cornermark_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 150, 150);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 100, 100)));
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Returns `true` if the rectangle lies inside a `width` x `height` image.
    #[inline]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }

    /// Returns the edges as a `(left, top, right, bottom)` tuple.
    #[inline]
    pub const fn to_tuple(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

impl From<(u32, u32, u32, u32)> for Rect {
    fn from((left, top, right, bottom): (u32, u32, u32, u32)) -> Self {
        Rect::new(left, top, right, bottom)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
