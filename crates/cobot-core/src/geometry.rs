#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Browser geometry is fractional (`getBoundingClientRect` returns doubles),
//! so everything here is `f64`. Values are never assumed to be finite; the
//! consumers decide how to treat `NaN` and infinities.

use serde::{Deserialize, Serialize};

/// A point in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    /// Translate by another point treated as a vector.
    #[inline]
    #[must_use]
    pub fn offset(self, by: Self) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not a number.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A rectangle for element boxes and reference regions.
///
/// Origin at top-left, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Box dimensions.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Horizontal extent of this rectangle.
    #[inline]
    #[must_use]
    pub const fn horizontal_span(&self) -> Span {
        Span::new(self.x, self.width)
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// A one-dimensional extent along the sequence track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub length: f64,
}

impl Span {
    /// Create a new span.
    #[inline]
    #[must_use]
    pub const fn new(start: f64, length: f64) -> Self {
        Self { start, length }
    }

    /// Midpoint of the span.
    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.start + self.length / 2.0
    }

    /// End of the span (exclusive).
    #[inline]
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}
