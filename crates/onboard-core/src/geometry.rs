#![forbid(unsafe_code)]

//! Page-space geometric primitives.
//!
//! All values are CSS pixels. [`ClientRect`] is relative to the viewport (what
//! a layout engine reports for an element), [`PageRect`] is relative to the
//! document origin (what the overlay is positioned with).

/// An element's bounding box relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    /// Create a new viewport-relative rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Translate into document space using the current scroll offsets.
    #[inline]
    pub fn to_page(self, scroll: ScrollOffset) -> PageRect {
        PageRect::new(
            self.top + scroll.y,
            self.left + scroll.x,
            self.width,
            self.height,
        )
    }
}

/// Current document scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    /// Horizontal scroll (`pageXOffset`).
    pub x: f64,
    /// Vertical scroll (`pageYOffset`).
    pub y: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in document coordinates.
///
/// Origin at the top-left of the document; `top`/`left` may be negative once
/// padding pushes a target at the page edge outward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageRect {
    /// Top edge (inclusive).
    pub top: f64,
    /// Left edge (inclusive).
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PageRect {
    /// The empty rectangle at the origin. An overlay with this geometry
    /// occupies no space.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Grow the rectangle outward by `margin` on each side.
    pub fn outset(&self, margin: Sides) -> PageRect {
        PageRect {
            top: self.top - margin.top,
            left: self.left - margin.left,
            width: self.width + margin.horizontal_sum(),
            height: self.height + margin.vertical_sum(),
        }
    }
}

/// Sides for padding/margin, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

impl From<f64> for Sides {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}
