//! Integer geometry shared by the tree, layout managers and surfaces.
//!
//! All coordinates are in pixels. A component's [`Rect`] is expressed in its
//! parent's coordinate space; [`crate::ComponentTree::location_on_screen`]
//! folds the chain of parent offsets into screen space.

use std::ops::{Add, Sub};

/// A position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair. Never negative once it has passed through the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Dimension {
    /// A zero-sized dimension.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Creates a new dimension.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns this dimension with negative components clamped to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(0), self.height.max(0))
    }

    /// Grows the dimension by the given insets.
    #[must_use]
    pub const fn expand(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.horizontal(),
            self.height + insets.vertical(),
        )
    }
}

/// Space reserved inside a component's bounds for its border and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Space at the top edge.
    pub top: i32,
    /// Space at the left edge.
    pub left: i32,
    /// Space at the bottom edge.
    pub bottom: i32,
    /// Space at the right edge.
    pub right: i32,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self {
        top: 0,
        left: 0,
        bottom: 0,
        right: 0,
    };

    /// Creates insets in top, left, bottom, right order.
    #[must_use]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Creates equal insets on all four edges.
    #[must_use]
    pub const fn uniform(amount: i32) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    /// Sum of left and right.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// The smallest size that can hold these insets.
    #[must_use]
    pub const fn minimum_size(&self) -> Dimension {
        Dimension::new(self.horizontal(), self.vertical())
    }
}

/// A rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// X position (left edge).
    pub x: i32,
    /// Y position (top edge).
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from a location and a size.
    #[must_use]
    pub const fn from_parts(location: Point, size: Dimension) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    /// Returns the top-left corner.
    #[must_use]
    pub const fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the size.
    #[must_use]
    pub const fn size(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    /// Returns the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Shrinks the rectangle by the given insets. The size never goes negative.
    #[must_use]
    pub fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.horizontal()).max(0),
            (self.height - insets.vertical()).max(0),
        )
    }

    /// Shrinks the rectangle by the given amount on all sides.
    #[must_use]
    pub fn shrink(&self, amount: i32) -> Self {
        self.inset(Insets::uniform(amount))
    }
}
