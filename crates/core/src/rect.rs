//! Axis-aligned rectangle primitives.
//!
//! Coordinates follow screen conventions: `x` grows to the right and `y` grows
//! downward, so the "top" of a rectangle is `min_y` and the "bottom" is `max_y`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance for coordinate comparisons.
///
/// Comparisons scale it by the size of the rectangles involved, so a layout
/// measured in microns behaves like the same layout measured in meters.
pub const EPSILON: f64 = 1e-7;

/// One of the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// `min_x` edge.
    Left,
    /// `max_x` edge.
    Right,
    /// `min_y` edge.
    Top,
    /// `max_y` edge.
    Bottom,
}

impl Side {
    /// Returns the side facing this one across a shared edge.
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// All four sides, right and bottom first.
    pub const ALL: [Side; 4] = [Side::Right, Side::Bottom, Side::Left, Side::Top];
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Minimum x coordinate (left edge).
    pub min_x: f64,
    /// Minimum y coordinate (top edge).
    pub min_y: f64,
    /// Maximum x coordinate (right edge).
    pub max_x: f64,
    /// Maximum y coordinate (bottom edge).
    pub max_y: f64,
}

impl Rect {
    /// Creates a new rectangle from min/max coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the smallest rectangle enclosing every rectangle in the iterator.
    pub fn enclosing<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Self> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the shorter side.
    pub fn min_side(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Returns the longer side.
    pub fn max_side(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Tolerance for comparing this rectangle with `other`: [`EPSILON`] times
    /// the shortest side of the two.
    pub fn tolerance(&self, other: &Self) -> f64 {
        EPSILON * self.min_side().min(other.min_side())
    }

    /// Returns the center point.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns `max(w, h) / min(w, h)`, or infinity for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = (self.width(), self.height());
        let short = w.min(h);
        if short <= 0.0 {
            return f64::INFINITY;
        }
        w.max(h) / short
    }

    /// Returns the extent along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.height(),
        }
    }

    /// Returns the minimum coordinate along an axis.
    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_x,
            Axis::Y => self.min_y,
        }
    }

    /// Returns the maximum coordinate along an axis.
    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_x,
            Axis::Y => self.max_y,
        }
    }

    /// Length of the overlap of the two projections on an axis (negative when disjoint).
    pub fn overlap_along(&self, other: &Self, axis: Axis) -> f64 {
        self.max(axis).min(other.max(axis)) - self.min(axis).max(other.min(axis))
    }

    /// Checks if this rectangle contains a point (boundary inclusive).
    ///
    /// The boundary is widened by [`EPSILON`] times the longer side.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let tol = EPSILON * self.max_side();
        x >= self.min_x - tol
            && x <= self.max_x + tol
            && y >= self.min_y - tol
            && y <= self.max_y + tol
    }

    /// Checks if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Self) -> bool {
        let tol = EPSILON * self.max_side();
        other.min_x >= self.min_x - tol
            && other.max_x <= self.max_x + tol
            && other.min_y >= self.min_y - tol
            && other.max_y <= self.max_y + tol
    }

    /// Checks if the two rectangles overlap with positive area.
    ///
    /// Rectangles that merely share an edge or a corner do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        let tol = self.tolerance(other);
        self.overlap_along(other, Axis::X) > tol && self.overlap_along(other, Axis::Y) > tol
    }

    /// Returns the intersection of two rectangles, if they overlap with positive area.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        Some(Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Returns the union (bounding box) of two rectangles.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns this rectangle moved by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Returns the side of `self` that is in exact edge-to-edge contact with `other`.
    ///
    /// The shared segment must have positive length; touching at a single corner
    /// does not count.
    pub fn abutting_side(&self, other: &Self) -> Option<Side> {
        let tol = self.tolerance(other);
        if self.overlap_along(other, Axis::Y) > tol {
            if (self.max_x - other.min_x).abs() <= tol {
                return Some(Side::Right);
            }
            if (other.max_x - self.min_x).abs() <= tol {
                return Some(Side::Left);
            }
        }
        if self.overlap_along(other, Axis::X) > tol {
            if (self.max_y - other.min_y).abs() <= tol {
                return Some(Side::Bottom);
            }
            if (other.max_y - self.min_y).abs() <= tol {
                return Some(Side::Top);
            }
        }
        None
    }

    /// Checks if the two rectangles share an edge segment with zero gap and zero overlap.
    pub fn abuts(&self, other: &Self) -> bool {
        self.abutting_side(other).is_some()
    }

    /// Checks if the two rectangles touch along an edge or at a corner without overlapping.
    pub fn touches(&self, other: &Self) -> bool {
        let tol = self.tolerance(other);
        let ox = self.overlap_along(other, Axis::X);
        let oy = self.overlap_along(other, Axis::Y);
        ox >= -tol && oy >= -tol && !(ox > tol && oy > tol)
    }
}
