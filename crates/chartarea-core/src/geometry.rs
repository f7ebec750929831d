//! Geometric primitives for chart areas and hit regions.
//!
//! This module provides the fundamental geometric types used throughout
//! Chartarea for describing positions, sizes and bounding boxes of chart
//! elements.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in chart pixel space
//! - [`Size`] - Image and canvas extents
//! - [`Bounds`] - An axis-aligned box given by its four edges
//!
//! # Coordinate System
//!
//! The origin is the top-left pixel of the chart image, x grows to the right
//! and y grows downward.
//!
//! Coordinates are `f64` because bounds are transmitted as doubles and the
//! rendering engine reports sub-pixel positions.

use serde::Deserialize;

/// A 2D point representing a position in chart pixel space.
///
/// # Examples
///
/// ```
/// # use chartarea_core::geometry::Point;
/// let parent_origin = Point::new(50.0, 20.0);
/// let origin = Point::new(60.0, 100.0);
///
/// let position = origin.sub_point(parent_origin);
/// assert_eq!(position, Point::new(10.0, 80.0));
/// assert_eq!(parent_origin.add_point(position), origin);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Width and height of an image or layout canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates.
///
/// Containment is half-open: the minimum edges belong to the bounds, the
/// maximum edges do not. Two bounds sharing an edge therefore never both
/// contain a point on that edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates a new bounds from `x`, `y`, `width` and `height`, the order
    /// used whenever bounds are transmitted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartarea_core::geometry::Bounds;
    /// let bounds = Bounds::from_rect(10.0, 20.0, 30.0, 40.0);
    /// assert_eq!(bounds.max_x(), 40.0);
    /// assert_eq!(bounds.max_y(), 60.0);
    /// ```
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Creates a new bounds from its four edges
    pub fn from_edges(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner, the origin of an area.
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns true if the bounds enclose no area.
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Returns true if all four edges are zero.
    pub fn is_zero(self) -> bool {
        self == Self::default()
    }

    /// Returns true if the point lies inside the bounds.
    ///
    /// The maximum edges are excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartarea_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_rect(0.0, 0.0, 10.0, 10.0);
    /// assert!(bounds.contains(Point::new(0.0, 0.0)));
    /// assert!(bounds.contains(Point::new(9.99, 5.0)));
    /// assert!(!bounds.contains(Point::new(10.0, 5.0)));
    /// ```
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x && point.x < self.max_x && point.y >= self.min_y && point.y < self.max_y
    }

    /// Returns true if the two bounds share a region of positive area.
    pub fn intersects(self, other: Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartarea_core::geometry::Bounds;
    /// let label = Bounds::from_rect(0.0, 250.0, 40.0, 12.0);
    /// let line = Bounds::from_rect(10.0, 248.0, 300.0, 1.0);
    ///
    /// let axis = label.merge(&line);
    /// assert_eq!(axis.min_y(), 248.0);
    /// assert_eq!(axis.width(), 310.0);
    /// assert_eq!(axis.height(), 14.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Moves the bounds in the opposite direction of the specified offset
    pub fn inverse_translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x - offset.x,
            min_y: self.min_y - offset.y,
            max_x: self.max_x - offset.x,
            max_y: self.max_y - offset.y,
        }
    }

    /// Multiplies all four edges by independent horizontal and vertical factors.
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self {
            min_x: self.min_x * sx,
            min_y: self.min_y * sy,
            max_x: self.max_x * sx,
            max_y: self.max_y * sy,
        }
    }

    /// Widens the bounds about their center so that neither dimension is
    /// smaller than `min`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartarea_core::geometry::Bounds;
    /// let line = Bounds::from_rect(10.0, 10.0, 0.0, 20.0);
    /// let widened = line.expand_to_min(3.0);
    /// assert_eq!(widened.min_x(), 8.5);
    /// assert_eq!(widened.width(), 3.0);
    /// assert_eq!(widened.height(), 20.0);
    /// ```
    pub fn expand_to_min(&self, min: f64) -> Self {
        let mut bounds = *self;
        if bounds.width() < min {
            let center_x = (bounds.min_x + bounds.max_x) / 2.0;
            bounds.min_x = center_x - min / 2.0;
            bounds.max_x = center_x + min / 2.0;
        }
        if bounds.height() < min {
            let center_y = (bounds.min_y + bounds.max_y) / 2.0;
            bounds.min_y = center_y - min / 2.0;
            bounds.max_y = center_y + min / 2.0;
        }
        bounds
    }

    /// Sets the minimum y-coordinate and returns the modified bounds
    pub fn with_min_y(mut self, min_y: f64) -> Self {
        self.min_y = min_y;
        self
    }

    /// Sets the maximum x-coordinate and returns the modified bounds
    pub fn with_max_x(mut self, max_x: f64) -> Self {
        self.max_x = max_x;
        self
    }

    /// Sets the maximum y-coordinate and returns the modified bounds
    pub fn with_max_y(mut self, max_y: f64) -> Self {
        self.max_y = max_y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::default().hypot(), 0.0);
    }

    #[test]
    fn test_bounds_from_rect() {
        let bounds = Bounds::from_rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.width(), 30.0);
        assert_eq!(bounds.height(), 40.0);
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_bounds_contains_half_open() {
        let bounds = Bounds::from_rect(0.0, 0.0, 10.0, 10.0);
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(5.0, 9.999)));
        assert!(!bounds.contains(Point::new(10.0, 0.0)));
        assert!(!bounds.contains(Point::new(0.0, 10.0)));
        assert!(!bounds.contains(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn test_bounds_intersects_shared_edge() {
        let left = Bounds::from_rect(0.0, 0.0, 10.0, 10.0);
        let right = Bounds::from_rect(10.0, 0.0, 10.0, 10.0);
        let overlapping = Bounds::from_rect(9.0, 9.0, 5.0, 5.0);

        assert!(!left.intersects(right));
        assert!(left.intersects(overlapping));
        assert!(overlapping.intersects(left));
    }

    #[test]
    fn test_bounds_merge() {
        let merged = Bounds::from_edges(1.0, 2.0, 5.0, 6.0).merge(&Bounds::from_edges(3.0, 0.0, 8.0, 4.0));
        assert_eq!(merged, Bounds::from_edges(1.0, 0.0, 8.0, 6.0));
    }

    #[test]
    fn test_bounds_translate_roundtrip() {
        let bounds = Bounds::from_edges(1.0, 2.0, 5.0, 6.0);
        let offset = Point::new(3.0, -1.0);
        assert_eq!(bounds.translate(offset), Bounds::from_edges(4.0, 1.0, 8.0, 5.0));
        assert_eq!(bounds.translate(offset).inverse_translate(offset), bounds);
    }

    #[test]
    fn test_bounds_scale() {
        let bounds = Bounds::from_edges(10.0, 10.0, 20.0, 40.0);
        assert_eq!(bounds.scale(0.5, 2.0), Bounds::from_edges(5.0, 20.0, 10.0, 80.0));
    }

    #[test]
    fn test_bounds_expand_to_min_keeps_large_bounds() {
        let bounds = Bounds::from_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(bounds.expand_to_min(3.0), bounds);
    }

    #[test]
    fn test_bounds_expand_to_min_degenerate() {
        let point = Bounds::from_rect(5.0, 5.0, 0.0, 0.0);
        let expanded = point.expand_to_min(3.0);
        assert_eq!(expanded, Bounds::from_edges(3.5, 3.5, 6.5, 6.5));
    }

    #[test]
    fn test_bounds_empty_and_zero() {
        assert!(Bounds::default().is_empty());
        assert!(Bounds::default().is_zero());
        assert!(Bounds::from_rect(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!Bounds::from_rect(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::from_rect(x, y, w, h))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Merged bounds should contain both original bounds.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        prop_assert!(merged.min_x() <= b1.min_x() && merged.min_x() <= b2.min_x());
        prop_assert!(merged.min_y() <= b1.min_y() && merged.min_y() <= b2.min_y());
        prop_assert!(merged.max_x() >= b1.max_x() && merged.max_x() >= b2.max_x());
        prop_assert!(merged.max_y() >= b1.max_y() && merged.max_y() >= b2.max_y());
        Ok(())
    }

    /// Translating then inverse translating should return the original bounds.
    fn check_translate_inverse_roundtrip(
        bounds: Bounds,
        offset: Point,
    ) -> Result<(), TestCaseError> {
        let roundtrip = bounds.translate(offset).inverse_translate(offset);

        prop_assert!(approx_eq!(f64, roundtrip.min_x(), bounds.min_x(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, roundtrip.min_y(), bounds.min_y(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, roundtrip.max_x(), bounds.max_x(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, roundtrip.max_y(), bounds.max_y(), epsilon = 1e-9));
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn translate_inverse_roundtrip(bounds in bounds_strategy(), offset in point_strategy()) {
            check_translate_inverse_roundtrip(bounds, offset)?;
        }
    }
}
