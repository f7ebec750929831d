//! Hit-testable region primitives.
//!
//! This module provides the [`HitTest`] trait and the closed [`Region`] enum
//! used by every chart area to describe where it can be pointed at.
//!
//! # Overview
//!
//! - [`RectRegion`] - Axis-aligned rectangle with half-open edges
//! - [`PolygonRegion`] - Closed polygon stored at an integer coordinate scale
//! - [`EllipseRegion`] - Axis-aligned ellipse
//! - [`LineRegion`] - Line segment with a stroke width used as hit tolerance
//! - [`CompositeRegion`] - Union of several polygons (multi-part shapes)
//!
//! Regions narrower or shorter than [`MIN_REGION_SIZE`] are widened about
//! their centre when they are constructed so that they stay selectable.
//! Hit-testing itself never adjusts geometry.
//!
//! # Example
//!
//! ```
//! # use chartarea_core::geometry::{Bounds, Point};
//! # use chartarea_core::region::{HitTest, RectRegion, Region};
//! let region = Region::from(RectRegion::new(Bounds::from_rect(0.0, 0.0, 10.0, 0.0)));
//!
//! // The zero-height rectangle was widened to the minimum size.
//! assert_eq!(region.bounds().height(), 3.0);
//! assert!(region.contains(Point::new(5.0, 0.5)));
//! ```

use crate::geometry::{Bounds, Point};

mod composite;
mod ellipse;
mod line;
mod polygon;
mod rect;

pub use composite::CompositeRegion;
pub use ellipse::EllipseRegion;
pub use line::LineRegion;
pub use polygon::PolygonRegion;
pub use rect::RectRegion;

/// Minimum width and height, in pixels, of any region.
pub const MIN_REGION_SIZE: f64 = 3.0;

/// Geometry queries shared by every region primitive.
pub trait HitTest {
    /// Returns true if the point lies inside the region.
    fn contains(&self, point: Point) -> bool;

    /// Returns true if the region overlaps the rectangle.
    fn intersects(&self, rect: Bounds) -> bool;

    /// Returns the canonical bounding box.
    fn bounds(&self) -> Bounds;

    /// Returns the region's geometry as point contours.
    fn outline(&self) -> Outline;
}

/// Point contours describing a region's shape.
///
/// Closed outlines describe fillable shapes; open outlines describe strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    contours: Vec<Vec<Point>>,
    closed: bool,
}

impl Outline {
    /// Creates a closed outline from contours.
    pub fn closed(contours: Vec<Vec<Point>>) -> Self {
        Self {
            contours,
            closed: true,
        }
    }

    /// Creates an open outline from contours.
    pub fn open(contours: Vec<Vec<Point>>) -> Self {
        Self {
            contours,
            closed: false,
        }
    }

    /// Returns the contours.
    pub fn contours(&self) -> &[Vec<Point>] {
        &self.contours
    }

    /// Returns true if the contours are closed shapes.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Discriminates the [`Region`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Rect,
    Polygon,
    Ellipse,
    Line,
    Composite,
}

impl RegionKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Polygon => "polygon",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Composite => "composite",
        }
    }
}

/// A hit-testable shape attached to an area.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Rect(RectRegion),
    Polygon(PolygonRegion),
    Ellipse(EllipseRegion),
    Line(LineRegion),
    Composite(CompositeRegion),
}

impl Region {
    /// Returns the variant discriminator.
    pub fn kind(&self) -> RegionKind {
        match self {
            Self::Rect(_) => RegionKind::Rect,
            Self::Polygon(_) => RegionKind::Polygon,
            Self::Ellipse(_) => RegionKind::Ellipse,
            Self::Line(_) => RegionKind::Line,
            Self::Composite(_) => RegionKind::Composite,
        }
    }

    /// Returns a copy of this region moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        match self {
            Self::Rect(region) => Self::Rect(region.translate(offset)),
            Self::Polygon(region) => Self::Polygon(region.translate(offset)),
            Self::Ellipse(region) => Self::Ellipse(region.translate(offset)),
            Self::Line(region) => Self::Line(region.translate(offset)),
            Self::Composite(region) => Self::Composite(region.translate(offset)),
        }
    }

    /// Returns a copy of this region expressed relative to `origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        self.translate(Point::default().sub_point(origin))
    }

    fn as_hit_test(&self) -> &dyn HitTest {
        match self {
            Self::Rect(region) => region,
            Self::Polygon(region) => region,
            Self::Ellipse(region) => region,
            Self::Line(region) => region,
            Self::Composite(region) => region,
        }
    }
}

impl HitTest for Region {
    fn contains(&self, point: Point) -> bool {
        self.as_hit_test().contains(point)
    }

    fn intersects(&self, rect: Bounds) -> bool {
        self.as_hit_test().intersects(rect)
    }

    fn bounds(&self) -> Bounds {
        self.as_hit_test().bounds()
    }

    fn outline(&self) -> Outline {
        self.as_hit_test().outline()
    }
}

impl From<RectRegion> for Region {
    fn from(region: RectRegion) -> Self {
        Self::Rect(region)
    }
}

impl From<PolygonRegion> for Region {
    fn from(region: PolygonRegion) -> Self {
        Self::Polygon(region)
    }
}

impl From<EllipseRegion> for Region {
    fn from(region: EllipseRegion) -> Self {
        Self::Ellipse(region)
    }
}

impl From<LineRegion> for Region {
    fn from(region: LineRegion) -> Self {
        Self::Line(region)
    }
}

impl From<CompositeRegion> for Region {
    fn from(region: CompositeRegion) -> Self {
        Self::Composite(region)
    }
}

/// Returns the union of the bounds of all regions, or `None` for an empty
/// slice.
pub fn union_bounds(regions: &[Region]) -> Option<Bounds> {
    let mut iter = regions.iter().map(HitTest::bounds);
    let first = iter.next()?;
    Some(iter.fold(first, |acc, bounds| acc.merge(&bounds)))
}

// =============================================================================
// Shared geometry helpers
// =============================================================================

/// Returns the four corners of `rect` in clockwise order.
fn rect_corners(rect: Bounds) -> [Point; 4] {
    [
        Point::new(rect.min_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.max_y()),
        Point::new(rect.min_x(), rect.max_y()),
    ]
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x() >= a.x().min(b.x())
        && p.x() <= a.x().max(b.x())
        && p.y() >= a.y().min(b.y())
        && p.y() <= a.y().max(b.y())
}

/// Returns true if segments `a1-a2` and `b1-b2` touch or cross.
fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Returns true if the segment crosses any edge of `rect` or lies inside it.
fn segment_intersects_rect(a: Point, b: Point, rect: Bounds) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = rect_corners(rect);
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[Point], point: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let pi = points[i];
        let pj = points[j];
        if (pi.y() > point.y()) != (pj.y() > point.y()) {
            let x_at = (pj.x() - pi.x()) * (point.y() - pi.y()) / (pj.y() - pi.y()) + pi.x();
            if point.x() < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns true if the closed polygon overlaps `rect`.
fn polygon_intersects_rect(points: &[Point], rect: Bounds) -> bool {
    if points.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    if rect_corners(rect)
        .iter()
        .any(|corner| polygon_contains(points, *corner))
    {
        return true;
    }
    let count = points.len();
    (0..count).any(|i| segment_intersects_rect(points[i], points[(i + 1) % count], rect))
}

fn points_bounds(points: &[Point]) -> Bounds {
    let Some(first) = points.first() else {
        return Bounds::default();
    };
    points.iter().skip(1).fold(
        Bounds::from_edges(first.x(), first.y(), first.x(), first.y()),
        |acc, p| acc.merge(&Bounds::from_edges(p.x(), p.y(), p.x(), p.y())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_intersect() {
        let a1 = Point::new(0.0, 0.0);
        let a2 = Point::new(10.0, 10.0);
        assert!(segments_intersect(a1, a2, Point::new(0.0, 10.0), Point::new(10.0, 0.0)));
        assert!(!segments_intersect(a1, a2, Point::new(0.0, 1.0), Point::new(5.0, 6.0)));
        // Touching at an endpoint counts.
        assert!(segments_intersect(a1, a2, Point::new(10.0, 10.0), Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_polygon_contains_triangle() {
        let triangle = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(polygon_contains(&triangle, Point::new(2.0, 2.0)));
        assert!(!polygon_contains(&triangle, Point::new(8.0, 8.0)));
    }

    #[test]
    fn test_region_kind_dispatch() {
        let rect: Region = RectRegion::new(Bounds::from_rect(0.0, 0.0, 10.0, 10.0)).into();
        let ellipse: Region = EllipseRegion::new(Point::new(5.0, 5.0), 4.0, 4.0).into();

        assert_eq!(rect.kind(), RegionKind::Rect);
        assert_eq!(ellipse.kind(), RegionKind::Ellipse);
        assert_eq!(ellipse.kind().name(), "ellipse");
        assert!(rect.contains(Point::new(1.0, 1.0)));
        assert!(ellipse.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_relative_to_moves_against_origin() {
        let region: Region = RectRegion::new(Bounds::from_rect(50.0, 40.0, 10.0, 10.0)).into();
        let relative = region.relative_to(Point::new(50.0, 40.0));
        assert_eq!(relative.bounds(), Bounds::from_rect(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_union_bounds() {
        let regions = vec![
            Region::from(RectRegion::new(Bounds::from_rect(0.0, 0.0, 10.0, 10.0))),
            Region::from(RectRegion::new(Bounds::from_rect(20.0, 5.0, 10.0, 10.0))),
        ];
        assert_eq!(
            union_bounds(&regions),
            Some(Bounds::from_edges(0.0, 0.0, 30.0, 15.0))
        );
        assert_eq!(union_bounds(&[]), None);
    }
}
