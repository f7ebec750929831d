use crate::{
    geometry::{Bounds, Point},
    region::{
        HitTest, MIN_REGION_SIZE, Outline, points_bounds, polygon_contains,
        polygon_intersects_rect, rect_corners,
    },
};

/// Closed polygon region.
///
/// Vertices are stored as integers at a coordinate scale factor, which keeps
/// sub-pixel precision for small, dense shapes (map polygons, thin slices)
/// while giving the wire format an exact representation. The factor is
/// divided out whenever vertices are read.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRegion {
    points: Vec<[i64; 2]>,
    scale: f64,
}

impl PolygonRegion {
    /// Creates a polygon at scale `1.0`.
    pub fn new(points: &[Point]) -> Self {
        Self::with_scale(points, 1.0)
    }

    /// Creates a polygon whose vertices are stored at `scale`.
    ///
    /// A polygon whose bounding box is narrower or shorter than
    /// [`MIN_REGION_SIZE`] is replaced by its widened bounding rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartarea_core::geometry::Point;
    /// # use chartarea_core::region::{HitTest, PolygonRegion};
    /// let square = [
    ///     Point::new(0.25, 0.25),
    ///     Point::new(10.25, 0.25),
    ///     Point::new(10.25, 10.25),
    ///     Point::new(0.25, 10.25),
    /// ];
    /// let polygon = PolygonRegion::with_scale(&square, 100.0);
    /// assert_eq!(polygon.points()[0], Point::new(0.25, 0.25));
    /// assert!(polygon.contains(Point::new(5.0, 5.0)));
    /// ```
    pub fn with_scale(points: &[Point], scale: f64) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let bounds = points_bounds(points);
        let source: Vec<Point> = if bounds.width() < MIN_REGION_SIZE || bounds.height() < MIN_REGION_SIZE {
            rect_corners(bounds.expand_to_min(MIN_REGION_SIZE)).to_vec()
        } else {
            points.to_vec()
        };
        let points = source
            .iter()
            .map(|p| [(p.x() * scale).round() as i64, (p.y() * scale).round() as i64])
            .collect();
        Self { points, scale }
    }

    /// Restores a polygon from stored integer vertices.
    pub fn from_raw(points: Vec<[i64; 2]>, scale: f64) -> Self {
        Self { points, scale }
    }

    /// Returns the vertices in pixel coordinates.
    pub fn points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|[x, y]| Point::new(*x as f64 / self.scale, *y as f64 / self.scale))
            .collect()
    }

    /// Returns the stored integer vertices.
    pub fn raw_points(&self) -> &[[i64; 2]] {
        &self.points
    }

    /// Returns the coordinate scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        let dx = (offset.x() * self.scale).round() as i64;
        let dy = (offset.y() * self.scale).round() as i64;
        Self {
            points: self.points.iter().map(|[x, y]| [x + dx, y + dy]).collect(),
            scale: self.scale,
        }
    }
}

impl HitTest for PolygonRegion {
    fn contains(&self, point: Point) -> bool {
        polygon_contains(&self.points(), point)
    }

    fn intersects(&self, rect: Bounds) -> bool {
        if !self.bounds().intersects(rect) {
            return false;
        }
        polygon_intersects_rect(&self.points(), rect)
    }

    fn bounds(&self) -> Bounds {
        points_bounds(&self.points())
    }

    fn outline(&self) -> Outline {
        Outline::closed(vec![self.points()])
    }
}
