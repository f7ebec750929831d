use std::f64::consts::TAU;

use crate::{
    geometry::{Bounds, Point},
    region::{HitTest, MIN_REGION_SIZE, Outline},
};

/// Number of vertices used when an ellipse is flattened into an outline.
const OUTLINE_SEGMENTS: usize = 32;

/// Axis-aligned elliptical region, used for scatter marks and bubbles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseRegion {
    center: Point,
    radius_x: f64,
    radius_y: f64,
}

impl EllipseRegion {
    /// Creates an ellipse; radii below half of [`MIN_REGION_SIZE`] are
    /// raised to it.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        let min_radius = MIN_REGION_SIZE / 2.0;
        Self {
            center,
            radius_x: radius_x.max(min_radius),
            radius_y: radius_y.max(min_radius),
        }
    }

    /// Restores an ellipse without the minimum-size correction.
    pub fn from_raw(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            center: self.center.add_point(offset),
            ..*self
        }
    }

    fn normalized_distance(&self, point: Point) -> f64 {
        let dx = (point.x() - self.center.x()) / self.radius_x;
        let dy = (point.y() - self.center.y()) / self.radius_y;
        dx * dx + dy * dy
    }
}

impl HitTest for EllipseRegion {
    fn contains(&self, point: Point) -> bool {
        self.normalized_distance(point) <= 1.0
    }

    fn intersects(&self, rect: Bounds) -> bool {
        if !self.bounds().intersects(rect) {
            return false;
        }
        // Closest point of the rectangle to the centre.
        let closest = Point::new(
            self.center.x().clamp(rect.min_x(), rect.max_x()),
            self.center.y().clamp(rect.min_y(), rect.max_y()),
        );
        self.normalized_distance(closest) < 1.0
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_edges(
            self.center.x() - self.radius_x,
            self.center.y() - self.radius_y,
            self.center.x() + self.radius_x,
            self.center.y() + self.radius_y,
        )
    }

    fn outline(&self) -> Outline {
        let points = (0..OUTLINE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f64 / OUTLINE_SEGMENTS as f64;
                Point::new(
                    self.center.x() + self.radius_x * angle.cos(),
                    self.center.y() + self.radius_y * angle.sin(),
                )
            })
            .collect();
        Outline::closed(vec![points])
    }
}
