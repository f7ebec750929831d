use crate::{
    geometry::{Bounds, Point},
    region::{HitTest, MIN_REGION_SIZE, Outline, segment_intersects_rect},
};

/// Line segment region with a stroke width.
///
/// A point is inside when its distance to the segment is at most half the
/// width. The width never drops below [`MIN_REGION_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRegion {
    from: Point,
    to: Point,
    width: f64,
}

impl LineRegion {
    pub fn new(from: Point, to: Point, width: f64) -> Self {
        Self {
            from,
            to,
            width: width.max(MIN_REGION_SIZE),
        }
    }

    /// Restores a line without the minimum-width correction.
    pub fn from_raw(from: Point, to: Point, width: f64) -> Self {
        Self { from, to, width }
    }

    pub fn start(&self) -> Point {
        self.from
    }

    pub fn end(&self) -> Point {
        self.to
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            from: self.from.add_point(offset),
            to: self.to.add_point(offset),
            width: self.width,
        }
    }

    fn distance_to(&self, point: Point) -> f64 {
        let segment = self.to.sub_point(self.from);
        let length_sq = segment.x() * segment.x() + segment.y() * segment.y();
        if length_sq == 0.0 {
            return point.sub_point(self.from).hypot();
        }
        let relative = point.sub_point(self.from);
        let t = ((relative.x() * segment.x() + relative.y() * segment.y()) / length_sq).clamp(0.0, 1.0);
        let projection = self.from.add_point(segment.scale(t));
        point.sub_point(projection).hypot()
    }
}

impl HitTest for LineRegion {
    fn contains(&self, point: Point) -> bool {
        self.distance_to(point) <= self.width / 2.0
    }

    fn intersects(&self, rect: Bounds) -> bool {
        let half = self.width / 2.0;
        let grown = Bounds::from_edges(
            rect.min_x() - half,
            rect.min_y() - half,
            rect.max_x() + half,
            rect.max_y() + half,
        );
        segment_intersects_rect(self.from, self.to, grown)
    }

    fn bounds(&self) -> Bounds {
        let half = self.width / 2.0;
        Bounds::from_edges(
            self.from.x().min(self.to.x()) - half,
            self.from.y().min(self.to.y()) - half,
            self.from.x().max(self.to.x()) + half,
            self.from.y().max(self.to.y()) + half,
        )
    }

    fn outline(&self) -> Outline {
        Outline::open(vec![vec![self.from, self.to]])
    }
}
