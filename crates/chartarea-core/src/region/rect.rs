use log::trace;

use crate::{
    geometry::{Bounds, Point},
    region::{HitTest, MIN_REGION_SIZE, Outline, rect_corners},
};

/// Axis-aligned rectangular region.
///
/// Containment is half-open: points on the maximum edges are outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRegion {
    bounds: Bounds,
}

impl RectRegion {
    /// Creates a rectangle, widening degenerate dimensions to
    /// [`MIN_REGION_SIZE`].
    pub fn new(bounds: Bounds) -> Self {
        let widened = bounds.expand_to_min(MIN_REGION_SIZE);
        if widened != bounds {
            trace!(width = bounds.width(), height = bounds.height(); "Widened degenerate rectangle");
        }
        Self { bounds: widened }
    }

    /// Creates a rectangle from already-validated bounds, skipping the
    /// minimum-size correction. Used when restoring decoded regions.
    pub fn from_raw(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            bounds: self.bounds.translate(offset),
        }
    }
}

impl HitTest for RectRegion {
    fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    fn intersects(&self, rect: Bounds) -> bool {
        self.bounds.intersects(rect)
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn outline(&self) -> Outline {
        Outline::closed(vec![rect_corners(self.bounds).to_vec()])
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Points strictly inside a rectangle's bounding box are contained; points
    /// on the max edge are not.
    fn check_rect_containment(
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fx: f64,
        fy: f64,
    ) -> Result<(), TestCaseError> {
        let rect = RectRegion::new(Bounds::from_rect(x, y, w, h));
        let bounds = rect.bounds();
        let inside = Point::new(
            bounds.min_x() + bounds.width() * fx,
            bounds.min_y() + bounds.height() * fy,
        );
        prop_assert!(rect.contains(inside));
        prop_assert!(!rect.contains(Point::new(bounds.max_x(), inside.y())));
        prop_assert!(!rect.contains(Point::new(inside.x(), bounds.max_y())));
        Ok(())
    }

    proptest! {
        #[test]
        fn rect_containment(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            w in 0.0f64..300.0,
            h in 0.0f64..300.0,
            fx in 0.01f64..0.99,
            fy in 0.01f64..0.99,
        ) {
            check_rect_containment(x, y, w, h, fx, fy)?;
        }
    }
}
