use crate::{
    geometry::{Bounds, Point},
    region::{HitTest, Outline, PolygonRegion},
};

/// Union of several polygons.
///
/// Used for elements drawn as several disjoint shapes, such as a donut slice
/// split across a label or a multi-part map feature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRegion {
    parts: Vec<PolygonRegion>,
}

impl CompositeRegion {
    pub fn new(parts: Vec<PolygonRegion>) -> Self {
        Self { parts }
    }

    /// Returns the polygons making up this region.
    pub fn parts(&self) -> &[PolygonRegion] {
        &self.parts
    }

    /// Returns a copy moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            parts: self.parts.iter().map(|part| part.translate(offset)).collect(),
        }
    }
}

impl HitTest for CompositeRegion {
    fn contains(&self, point: Point) -> bool {
        self.parts.iter().any(|part| part.contains(point))
    }

    fn intersects(&self, rect: Bounds) -> bool {
        self.parts.iter().any(|part| part.intersects(rect))
    }

    fn bounds(&self) -> Bounds {
        let mut iter = self.parts.iter().map(HitTest::bounds);
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        iter.fold(first, |acc, bounds| acc.merge(&bounds))
    }

    fn outline(&self) -> Outline {
        Outline::closed(self.parts.iter().map(PolygonRegion::points).collect())
    }
}
