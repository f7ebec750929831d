//! The interactive area tree.
//!
//! An [`Area`] is an addressable node wrapping one piece of the rendered
//! chart: the plot, an axis label, a legend item, a plotted element. Areas
//! form a tree rooted at a [`AreaKind::Content`] area covering the whole
//! image.
//!
//! # Coordinates
//!
//! An area's regions are expressed relative to the origin of its parent, and
//! its [`position`](Area::position) is the offset of its own origin (the
//! top-left corner of its bounds) from the parent origin. Moving a sub-tree
//! therefore only needs the position of its root to change.
//!
//! # Building
//!
//! Trees are built in two phases. [`AreaNode`]s are assembled bottom-up in
//! absolute image coordinates, then [`AreaNode::resolve`] produces the
//! immutable [`Area`] tree in one top-down pass. Partially positioned trees
//! are never observable.

mod grid;
mod kind;
mod node;

pub use grid::{Cell, GridIndex};
pub use kind::{AreaKind, Direction, Interaction};
pub use node::{AreaNode, Layout, infer_direction};

use chartarea_core::{
    geometry::{Bounds, Point},
    region::{HitTest, Region, union_bounds},
    z_order::ZOrder,
};

use crate::tooltip::{HyperlinkRef, Tooltip};

/// How an area arranges its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    /// No children.
    Leaf,
    /// Children in construction order.
    Container,
    /// Children sorted along a direction.
    Sorted(Direction),
    /// Children indexed by a spatial grid.
    Grid(GridIndex),
}

impl Composition {
    /// Returns the wire discriminator.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Leaf => 0,
            Self::Container => 1,
            Self::Sorted(_) => 2,
            Self::Grid(_) => 3,
        }
    }
}

/// A resolved node of the interactive area tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub(crate) kind: AreaKind,
    pub(crate) interaction: Interaction,
    pub(crate) z_order: ZOrder,
    pub(crate) position: Point,
    pub(crate) regions: Vec<Region>,
    pub(crate) light_weight: bool,
    pub(crate) label: i32,
    pub(crate) field: i32,
    pub(crate) value: i32,
    pub(crate) row: Option<u32>,
    pub(crate) col: Option<u32>,
    pub(crate) facet: Option<u32>,
    pub(crate) tooltip: Option<Tooltip>,
    pub(crate) hyperlinks: Vec<HyperlinkRef>,
    pub(crate) composition: Composition,
    pub(crate) children: Vec<Area>,
}

impl Area {
    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn z_order(&self) -> ZOrder {
        self.z_order
    }

    /// Returns the offset of this area's origin from its parent's origin.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the regions, relative to the parent's origin.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns the union of the regions, relative to the parent's origin.
    ///
    /// An area without regions reports zero-sized bounds at its position.
    pub fn bounds(&self) -> Bounds {
        union_bounds(&self.regions)
            .unwrap_or_else(|| Bounds::from_rect(self.position.x(), self.position.y(), 0.0, 0.0))
    }

    /// Returns true when hyperlink resolution was skipped for this area.
    pub fn is_light_weight(&self) -> bool {
        self.light_weight
    }

    /// Palette index of the displayed label.
    pub fn label(&self) -> i32 {
        self.label
    }

    /// Palette index of the bound field name.
    pub fn field(&self) -> i32 {
        self.field
    }

    /// Palette index of the raw value.
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn col(&self) -> Option<u32> {
        self.col
    }

    pub fn facet(&self) -> Option<u32> {
        self.facet
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn hyperlinks(&self) -> &[HyperlinkRef] {
        &self.hyperlinks
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn children(&self) -> &[Area] {
        &self.children
    }

    /// Returns the sort direction of a sorted container.
    pub fn direction(&self) -> Option<Direction> {
        match self.composition {
            Composition::Sorted(direction) => Some(direction),
            _ => None,
        }
    }

    /// Returns the number of areas in this sub-tree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Area::node_count).sum::<usize>()
    }

    /// Returns the regions moved into absolute coordinates, given the
    /// absolute origin of the parent.
    pub fn absolute_regions(&self, parent_origin: Point) -> Vec<Region> {
        self.regions
            .iter()
            .map(|region| region.translate(parent_origin))
            .collect()
    }

    /// Visits every area of the sub-tree in pre-order, together with the
    /// absolute origin of its parent.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Area, Point)) {
        self.walk_from(Point::default(), visit);
    }

    fn walk_from<'a>(&'a self, parent_origin: Point, visit: &mut impl FnMut(&'a Area, Point)) {
        visit(self, parent_origin);
        let origin = parent_origin.add_point(self.position);
        for child in &self.children {
            child.walk_from(origin, visit);
        }
    }

    /// Returns all areas of the sub-tree matching `predicate`, in pre-order.
    pub fn find_all(&self, predicate: impl Fn(&Area) -> bool) -> Vec<&Area> {
        let mut found = Vec::new();
        self.walk(&mut |area, _| {
            if predicate(area) {
                found.push(area);
            }
        });
        found
    }

    /// Returns the path from this area to the deepest area under `point`.
    ///
    /// `point` is given in the coordinate space of this area's parent (image
    /// coordinates for the root). The path is empty when the point misses
    /// this area. Grid-indexed containers only test the children listed in
    /// the cell under the point.
    pub fn hit_test(&self, point: Point) -> Vec<&Area> {
        let mut path = Vec::new();
        self.hit_test_into(point, &mut path);
        path
    }

    fn hit_test_into<'a>(&'a self, point: Point, path: &mut Vec<&'a Area>) -> bool {
        if !self.regions.iter().any(|region| region.contains(point)) {
            return false;
        }
        path.push(self);

        let local = point.sub_point(self.position);
        let candidates = match &self.composition {
            Composition::Grid(grid) => grid.candidates(local),
            _ => None,
        };
        match candidates {
            Some(indices) => {
                let mut children = indices
                    .iter()
                    .filter_map(|&index| self.children.get(index as usize));
                children.any(|child| child.hit_test_into(local, path));
            }
            None => {
                self.children
                    .iter()
                    .any(|child| child.hit_test_into(local, path));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use chartarea_core::region::RectRegion;

    use super::*;

    fn rect_node(kind: AreaKind, x: f64, y: f64, w: f64, h: f64) -> AreaNode {
        AreaNode::new(kind, vec![RectRegion::new(Bounds::from_rect(x, y, w, h)).into()])
    }

    fn chart() -> Area {
        let elements = vec![
            rect_node(AreaKind::Element, 60.0, 100.0, 20.0, 100.0).with_point(0, 0),
            rect_node(AreaKind::Element, 120.0, 50.0, 20.0, 150.0).with_point(1, 0),
            rect_node(AreaKind::Element, 260.0, 150.0, 20.0, 50.0).with_point(2, 0),
        ];
        let plot = rect_node(AreaKind::Plot, 50.0, 20.0, 300.0, 180.0)
            .with_children(Layout::Grid { columns: 3, rows: 3 }, elements);
        rect_node(AreaKind::Content, 0.0, 0.0, 400.0, 300.0)
            .with_children(Layout::Container, vec![plot])
            .resolve()
    }

    #[test]
    fn test_hit_test_path() {
        let chart = chart();
        let path = chart.hit_test(Point::new(125.0, 150.0));
        let kinds: Vec<AreaKind> = path.iter().map(|area| area.kind()).collect();
        assert_eq!(kinds, vec![AreaKind::Content, AreaKind::Plot, AreaKind::Element]);
        assert_eq!(path[2].row(), Some(1));
    }

    #[test]
    fn test_hit_test_misses() {
        let chart = chart();
        let path = chart.hit_test(Point::new(200.0, 30.0));
        assert_eq!(path.len(), 2);
        assert!(chart.hit_test(Point::new(500.0, 30.0)).is_empty());
    }

    #[test]
    fn test_walk_absolute_regions() {
        let chart = chart();
        let mut absolute = Vec::new();
        chart.walk(&mut |area, parent_origin| {
            if area.kind() == AreaKind::Element {
                absolute.push(area.absolute_regions(parent_origin)[0].bounds());
            }
        });
        assert_eq!(absolute[2], Bounds::from_rect(260.0, 150.0, 20.0, 50.0));
        assert_eq!(chart.node_count(), 5);
    }

    #[test]
    fn test_find_all() {
        let chart = chart();
        let elements = chart.find_all(|area| area.kind() == AreaKind::Element);
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_region_reads_are_stable() {
        let chart = chart();
        let plot = &chart.children()[0];
        assert_eq!(plot.bounds(), plot.bounds());
        assert_eq!(plot.regions(), plot.regions());
    }
}
