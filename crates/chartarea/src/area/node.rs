use chartarea_core::{
    geometry::{Bounds, Point},
    palette::NO_VALUE,
    region::{Region, union_bounds},
    z_order::ZOrder,
};

use crate::{
    area::{Area, AreaKind, Composition, Direction, GridIndex, Interaction},
    tooltip::{HyperlinkRef, Tooltip},
};

/// Distance under which the end of one sibling counts as the start of the
/// next when inferring a sort direction.
const EDGE_TOLERANCE: f64 = 1.0;

/// How a node arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Leaf,
    /// Children kept in construction order.
    Container,
    /// Children sorted along an inferred direction.
    Sorted,
    /// Children indexed by a grid of `columns × rows` cells.
    Grid { columns: usize, rows: usize },
}

/// First build phase of an area, in absolute image coordinates.
///
/// Nodes are assembled bottom-up and turned into an immutable [`Area`] tree
/// with one call to [`AreaNode::resolve`], which assigns every area its
/// parent-relative position and regions in a single top-down pass.
#[derive(Debug, Clone)]
pub struct AreaNode {
    kind: AreaKind,
    interaction: Interaction,
    z_order: ZOrder,
    regions: Vec<Region>,
    light_weight: bool,
    label: i32,
    field: i32,
    value: i32,
    row: Option<u32>,
    col: Option<u32>,
    facet: Option<u32>,
    tooltip: Option<Tooltip>,
    hyperlinks: Vec<HyperlinkRef>,
    layout: Layout,
    children: Vec<AreaNode>,
}

impl AreaNode {
    /// Creates a leaf node with the default interaction and z-order of
    /// `kind`.
    pub fn new(kind: AreaKind, regions: Vec<Region>) -> Self {
        Self {
            kind,
            interaction: kind.default_interaction(),
            z_order: kind.default_z_order(),
            regions,
            light_weight: false,
            label: NO_VALUE,
            field: NO_VALUE,
            value: NO_VALUE,
            row: None,
            col: None,
            facet: None,
            tooltip: None,
            hyperlinks: Vec::new(),
            layout: Layout::Leaf,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn children(&self) -> &[AreaNode] {
        &self.children
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_label(mut self, label: i32) -> Self {
        self.label = label;
        self
    }

    pub fn with_field(mut self, field: i32) -> Self {
        self.field = field;
        self
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// Sets the data point (row and column) behind the area.
    pub fn with_point(mut self, row: usize, col: usize) -> Self {
        self.row = u32::try_from(row).ok();
        self.col = u32::try_from(col).ok();
        self
    }

    pub fn with_facet(mut self, facet: Option<u32>) -> Self {
        self.facet = facet;
        self
    }

    pub fn with_light_weight(mut self, light_weight: bool) -> Self {
        self.light_weight = light_weight;
        self
    }

    pub fn with_tooltip(mut self, tooltip: Option<Tooltip>) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Attaches hyperlinks; a non-empty list adds the hyperlink interaction.
    pub fn with_hyperlinks(mut self, hyperlinks: Vec<HyperlinkRef>) -> Self {
        if !hyperlinks.is_empty() {
            self.interaction |= Interaction::HYPERLINK;
        }
        self.hyperlinks = hyperlinks;
        self
    }

    /// Attaches children arranged with `layout`.
    pub fn with_children(mut self, layout: Layout, children: Vec<AreaNode>) -> Self {
        self.layout = if children.is_empty() && layout == Layout::Container {
            Layout::Leaf
        } else {
            layout
        };
        self.children = children;
        self
    }

    /// Returns the absolute bounds of the node.
    ///
    /// A node without regions of its own spans its children.
    pub fn bounds(&self) -> Bounds {
        union_bounds(&self.regions)
            .or_else(|| {
                self.children
                    .iter()
                    .map(AreaNode::bounds)
                    .reduce(|acc, bounds| acc.merge(&bounds))
            })
            .unwrap_or_default()
    }

    /// Resolves the tree, placing the root at the image origin.
    pub fn resolve(self) -> Area {
        self.resolve_in(Point::default())
    }

    fn resolve_in(mut self, parent_origin: Point) -> Area {
        let bounds = self.bounds();
        let origin = bounds.min_point();

        let direction = if self.layout == Layout::Sorted {
            let child_bounds: Vec<Bounds> = self.children.iter().map(AreaNode::bounds).collect();
            let direction = infer_direction(&child_bounds);
            sort_children(&mut self.children, direction);
            Some(direction)
        } else {
            None
        };

        let children: Vec<Area> = self
            .children
            .into_iter()
            .map(|child| child.resolve_in(origin))
            .collect();

        let composition = match (self.layout, direction) {
            (Layout::Leaf, _) => Composition::Leaf,
            (Layout::Container, _) => Composition::Container,
            (Layout::Sorted, Some(direction)) => Composition::Sorted(direction),
            (Layout::Sorted, None) => Composition::Sorted(Direction::Vertical),
            (Layout::Grid { columns, rows }, _) => Composition::Grid(GridIndex::build(
                bounds.inverse_translate(origin),
                columns,
                rows,
                children.iter().map(|child| child.regions.as_slice()),
            )),
        };

        Area {
            kind: self.kind,
            interaction: self.interaction,
            z_order: self.z_order,
            position: origin.sub_point(parent_origin),
            regions: self
                .regions
                .iter()
                .map(|region| region.relative_to(parent_origin))
                .collect(),
            light_weight: self.light_weight,
            label: self.label,
            field: self.field,
            value: self.value,
            row: self.row,
            col: self.col,
            facet: self.facet,
            tooltip: self.tooltip,
            hyperlinks: self.hyperlinks,
            composition,
            children,
        }
    }
}

/// Infers the primary direction of siblings from the first two of them.
///
/// The direction is horizontal when one of the pair ends where the other
/// begins along x and they are not also separated along y. Everything else,
/// including fewer than two siblings, is vertical.
pub fn infer_direction(siblings: &[Bounds]) -> Direction {
    let [first, second, ..] = siblings else {
        return Direction::Vertical;
    };
    let apart_x = first.max_x() <= second.min_x() + EDGE_TOLERANCE
        || second.max_x() <= first.min_x() + EDGE_TOLERANCE;
    let apart_y = first.max_y() <= second.min_y() + EDGE_TOLERANCE
        || second.max_y() <= first.min_y() + EDGE_TOLERANCE;

    if apart_x && !apart_y {
        Direction::Horizontal
    } else {
        Direction::Vertical
    }
}

fn sort_children(children: &mut [AreaNode], direction: Direction) {
    let key = |node: &AreaNode| {
        let bounds = node.bounds();
        match direction {
            Direction::Horizontal => bounds.min_x(),
            Direction::Vertical => bounds.min_y(),
        }
    };
    children.sort_by(|a, b| key(a).total_cmp(&key(b)));
}
