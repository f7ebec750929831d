//! Composition of a rendered scene into an interactive area tree.
//!
//! A [`ChartAssembler`] runs once per render. It walks the scene in a fixed
//! order, where later steps read zones resolved by earlier ones:
//!
//! 1. map categorical axis labels to image coordinates,
//! 2. the legend group,
//! 3. the plot and its elements,
//! 4. the top, bottom, left and right axes,
//! 5. the x, x2, y and y2 titles,
//! 6. the corner fills of a scrolling chart,
//! 7. the content root wrapping all of the above.
//!
//! Cancellation is checked between steps and between elements. A cancelled
//! pass still returns a well-formed tree holding whatever was built so far.

mod axis;
mod legend;
mod plot;

use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use log::{debug, info, warn};

use chartarea_core::{
    geometry::{Bounds, Point},
    palette::Palette,
    region::{RectRegion, Region},
};

use crate::{
    area::{Area, AreaKind, AreaNode, Layout},
    binding::Binding,
    bounds::BoundsCalculator,
    config::AppConfig,
    data::DataSet,
    format::ValueFormatter,
    scene::{AxisSlot, Corner, TitleSlot, VisualScene},
    tooltip::{HyperlinkRef, HyperlinkResolver, TooltipResolver},
};

use axis::CategoryMap;

/// External signal telling an assembly pass to stop early.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// A [`Cancellation`] that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A hyperlink attached to one shape of a multi-shape element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeLink {
    point: (usize, usize),
    shape: usize,
    link: HyperlinkRef,
}

impl ShapeLink {
    pub fn new(point: (usize, usize), shape: usize, link: HyperlinkRef) -> Self {
        Self { point, shape, link }
    }

    /// Returns the `(row, col)` of the element owning the shape.
    pub fn point(&self) -> (usize, usize) {
        self.point
    }

    /// Returns the index of the shape in the element's shape list.
    pub fn shape(&self) -> usize {
        self.shape
    }

    pub fn link(&self) -> &HyperlinkRef {
        &self.link
    }
}

/// The result of one assembly pass: the area tree, the palette its indices
/// refer to and the auxiliary lookup maps.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledChart {
    root: Area,
    palette: Palette,
    point_shapes: IndexMap<(usize, usize), Vec<Region>>,
    point_tooltips: IndexMap<(usize, usize), i32>,
    shape_links: Vec<ShapeLink>,
    partial: bool,
}

impl AssembledChart {
    pub(crate) fn from_parts(
        root: Area,
        palette: Palette,
        point_shapes: IndexMap<(usize, usize), Vec<Region>>,
        point_tooltips: IndexMap<(usize, usize), i32>,
        shape_links: Vec<ShapeLink>,
        partial: bool,
    ) -> Self {
        Self {
            root,
            palette,
            point_shapes,
            point_tooltips,
            shape_links,
            partial,
        }
    }

    /// Returns the content area at the root of the tree.
    pub fn root(&self) -> &Area {
        &self.root
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns the shapes of multi-shape elements, in image coordinates,
    /// keyed by `(row, col)`.
    pub fn point_shapes(&self) -> &IndexMap<(usize, usize), Vec<Region>> {
        &self.point_shapes
    }

    /// Returns the palette index of each element's tooltip text, keyed by
    /// `(row, col)`.
    pub fn point_tooltips(&self) -> &IndexMap<(usize, usize), i32> {
        &self.point_tooltips
    }

    pub fn shape_links(&self) -> &[ShapeLink] {
        &self.shape_links
    }

    /// Returns true when the pass was cancelled before completion.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Resolves a palette index to its text.
    pub fn text(&self, index: i32) -> Option<&str> {
        self.palette.get(index)
    }

    pub fn plot(&self) -> Option<&Area> {
        self.top_level(AreaKind::Plot)
    }

    pub fn legend(&self) -> Option<&Area> {
        self.top_level(AreaKind::LegendGroup)
    }

    /// Returns the axis area of `slot`; `None` means the axis is absent.
    pub fn axis(&self, slot: AxisSlot) -> Option<&Area> {
        self.top_level(AreaKind::Axis(slot))
    }

    /// Returns the axis groups of `slot` drawn in `facet`.
    pub fn axis_groups(&self, slot: AxisSlot, facet: Option<u32>) -> Vec<&Area> {
        self.axis(slot)
            .map(|axis| {
                axis.children()
                    .iter()
                    .filter(|group| group.kind() == AreaKind::AxisGroup && group.facet() == facet)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self, slot: TitleSlot) -> Option<&Area> {
        self.top_level(AreaKind::Title(slot))
    }

    pub fn corners(&self) -> Vec<&Area> {
        self.root
            .children()
            .iter()
            .filter(|area| matches!(area.kind(), AreaKind::Corner(_)))
            .collect()
    }

    /// Returns the path from the root to the deepest area under `point`,
    /// given in image coordinates.
    pub fn hit_test(&self, point: Point) -> Vec<&Area> {
        self.root.hit_test(point)
    }

    /// Returns the tooltip text of the element drawn for `(row, col)`.
    pub fn tooltip_text(&self, row: usize, col: usize) -> Option<&str> {
        self.point_tooltips
            .get(&(row, col))
            .and_then(|&index| self.palette.get(index))
    }

    fn top_level(&self, kind: AreaKind) -> Option<&Area> {
        self.root.children().iter().find(|area| area.kind() == kind)
    }
}

/// Per-render state of one assembly pass.
///
/// The palette, the formatter caches and the bounds caches all live here and
/// are dropped with the assembler.
pub struct ChartAssembler<'a> {
    scene: Option<&'a VisualScene>,
    data: &'a DataSet,
    binding: &'a Binding,
    config: &'a AppConfig,
    cancel: &'a dyn Cancellation,
    bounds: BoundsCalculator<'a>,
    tooltips: TooltipResolver<'a>,
    links: HyperlinkResolver<'a>,
    palette: Palette,
    categories: CategoryMap,
    point_shapes: IndexMap<(usize, usize), Vec<Region>>,
    point_tooltips: IndexMap<(usize, usize), i32>,
    shape_links: Vec<ShapeLink>,
    partial: bool,
}

impl<'a> ChartAssembler<'a> {
    pub fn new(
        scene: Option<&'a VisualScene>,
        data: &'a DataSet,
        binding: &'a Binding,
        config: &'a AppConfig,
        cancel: &'a dyn Cancellation,
    ) -> Self {
        Self {
            scene,
            data,
            binding,
            config,
            cancel,
            bounds: BoundsCalculator::new(scene, config.bounds()),
            tooltips: TooltipResolver::new(data, binding, config),
            links: HyperlinkResolver::new(
                data,
                binding,
                ValueFormatter::from_config(config.tooltip()),
            ),
            palette: Palette::new(),
            categories: CategoryMap::default(),
            point_shapes: IndexMap::new(),
            point_tooltips: IndexMap::new(),
            shape_links: Vec::new(),
            partial: false,
        }
    }

    /// Runs the pass and returns the assembled chart.
    pub fn assemble(mut self) -> AssembledChart {
        let Some(scene) = self.scene else {
            debug!("No scene, assembling an empty chart");
            return self.finish(Vec::new());
        };
        info!(
            elements = scene.elements.len(),
            axes = scene.axes.len(),
            faceted = scene.is_faceted(),
            scrolling = scene.is_scrolling();
            "Assembling chart areas"
        );

        let mut children = Vec::new();
        self.categories = CategoryMap::build(scene, &self.bounds);
        debug!(categories = self.categories.len(); "Mapped categorical axes");

        if self.cancelled("legend") {
            return self.finish(children);
        }
        if let Some(legend) = self.build_legend(scene) {
            debug!(legends = legend.children().len(); "Built legend group");
            children.push(legend);
        }

        if self.cancelled("plot") {
            return self.finish(children);
        }
        let plot = self.build_plot(scene);
        debug!(elements = plot.children().len(); "Built plot");
        children.push(plot);

        for slot in AxisSlot::ALL {
            if self.cancelled("axes") {
                return self.finish(children);
            }
            if let Some(axis) = self.build_axis(scene, slot) {
                debug!(slot = slot.name(), groups = axis.children().len(); "Built axis");
                children.push(axis);
            }
        }

        if self.cancelled("titles") {
            return self.finish(children);
        }
        for slot in TitleSlot::ALL {
            if let Some(title) = self.build_title(scene, slot) {
                children.push(title);
            }
        }

        if scene.is_scrolling() {
            for corner in Corner::ALL {
                let bounds = self.bounds.corner_bounds(corner);
                if !bounds.is_empty() {
                    children.push(AreaNode::new(AreaKind::Corner(corner), rect(bounds)));
                }
            }
        }

        self.finish(children)
    }

    fn build_title(&mut self, scene: &VisualScene, slot: TitleSlot) -> Option<AreaNode> {
        if !self.bounds.has_title_area(slot) {
            return None;
        }
        let node = AreaNode::new(AreaKind::Title(slot), rect(self.bounds.title_bounds(slot)));
        Some(match scene.title(slot) {
            Some(title) => node.with_label(self.palette.put(&title.text)),
            None => node,
        })
    }

    /// Returns true, and marks the result partial, once cancellation fired.
    fn cancelled(&mut self, step: &str) -> bool {
        if !self.partial && self.cancel.is_cancelled() {
            warn!(step; "Chart assembly cancelled");
            self.partial = true;
        }
        self.partial
    }

    fn finish(self, children: Vec<AreaNode>) -> AssembledChart {
        let content = self.bounds.content_bounds();
        let regions = if self.scene.is_some() {
            rect(content)
        } else {
            Vec::new()
        };
        let root = AreaNode::new(AreaKind::Content, regions)
            .with_children(Layout::Container, children)
            .resolve();

        info!(
            areas = root.node_count(),
            palette = self.palette.len(),
            partial = self.partial;
            "Chart areas assembled"
        );
        AssembledChart {
            root,
            palette: self.palette,
            point_shapes: self.point_shapes,
            point_tooltips: self.point_tooltips,
            shape_links: self.shape_links,
            partial: self.partial,
        }
    }
}

/// Wraps a rectangle as a single-region list.
fn rect(bounds: Bounds) -> Vec<Region> {
    vec![RectRegion::new(bounds).into()]
}

#[cfg(test)]
mod tests {
    use chartarea_core::geometry::Size;

    use super::*;
    use crate::{
        data::Field,
        scene::{AxisInstance, AxisLabel, Edges, PlotElement, SceneShape, Scroll, TitleLabel},
    };

    fn scene() -> VisualScene {
        let mut scene = VisualScene::new(
            Size::new(400.0, 300.0),
            Bounds::from_rect(50.0, 20.0, 300.0, 230.0),
        );
        let mut x_axis = AxisInstance::new(AxisSlot::Bottom, Bounds::from_rect(50.0, 250.0, 300.0, 20.0));
        x_axis.field = Some("region".to_string());
        x_axis.labels = vec![
            AxisLabel::new("East", Bounds::from_rect(90.0, 255.0, 30.0, 10.0)),
            AxisLabel::new("West", Bounds::from_rect(240.0, 255.0, 30.0, 10.0)),
        ];
        scene.axes.push(x_axis);
        scene.titles.push(TitleLabel {
            slot: TitleSlot::X,
            text: "Region".to_string(),
            bounds: Bounds::from_rect(150.0, 275.0, 100.0, 20.0),
        });

        for (row, x) in [(0, 90.0), (1, 240.0)] {
            let mut element = PlotElement::new(row, 0);
            element.dimensions = vec!["region".to_string()];
            element.measure = Some("sales".to_string());
            element.shapes = vec![SceneShape::Rect {
                bounds: Bounds::from_rect(x, 100.0, 30.0, 150.0),
            }];
            scene.elements.push(element);
        }
        scene
    }

    fn data() -> DataSet {
        DataSet::new()
            .with_field(Field::dimension("region"))
            .with_field(Field::measure("sales"))
            .with_row(vec!["East".into(), 10.0.into()])
            .with_row(vec!["West".into(), 20.0.into()])
    }

    #[test]
    fn test_composition_order() {
        let (scene, data, binding, config) = (scene(), data(), Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        let kinds: Vec<AreaKind> = chart.root().children().iter().map(Area::kind).collect();
        assert_eq!(
            kinds,
            vec![
                AreaKind::Plot,
                AreaKind::Axis(AxisSlot::Bottom),
                AreaKind::Title(TitleSlot::X),
            ]
        );
        assert!(!chart.is_partial());
        assert!(chart.axis(AxisSlot::Left).is_none());
        assert_eq!(chart.tooltip_text(1, 0), Some("region: West\nsales: 20"));
    }

    #[test]
    fn test_null_scene() {
        let (data, binding, config) = (data(), Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(None, &data, &binding, &config, &NeverCancel).assemble();

        assert!(chart.root().children().is_empty());
        assert!(chart.root().regions().is_empty());
        assert!(chart.plot().is_none());
    }

    #[test]
    fn test_cancelled_pass_is_partial() {
        let (scene, data, binding, config) = (scene(), data(), Binding::new(), AppConfig::default());
        let cancel = AtomicBool::new(true);
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &cancel).assemble();

        assert!(chart.is_partial());
        assert!(chart.root().children().is_empty());
        assert_eq!(chart.root().kind(), AreaKind::Content);
    }

    #[test]
    fn test_hit_test_reaches_element() {
        let (scene, data, binding, config) = (scene(), data(), Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        let path = chart.hit_test(Point::new(100.0, 200.0));
        let last = path.last().expect("element hit");
        assert_eq!(last.kind(), AreaKind::Element);
        assert_eq!(last.row(), Some(0));
    }

    #[test]
    fn test_scrolling_chart_has_corners() {
        let mut scene = scene();
        scene.layout_size = Some(Size::new(800.0, 300.0));
        scene.scroll = Scroll {
            horizontal: true,
            vertical: false,
        };
        scene.borders = Edges::default();
        let (data, binding, config) = (data(), Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        assert!(!chart.corners().is_empty());
        assert!(
            chart
                .corners()
                .iter()
                .all(|corner| matches!(corner.kind(), AreaKind::Corner(_)))
        );
    }
}
