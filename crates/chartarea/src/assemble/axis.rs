use indexmap::IndexMap;
use log::trace;

use chartarea_core::geometry::{Bounds, Point};

use crate::{
    area::{AreaKind, AreaNode, Layout},
    assemble::{ChartAssembler, rect},
    bounds::BoundsCalculator,
    scene::{AxisInstance, AxisLabel, AxisSlot, ScaleKind, VisualScene},
};

/// Group key shared by all continuous axes of one facet.
const LINEAR_KEY: &str = "linear";

/// A categorical axis label placed in image coordinates.
#[derive(Debug, Clone)]
struct CategoryTick {
    facet: Option<u32>,
    horizontal: bool,
    center: Point,
    value: String,
}

/// Positions of the categorical axis labels of a chart.
///
/// Used to find the category of an element that carries no dimension value
/// of its own.
#[derive(Debug, Clone, Default)]
pub(super) struct CategoryMap {
    ticks: Vec<CategoryTick>,
}

impl CategoryMap {
    pub(super) fn build(scene: &VisualScene, bounds: &BoundsCalculator<'_>) -> Self {
        let ticks = scene
            .axes
            .iter()
            .filter(|axis| axis.scale == ScaleKind::Categorical)
            .flat_map(|axis| {
                axis.labels
                    .iter()
                    .filter(|label| label.visible)
                    .map(move |label| CategoryTick {
                        facet: axis.facet,
                        horizontal: axis.slot.is_horizontal(),
                        center: bounds.to_image(label.bounds).center(),
                        value: label.raw_value().to_string(),
                    })
            })
            .collect();
        Self { ticks }
    }

    pub(super) fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns the value of the categorical label nearest to `point` along
    /// its axis, preferring horizontal axes.
    pub(super) fn nearest(&self, facet: Option<u32>, point: Point) -> Option<&str> {
        let nearest_on = |horizontal: bool| {
            self.ticks
                .iter()
                .filter(|tick| tick.facet == facet && tick.horizontal == horizontal)
                .min_by(|a, b| {
                    distance(a, point).total_cmp(&distance(b, point))
                })
        };
        nearest_on(true)
            .or_else(|| nearest_on(false))
            .map(|tick| tick.value.as_str())
    }
}

fn distance(tick: &CategoryTick, point: Point) -> f64 {
    if tick.horizontal {
        (tick.center.x() - point.x()).abs()
    } else {
        (tick.center.y() - point.y()).abs()
    }
}

impl ChartAssembler<'_> {
    /// Builds the axis area of `slot`, or nothing when no axis instance in
    /// the slot draws a label or a line.
    pub(super) fn build_axis(&mut self, scene: &VisualScene, slot: AxisSlot) -> Option<AreaNode> {
        if !self.bounds.has_axis(slot) {
            trace!(slot = slot.name(); "No visible axis");
            return None;
        }

        let mut groups: IndexMap<(Option<u32>, String), Vec<&AxisInstance>> = IndexMap::new();
        for axis in scene.axes_in(slot).filter(|axis| axis.is_visible()) {
            let key = if axis.scale.is_continuous() {
                LINEAR_KEY.to_string()
            } else {
                axis.field.clone().unwrap_or_default()
            };
            groups.entry((axis.facet, key)).or_default().push(axis);
        }

        let mut children = Vec::with_capacity(groups.len());
        for ((facet, _), instances) in &groups {
            children.push(self.build_axis_group(*facet, instances));
        }
        if children.is_empty() {
            return None;
        }

        // Labels may overhang the axis zone; the axis region spans them too.
        let extent = children
            .iter()
            .map(AreaNode::bounds)
            .fold(self.bounds.axis_bounds(slot), |acc, bounds| acc.merge(&bounds));
        let node = AreaNode::new(AreaKind::Axis(slot), rect(extent))
            .with_children(Layout::Sorted, children);
        Some(node)
    }

    fn build_axis_group(&mut self, facet: Option<u32>, instances: &[&AxisInstance]) -> AreaNode {
        let tolerance = self.config.bounds().label_dedup_tolerance();
        let field = instances.iter().find_map(|axis| axis.field.as_deref());

        let mut placed: Vec<Bounds> = Vec::new();
        let mut labels = Vec::new();
        let mut lines = Vec::new();
        for axis in instances {
            for label in axis.labels.iter().filter(|label| label.visible) {
                let bounds = self.bounds.to_image(label.bounds);
                if placed
                    .iter()
                    .any(|other| same_position(*other, bounds, tolerance))
                {
                    trace!(label = label.text.as_str(); "Collapsed duplicate axis label");
                    continue;
                }
                placed.push(bounds);
                labels.push(self.build_axis_label(axis, label, bounds));
            }
            if let (true, Some(line)) = (axis.line_visible, axis.line_bounds) {
                lines.push(
                    AreaNode::new(AreaKind::AxisLine, rect(self.bounds.to_image(line)))
                        .with_field(self.palette.put_opt(field))
                        .with_facet(facet),
                );
            }
        }

        labels.extend(lines);
        let extent = instances
            .iter()
            .map(|axis| self.bounds.to_image(axis.bounds))
            .chain(labels.iter().map(AreaNode::bounds))
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();

        AreaNode::new(AreaKind::AxisGroup, rect(extent))
            .with_field(self.palette.put_opt(field))
            .with_facet(facet)
            .with_children(Layout::Sorted, labels)
    }

    fn build_axis_label(
        &mut self,
        axis: &AxisInstance,
        label: &AxisLabel,
        bounds: Bounds,
    ) -> AreaNode {
        let field = axis.field.as_deref();
        let raw = label.raw_value();
        let tooltip = self
            .tooltips
            .label_tooltip(field, raw, &label.text, &mut self.palette);

        AreaNode::new(AreaKind::AxisLabel, rect(bounds))
            .with_label(self.palette.put(&label.text))
            .with_field(self.palette.put_opt(field))
            .with_value(self.palette.put(raw))
            .with_facet(axis.facet)
            .with_tooltip(tooltip)
    }
}

/// Returns true when two labels sit at the same place within `tolerance`.
fn same_position(a: Bounds, b: Bounds, tolerance: f64) -> bool {
    let (a, b) = (a.center(), b.center());
    (a.x() - b.x()).abs() <= tolerance && (a.y() - b.y()).abs() <= tolerance
}
