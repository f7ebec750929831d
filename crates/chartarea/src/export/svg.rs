//! SVG overlay of the interactive regions of a chart.
//!
//! Every area becomes a `<g>` element carrying its kind in `data-kind` and,
//! when it has one, its tooltip text in `data-tooltip`. Regions are drawn as
//! outlines in absolute image coordinates, coloured by z-order, so the
//! overlay can be laid over the chart image to check region placement.

use std::fmt::Write;

use log::debug;
use svg::{
    Document,
    node::element::{Group, Path},
};

use chartarea_core::{
    geometry::Point,
    region::{HitTest, Outline},
    z_order::ZOrder,
};

use crate::{area::Area, assemble::AssembledChart};

/// Renders an [`AssembledChart`] as an SVG overlay.
#[derive(Debug, Clone)]
pub struct SvgOverlay {
    stroke_width: f64,
    tooltips: bool,
}

impl Default for SvgOverlay {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            tooltips: true,
        }
    }
}

impl SvgOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Sets whether tooltip texts are written as `data-tooltip` attributes.
    pub fn with_tooltips(mut self, tooltips: bool) -> Self {
        self.tooltips = tooltips;
        self
    }

    /// Builds the overlay document.
    pub fn render(&self, chart: &AssembledChart) -> Document {
        let root = chart.root();
        let bounds = root.bounds();
        let document = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.width(),
                    bounds.height()
                ),
            )
            .set("width", bounds.width())
            .set("height", bounds.height());

        let mut groups = 0;
        let group = self.render_area(chart, root, Point::default(), &mut groups);
        debug!(groups; "SVG overlay rendered");
        document.add(group)
    }

    /// Renders the overlay to an SVG string.
    pub fn render_to_string(&self, chart: &AssembledChart) -> String {
        self.render(chart).to_string()
    }

    fn render_area(
        &self,
        chart: &AssembledChart,
        area: &Area,
        parent_origin: Point,
        groups: &mut usize,
    ) -> Group {
        *groups += 1;
        let mut group = Group::new()
            .set("data-kind", area.kind().name())
            .set("class", format!("area {}", area.z_order().name()));
        if let (Some(row), Some(col)) = (area.row(), area.col()) {
            group = group.set("data-point", format!("{row},{col}"));
        }
        if self.tooltips {
            if let Some(tooltip) = area.tooltip() {
                group = group.set("data-tooltip", tooltip.to_text(chart.palette()));
            }
        }

        for region in area.absolute_regions(parent_origin) {
            let outline = region.outline();
            let Some(data) = path_data(&outline) else {
                continue;
            };
            let fill = if outline.is_closed() {
                stroke_color(area.z_order())
            } else {
                "none"
            };
            group = group.add(
                Path::new()
                    .set("d", data)
                    .set("fill", fill)
                    .set("fill-opacity", 0.1)
                    .set("stroke", stroke_color(area.z_order()))
                    .set("stroke-width", self.stroke_width),
            );
        }

        let origin = parent_origin.add_point(area.position());
        for child in area.children() {
            group = group.add(self.render_area(chart, child, origin, groups));
        }
        group
    }
}

fn stroke_color(z_order: ZOrder) -> &'static str {
    match z_order {
        ZOrder::Background => "#7f7f7f",
        ZOrder::Plot => "#1f77b4",
        ZOrder::Element => "#d62728",
        ZOrder::Axis => "#2ca02c",
        ZOrder::Title => "#9467bd",
        ZOrder::Legend => "#ff7f0e",
    }
}

/// Converts an outline into SVG path data, or `None` when it has no points.
fn path_data(outline: &Outline) -> Option<String> {
    let mut data = String::new();
    for contour in outline.contours() {
        let Some((first, rest)) = contour.split_first() else {
            continue;
        };
        let _ = write!(data, "M {} {}", first.x(), first.y());
        for point in rest {
            let _ = write!(data, " L {} {}", point.x(), point.y());
        }
        if outline.is_closed() {
            data.push_str(" Z");
        }
        data.push(' ');
    }
    let data = data.trim_end();
    (!data.is_empty()).then(|| data.to_string())
}
