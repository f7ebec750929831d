use log::debug;

use chartarea_core::{
    geometry::{Bounds, Point},
    region::{HitTest, PolygonRegion, Region},
};

use crate::{
    area::{Area, Composition},
    assemble::AssembledChart,
    tooltip::{HyperlinkRef, Tooltip},
    wire::schema::*,
};

/// Growable big-endian byte buffer.
#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a collection length or index.
    fn count(&mut self, value: usize) {
        self.u32(u32::try_from(value).unwrap_or(u32::MAX));
    }

    fn i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn point(&mut self, point: Point) {
        self.f64(point.x());
        self.f64(point.y());
    }

    fn rect(&mut self, bounds: Bounds) {
        self.f64(bounds.min_x());
        self.f64(bounds.min_y());
        self.f64(bounds.width());
        self.f64(bounds.height());
    }

    /// Writes a `u32` length prefix followed by whatever `body` writes.
    fn framed(&mut self, body: impl FnOnce(&mut Self)) {
        let start = self.buf.len();
        self.u32(0);
        body(self);
        let length = u32::try_from(self.buf.len() - start - 4).unwrap_or(u32::MAX);
        self.buf[start..start + 4].copy_from_slice(&length.to_be_bytes());
    }
}

/// Encodes an assembled chart into its binary form.
pub fn encode(chart: &AssembledChart) -> Vec<u8> {
    let mut out = Writer::default();
    out.buf.extend_from_slice(&MAGIC);
    out.u16(VERSION);
    out.framed(|out| {
        write_palette(out, chart);
        out.u8(if chart.is_partial() { CHART_PARTIAL } else { 0 });
        out.framed(|out| write_node(out, chart.root()));
        write_aux(out, chart);
    });
    debug!(bytes = out.buf.len(), areas = chart.root().node_count(); "Encoded chart areas");
    out.buf
}

fn write_palette(out: &mut Writer, chart: &AssembledChart) {
    out.count(chart.palette().len());
    for value in chart.palette().iter() {
        out.count(value.len());
        out.buf.extend_from_slice(value.as_bytes());
    }
}

fn write_aux(out: &mut Writer, chart: &AssembledChart) {
    out.count(chart.point_shapes().len());
    for (&(row, col), regions) in chart.point_shapes() {
        out.count(row);
        out.count(col);
        write_regions(out, regions);
    }

    out.count(chart.point_tooltips().len());
    for (&(row, col), &text) in chart.point_tooltips() {
        out.count(row);
        out.count(col);
        out.i32(text);
    }

    out.count(chart.shape_links().len());
    for link in chart.shape_links() {
        let (row, col) = link.point();
        out.count(row);
        out.count(col);
        out.count(link.shape());
        write_hyperlink(out, link.link());
    }
}

fn write_node(out: &mut Writer, area: &Area) {
    let kind = area.kind();
    out.u8(kind.tag());
    if let Some(slot) = kind.slot_byte() {
        out.u8(slot);
    }
    out.u8(area.z_order().as_u8());
    out.u16(area.interaction().bits());

    let mut flags = 0;
    if area.is_light_weight() {
        flags |= NODE_LIGHT_WEIGHT;
    }
    if area.row().is_some() {
        flags |= NODE_HAS_ROW;
    }
    if area.col().is_some() {
        flags |= NODE_HAS_COL;
    }
    if area.facet().is_some() {
        flags |= NODE_HAS_FACET;
    }
    if area.tooltip().is_some() {
        flags |= NODE_HAS_TOOLTIP;
    }
    out.u8(flags);

    out.point(area.position());
    out.i32(area.label());
    out.i32(area.field());
    out.i32(area.value());
    for value in [area.row(), area.col(), area.facet()].into_iter().flatten() {
        out.u32(value);
    }

    write_regions(out, area.regions());
    if let Some(tooltip) = area.tooltip() {
        write_tooltip(out, tooltip);
    }
    out.count(area.hyperlinks().len());
    for link in area.hyperlinks() {
        write_hyperlink(out, link);
    }
    write_composition(out, area.composition());

    out.count(area.children().len());
    for child in area.children() {
        out.framed(|out| write_node(out, child));
    }
}

fn write_regions(out: &mut Writer, regions: &[Region]) {
    out.count(regions.len());
    for region in regions {
        match region {
            Region::Rect(rect) => {
                out.u8(REGION_RECT);
                out.rect(rect.bounds());
            }
            Region::Polygon(polygon) => {
                out.u8(REGION_POLYGON);
                write_polygon(out, polygon);
            }
            Region::Ellipse(ellipse) => {
                out.u8(REGION_ELLIPSE);
                out.point(ellipse.center());
                out.f64(ellipse.radius_x());
                out.f64(ellipse.radius_y());
            }
            Region::Line(line) => {
                out.u8(REGION_LINE);
                out.point(line.start());
                out.point(line.end());
                out.f64(line.width());
            }
            Region::Composite(composite) => {
                out.u8(REGION_COMPOSITE);
                out.count(composite.parts().len());
                for part in composite.parts() {
                    write_polygon(out, part);
                }
            }
        }
    }
}

fn write_polygon(out: &mut Writer, polygon: &PolygonRegion) {
    out.f64(polygon.scale());
    out.count(polygon.raw_points().len());
    for &[x, y] in polygon.raw_points() {
        out.i64(x);
        out.i64(y);
    }
}

fn write_tooltip(out: &mut Writer, tooltip: &Tooltip) {
    out.i32(tooltip.custom());
    out.count(tooltip.entries().len());
    for entry in tooltip.entries() {
        out.i32(entry.key());
        out.i32(entry.value());
        let mut flags = 0;
        if entry.is_stack_total() {
            flags |= ENTRY_STACK_TOTAL;
        }
        if entry.is_dimension() {
            flags |= ENTRY_DIMENSION;
        }
        out.u8(flags);
    }
}

fn write_hyperlink(out: &mut Writer, link: &HyperlinkRef) {
    out.i32(link.label());
    out.i32(link.target());
    out.count(link.params().len());
    for &(name, value) in link.params() {
        out.i32(name);
        out.i32(value);
    }
}

fn write_composition(out: &mut Writer, composition: &Composition) {
    out.u8(composition.tag());
    match composition {
        Composition::Leaf | Composition::Container => {}
        Composition::Sorted(direction) => out.u8(direction.as_u8()),
        Composition::Grid(grid) => {
            out.u8(grid.columns());
            out.u8(grid.rows());
            out.rect(grid.bounds());
            for cell in grid.cells() {
                out.count(cell.len());
                for &index in cell {
                    out.u32(index);
                }
            }
        }
    }
}
