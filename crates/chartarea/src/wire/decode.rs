use indexmap::{IndexMap, IndexSet};
use log::debug;

use chartarea_core::{
    geometry::{Bounds, Point},
    palette::Palette,
    region::{
        CompositeRegion, EllipseRegion, LineRegion, PolygonRegion, RectRegion, Region,
    },
    z_order::ZOrder,
};

use crate::{
    area::{Area, AreaKind, Cell, Composition, Direction, GridIndex, Interaction},
    assemble::{AssembledChart, ShapeLink},
    error::DecodeError,
    tooltip::{HyperlinkRef, Tooltip, TooltipEntry},
    wire::schema::*,
};

/// Cursor over a big-endian byte slice.
///
/// `base` is the offset of `bytes` in the whole stream, so errors report
/// absolute positions even inside length-prefixed frames.
struct Reader<'b> {
    bytes: &'b [u8],
    pos: usize,
    base: usize,
}

impl<'b> Reader<'b> {
    fn new(bytes: &'b [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'b [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEnd(self.base + self.bytes.len()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn count(&mut self) -> Result<usize, DecodeError> {
        Ok(self.u32()? as usize)
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.array()?))
    }

    fn f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    fn point(&mut self) -> Result<Point, DecodeError> {
        Ok(Point::new(self.f64()?, self.f64()?))
    }

    fn rect(&mut self) -> Result<Bounds, DecodeError> {
        let (x, y) = (self.f64()?, self.f64()?);
        let (width, height) = (self.f64()?, self.f64()?);
        Ok(Bounds::from_rect(x, y, width, height))
    }

    fn optional(&mut self, present: bool) -> Result<Option<u32>, DecodeError> {
        if present { self.u32().map(Some) } else { Ok(None) }
    }

    /// Splits off a `u32` length-prefixed frame.
    fn framed(&mut self) -> Result<Reader<'b>, DecodeError> {
        let length = self.count()?;
        let base = self.base + self.pos;
        let bytes = self.take(length)?;
        Ok(Reader {
            bytes,
            pos: 0,
            base,
        })
    }

    /// Fails unless the whole frame was consumed.
    fn finish(&self) -> Result<(), DecodeError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(DecodeError::LengthMismatch {
                declared: self.bytes.len(),
                actual: self.pos,
            })
        }
    }
}

/// Decodes a chart written by [`encode`](super::encode).
///
/// # Errors
///
/// Returns a [`DecodeError`] when the header is wrong, the data ends early, a
/// length prefix disagrees with its payload, or a tag is unknown.
pub fn decode(bytes: &[u8]) -> Result<AssembledChart, DecodeError> {
    let mut input = Reader::new(bytes);
    if input.array::<4>()? != MAGIC {
        return Err(DecodeError::InvalidMagic);
    }
    let version = input.u16()?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let declared = input.count()?;
    if declared != input.remaining() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: input.remaining(),
        });
    }

    let palette = read_palette(&mut input)?;
    let partial = input.u8()? & CHART_PARTIAL != 0;

    let mut frame = input.framed()?;
    let root = read_node(&mut frame)?;
    frame.finish()?;

    let mut point_shapes = IndexMap::new();
    for _ in 0..input.count()? {
        let point = (input.count()?, input.count()?);
        point_shapes.insert(point, read_regions(&mut input)?);
    }

    let mut point_tooltips = IndexMap::new();
    for _ in 0..input.count()? {
        let point = (input.count()?, input.count()?);
        point_tooltips.insert(point, input.i32()?);
    }

    let mut shape_links = Vec::new();
    for _ in 0..input.count()? {
        let point = (input.count()?, input.count()?);
        let shape = input.count()?;
        shape_links.push(ShapeLink::new(point, shape, read_hyperlink(&mut input)?));
    }
    input.finish()?;

    debug!(bytes = bytes.len(), areas = root.node_count(); "Decoded chart areas");
    Ok(AssembledChart::from_parts(
        root,
        palette,
        point_shapes,
        point_tooltips,
        shape_links,
        partial,
    ))
}

fn read_palette(input: &mut Reader<'_>) -> Result<Palette, DecodeError> {
    let count = input.count()?;
    let mut values = IndexSet::new();
    for index in 0..count {
        let length = input.count()?;
        let bytes = input.take(length)?;
        let value = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidString(index))?;
        // An index must round-trip to the same string, so entries are distinct
        // and never empty.
        if value.is_empty() {
            return Err(DecodeError::EmptyString(index));
        }
        if !values.insert(value) {
            return Err(DecodeError::DuplicateString(index));
        }
    }
    Ok(Palette::from_strings(values))
}

fn read_node(input: &mut Reader<'_>) -> Result<Area, DecodeError> {
    let tag = input.u8()?;
    let slot = if AreaKind::tag_has_slot(tag) {
        Some(input.u8()?)
    } else {
        None
    };
    let kind = AreaKind::from_tag(tag, slot).ok_or(DecodeError::InvalidTag {
        what: "area kind",
        tag,
    })?;

    let z_tag = input.u8()?;
    let z_order = ZOrder::from_u8(z_tag).ok_or(DecodeError::InvalidTag {
        what: "z-order",
        tag: z_tag,
    })?;
    let interaction = Interaction::from_bits_truncate(input.u16()?);
    let flags = input.u8()?;

    let position = input.point()?;
    let label = input.i32()?;
    let field = input.i32()?;
    let value = input.i32()?;
    let row = input.optional(flags & NODE_HAS_ROW != 0)?;
    let col = input.optional(flags & NODE_HAS_COL != 0)?;
    let facet = input.optional(flags & NODE_HAS_FACET != 0)?;

    let regions = read_regions(input)?;
    let tooltip = if flags & NODE_HAS_TOOLTIP != 0 {
        Some(read_tooltip(input)?)
    } else {
        None
    };
    let mut hyperlinks = Vec::new();
    for _ in 0..input.count()? {
        hyperlinks.push(read_hyperlink(input)?);
    }
    let composition = read_composition(input)?;

    let mut children = Vec::new();
    for _ in 0..input.count()? {
        let mut frame = input.framed()?;
        children.push(read_node(&mut frame)?);
        frame.finish()?;
    }

    Ok(Area {
        kind,
        interaction,
        z_order,
        position,
        regions,
        light_weight: flags & NODE_LIGHT_WEIGHT != 0,
        label,
        field,
        value,
        row,
        col,
        facet,
        tooltip,
        hyperlinks,
        composition,
        children,
    })
}

fn read_regions(input: &mut Reader<'_>) -> Result<Vec<Region>, DecodeError> {
    let count = input.count()?;
    let mut regions = Vec::new();
    for _ in 0..count {
        let tag = input.u8()?;
        let region = match tag {
            REGION_RECT => RectRegion::from_raw(input.rect()?).into(),
            REGION_POLYGON => read_polygon(input)?.into(),
            REGION_ELLIPSE => {
                let center = input.point()?;
                let (radius_x, radius_y) = (input.f64()?, input.f64()?);
                EllipseRegion::from_raw(center, radius_x, radius_y).into()
            }
            REGION_LINE => {
                let (from, to) = (input.point()?, input.point()?);
                LineRegion::from_raw(from, to, input.f64()?).into()
            }
            REGION_COMPOSITE => {
                let mut parts = Vec::new();
                for _ in 0..input.count()? {
                    parts.push(read_polygon(input)?);
                }
                CompositeRegion::new(parts).into()
            }
            tag => {
                return Err(DecodeError::InvalidTag {
                    what: "region",
                    tag,
                });
            }
        };
        regions.push(region);
    }
    Ok(regions)
}

fn read_polygon(input: &mut Reader<'_>) -> Result<PolygonRegion, DecodeError> {
    let scale = input.f64()?;
    let mut points = Vec::new();
    for _ in 0..input.count()? {
        points.push([input.i64()?, input.i64()?]);
    }
    Ok(PolygonRegion::from_raw(points, scale))
}

fn read_tooltip(input: &mut Reader<'_>) -> Result<Tooltip, DecodeError> {
    let custom = input.i32()?;
    let mut entries = Vec::new();
    for _ in 0..input.count()? {
        let (key, value) = (input.i32()?, input.i32()?);
        let flags = input.u8()?;
        entries.push(TooltipEntry::from_parts(
            key,
            value,
            flags & ENTRY_STACK_TOTAL != 0,
            flags & ENTRY_DIMENSION != 0,
        ));
    }
    Ok(Tooltip::new(entries, custom))
}

fn read_hyperlink(input: &mut Reader<'_>) -> Result<HyperlinkRef, DecodeError> {
    let (label, target) = (input.i32()?, input.i32()?);
    let mut params = Vec::new();
    for _ in 0..input.count()? {
        params.push((input.i32()?, input.i32()?));
    }
    Ok(HyperlinkRef::new(label, target, params))
}

fn read_composition(input: &mut Reader<'_>) -> Result<Composition, DecodeError> {
    let tag = input.u8()?;
    let composition = match tag {
        COMPOSITION_LEAF => Composition::Leaf,
        COMPOSITION_CONTAINER => Composition::Container,
        COMPOSITION_SORTED => {
            let direction = input.u8()?;
            Composition::Sorted(Direction::from_u8(direction).ok_or(DecodeError::InvalidTag {
                what: "direction",
                tag: direction,
            })?)
        }
        COMPOSITION_GRID => {
            let (columns, rows) = (input.u8()?, input.u8()?);
            let bounds = input.rect()?;
            let mut cells = Vec::with_capacity(columns as usize * rows as usize);
            for _ in 0..columns as usize * rows as usize {
                let mut cell = Cell::new();
                for _ in 0..input.count()? {
                    cell.push(input.u32()?);
                }
                cells.push(cell);
            }
            Composition::Grid(GridIndex::from_parts(columns, rows, bounds, cells))
        }
        tag => {
            return Err(DecodeError::InvalidTag {
                what: "composition",
                tag,
            });
        }
    };
    Ok(composition)
}
