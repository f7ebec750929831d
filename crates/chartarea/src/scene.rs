//! The laid-out chart handed over by the rendering engine.
//!
//! A [`VisualScene`] describes what was drawn and where: the plot rectangle,
//! every axis instance with its labels, titles, the legend group and each
//! plotted element with its shapes and field bindings. All coordinates are in
//! the layout pixel space of the scene. Nothing here is computed; the types
//! only carry what the renderer measured.

use chartarea_core::{
    geometry::{Bounds, Point, Size},
    region::{CompositeRegion, EllipseRegion, LineRegion, PolygonRegion, RectRegion, Region},
};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

fn default_scale() -> f64 {
    1.0
}

/// Coordinate system the chart was drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordKind {
    #[default]
    Rect,
    Polar,
    /// Small multiples: one sub-coordinate per facet.
    Faceted,
}

/// One of the four edges of the plot where an axis can sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSlot {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl AxisSlot {
    /// Slots in composition order.
    pub const ALL: [AxisSlot; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Returns true for slots whose axis runs along the x direction.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Returns the title placed on the same side of the plot.
    pub fn title_slot(self) -> TitleSlot {
        match self {
            Self::Top => TitleSlot::X2,
            Self::Bottom => TitleSlot::X,
            Self::Left => TitleSlot::Y,
            Self::Right => TitleSlot::Y2,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Title positions around the plot.
///
/// `X` sits below the plot, `X2` above, `Y` to the left and `Y2` to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSlot {
    #[default]
    X,
    X2,
    Y,
    Y2,
}

impl TitleSlot {
    /// Slots in composition order.
    pub const ALL: [TitleSlot; 4] = [Self::X, Self::X2, Self::Y, Self::Y2];

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::X2 => "x2",
            Self::Y => "y",
            Self::Y2 => "y2",
        }
    }

    /// Returns the plot edge this title is placed against.
    pub fn side(self) -> AxisSlot {
        match self {
            Self::X => AxisSlot::Bottom,
            Self::X2 => AxisSlot::Top,
            Self::Y => AxisSlot::Left,
            Self::Y2 => AxisSlot::Right,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Fill zones between two adjacent axis slots of a scrolling chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// How axis positions map to values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    #[default]
    Categorical,
    Linear,
    Time,
}

impl ScaleKind {
    pub fn is_continuous(self) -> bool {
        !matches!(self, Self::Categorical)
    }
}

/// Visual channel a field is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AestheticKind {
    #[default]
    Color,
    Shape,
    Size,
    Texture,
    Text,
    Line,
}

impl AestheticKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Shape => "shape",
            Self::Size => "size",
            Self::Texture => "texture",
            Self::Text => "text",
            Self::Line => "line",
        }
    }
}

/// Per-edge flags, used for facet borders and grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub fn get(&self, slot: AxisSlot) -> bool {
        match slot {
            AxisSlot::Top => self.top,
            AxisSlot::Bottom => self.bottom,
            AxisSlot::Left => self.left,
            AxisSlot::Right => self.right,
        }
    }
}

/// Scroll directions of the plot viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Scroll {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Scroll {
    pub fn is_scrolling(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Offset of the back wall of a 3-D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Depth {
    pub dx: f64,
    pub dy: f64,
}

/// A single label drawn along an axis.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AxisLabel {
    /// Text as drawn.
    pub text: String,
    /// Raw data value behind the label, if different from the text.
    pub value: Option<String>,
    pub bounds: Bounds,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl AxisLabel {
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            text: text.into(),
            value: None,
            bounds,
            visible: true,
        }
    }

    /// Returns the raw value, falling back to the drawn text.
    pub fn raw_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }
}

/// One axis as drawn in one facet.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AxisInstance {
    pub slot: AxisSlot,
    pub facet: Option<u32>,
    /// Bound field; continuous scales without a field share one group.
    pub field: Option<String>,
    pub scale: ScaleKind,
    pub bounds: Bounds,
    pub line_visible: bool,
    pub line_bounds: Option<Bounds>,
    pub labels: Vec<AxisLabel>,
}

impl AxisInstance {
    pub fn new(slot: AxisSlot, bounds: Bounds) -> Self {
        Self {
            slot,
            bounds,
            ..Self::default()
        }
    }

    /// Returns true when the axis draws anything at all.
    pub fn is_visible(&self) -> bool {
        self.line_visible || self.labels.iter().any(|label| label.visible)
    }
}

/// A title placed against one side of the plot.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct TitleLabel {
    pub slot: TitleSlot,
    pub text: String,
    pub bounds: Bounds,
}

/// One entry of a legend.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LegendItem {
    pub label: String,
    pub value: Option<String>,
    pub bounds: Bounds,
}

impl LegendItem {
    pub fn raw_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// A legend for one aesthetic binding.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Legend {
    pub field: Option<String>,
    pub aesthetic: AestheticKind,
    pub title: Option<String>,
    pub title_bounds: Option<Bounds>,
    pub bounds: Bounds,
    pub items: Vec<LegendItem>,
}

/// All legends of the chart, stacked inside one box.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LegendGroup {
    pub bounds: Bounds,
    pub legends: Vec<Legend>,
}

/// An aesthetic frame binding of a plotted element.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AestheticBinding {
    pub kind: AestheticKind,
    pub field: String,
}

/// Sign of the part of a stack an element totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackSign {
    Positive,
    Negative,
}

impl StackSign {
    /// Returns true when `value` belongs on this side of the stack.
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::Positive => value >= 0.0,
            Self::Negative => value < 0.0,
        }
    }
}

/// Stacking information of an element.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StackRole {
    /// Fields whose values identify one stack.
    pub group_fields: Vec<String>,
    /// The element labels the whole stack rather than one segment.
    pub total: bool,
    pub sign: Option<StackSign>,
}

/// Geometry of a plotted element as drawn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneShape {
    Rect {
        bounds: Bounds,
    },
    Polygon {
        points: Vec<Point>,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
    },
    /// Several closed contours, such as a donut slice.
    Path {
        contours: Vec<Vec<Point>>,
    },
}

impl SceneShape {
    /// Converts the drawn shape into a hit-test region.
    pub fn to_region(&self) -> Region {
        match self {
            Self::Rect { bounds } => RectRegion::new(*bounds).into(),
            Self::Polygon { points, scale } => PolygonRegion::with_scale(points, *scale).into(),
            Self::Ellipse {
                center,
                radius_x,
                radius_y,
            } => EllipseRegion::new(*center, *radius_x, *radius_y).into(),
            Self::Line { from, to, width } => LineRegion::new(*from, *to, *width).into(),
            Self::Path { contours } => CompositeRegion::new(
                contours
                    .iter()
                    .map(|contour| PolygonRegion::new(contour))
                    .collect(),
            )
            .into(),
        }
    }

    /// Returns true when the shape is made of several disjoint parts.
    pub fn is_multi_part(&self) -> bool {
        matches!(self, Self::Path { contours } if contours.len() > 1)
    }

    /// Returns a copy with every coordinate scaled.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let scale_point = |p: &Point| Point::new(p.x() * sx, p.y() * sy);
        match self {
            Self::Rect { bounds } => Self::Rect {
                bounds: bounds.scale(sx, sy),
            },
            Self::Polygon { points, scale } => Self::Polygon {
                points: points.iter().map(scale_point).collect(),
                scale: *scale,
            },
            Self::Ellipse {
                center,
                radius_x,
                radius_y,
            } => Self::Ellipse {
                center: scale_point(center),
                radius_x: radius_x * sx,
                radius_y: radius_y * sy,
            },
            Self::Line { from, to, width } => Self::Line {
                from: scale_point(from),
                to: scale_point(to),
                width: width * (sx + sy) / 2.0,
            },
            Self::Path { contours } => Self::Path {
                contours: contours
                    .iter()
                    .map(|contour| contour.iter().map(scale_point).collect())
                    .collect(),
            },
        }
    }
}

/// A plotted data element (bar, point, slice, line segment).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PlotElement {
    pub shapes: Vec<SceneShape>,
    /// Row of the data set the element was drawn from.
    pub row: usize,
    /// Column (series) index within the chart.
    pub col: usize,
    /// Further rows aggregated into this element.
    pub sub_rows: Vec<usize>,
    pub measure: Option<String>,
    pub dimensions: Vec<String>,
    /// Fields tagged for display in the tooltip only.
    pub extra_fields: Vec<String>,
    pub aesthetics: Vec<AestheticBinding>,
    /// Field already drawn as a text label on the element.
    pub text_label: Option<String>,
    pub stack: Option<StackRole>,
    pub light_weight: bool,
    pub facet: Option<u32>,
}

impl PlotElement {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            ..Self::default()
        }
    }

    /// Returns every row the element stands for, primary row first.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.row).chain(self.sub_rows.iter().copied())
    }
}

/// A fully laid-out chart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisualScene {
    /// Real size of the chart image.
    pub size: Size,
    /// Size the chart was laid out at, when it differs from `size`.
    pub layout_size: Option<Size>,
    pub coord: CoordKind,
    pub plot_bounds: Bounds,
    pub axes: Vec<AxisInstance>,
    pub titles: Vec<TitleLabel>,
    pub legend: Option<LegendGroup>,
    pub elements: Vec<PlotElement>,
    pub scroll: Scroll,
    /// Facet border or grid lines drawn at each plot edge.
    pub borders: Edges,
    pub depth: Option<Depth>,
}

impl VisualScene {
    pub fn new(size: Size, plot_bounds: Bounds) -> Self {
        Self {
            size,
            plot_bounds,
            ..Self::default()
        }
    }

    pub fn is_faceted(&self) -> bool {
        self.coord == CoordKind::Faceted
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    /// Returns the axis instances placed in `slot`, in scene order.
    pub fn axes_in(&self, slot: AxisSlot) -> impl Iterator<Item = &AxisInstance> + '_ {
        self.axes.iter().filter(move |axis| axis.slot == slot)
    }

    pub fn title(&self, slot: TitleSlot) -> Option<&TitleLabel> {
        self.titles.iter().find(|title| title.slot == slot)
    }

    /// Returns the factors mapping layout coordinates onto the real image.
    ///
    /// Scrolling charts keep layout coordinates.
    pub fn scale_factors(&self) -> (f64, f64) {
        match self.layout_size {
            Some(layout) if !self.is_scrolling() && layout != self.size => {
                let sx = if layout.width() > 0.0 {
                    self.size.width() / layout.width()
                } else {
                    1.0
                };
                let sy = if layout.height() > 0.0 {
                    self.size.height() / layout.height()
                } else {
                    1.0
                };
                (sx, sy)
            }
            _ => (1.0, 1.0),
        }
    }

    /// Returns the extent of the image area covered by the tree.
    pub fn canvas_size(&self) -> Size {
        match self.layout_size {
            Some(layout) if self.is_scrolling() => layout,
            _ => self.size,
        }
    }
}
