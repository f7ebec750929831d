//! Pixel-aligned zones of a rendered chart.
//!
//! The [`BoundsCalculator`] turns the raw floating point bounds of a
//! [`VisualScene`] into integer rectangles for the plot, the four axis slots,
//! the four titles and, for scrolling charts, the four corner fill zones.
//!
//! # Rules
//!
//! - A coordinate within the snap tolerance of an integer rounds to it.
//!   Otherwise start edges round up and end edges round down, so an inner
//!   zone never overflows its outer zone by sub-pixel drift.
//! - Each side is cut outward from the plot edge: plot, then axis, then
//!   title. Adjacent zones share their edge exactly.
//! - A side with a facet border but no axis gets a border strip. The title
//!   zone on that side owns the strip, and is built even without title text.
//! - When the plot scrolls, axes running along the scroll direction leave out
//!   their last pixel, which belongs to the viewport. Faceted charts keep it.
//! - A chart laid out at a different size is scaled onto the real image
//!   unless it scrolls.
//!
//! A missing scene yields zero rectangles everywhere.

use std::cell::OnceCell;

use log::debug;

use chartarea_core::geometry::Bounds;

use crate::{
    config::BoundsConfig,
    scene::{AxisSlot, Corner, TitleSlot, VisualScene},
};

/// Snaps a start (minimum) edge.
pub fn snap_start(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= tolerance {
        rounded
    } else {
        value.ceil()
    }
}

/// Snaps an end (maximum) edge.
pub fn snap_end(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= tolerance {
        rounded
    } else {
        value.floor()
    }
}

/// Snaps all four edges; a rectangle thinner than a pixel collapses to zero
/// extent instead of inverting.
pub fn snap_bounds(bounds: Bounds, tolerance: f64) -> Bounds {
    let min_x = snap_start(bounds.min_x(), tolerance);
    let min_y = snap_start(bounds.min_y(), tolerance);
    let max_x = snap_end(bounds.max_x(), tolerance).max(min_x);
    let max_y = snap_end(bounds.max_y(), tolerance).max(min_y);
    Bounds::from_edges(min_x, min_y, max_x, max_y)
}

fn clamp_bounds(bounds: Bounds, outer: Bounds) -> Bounds {
    let min_x = bounds.min_x().clamp(outer.min_x(), outer.max_x());
    let min_y = bounds.min_y().clamp(outer.min_y(), outer.max_y());
    let max_x = bounds.max_x().clamp(min_x, outer.max_x().max(min_x));
    let max_y = bounds.max_y().clamp(min_y, outer.max_y().max(min_y));
    Bounds::from_edges(min_x, min_y, max_x, max_y)
}

/// Computed zones of one chart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChartBounds {
    content: Bounds,
    plot: Bounds,
    axes: [Bounds; 4],
    titles: [Bounds; 4],
    corners: [Bounds; 4],
}

impl ChartBounds {
    /// Returns the whole image area.
    pub fn content(&self) -> Bounds {
        self.content
    }

    pub fn plot(&self) -> Bounds {
        self.plot
    }

    pub fn axis(&self, slot: AxisSlot) -> Bounds {
        self.axes[slot.index()]
    }

    pub fn title(&self, slot: TitleSlot) -> Bounds {
        self.titles[slot.index()]
    }

    pub fn corner(&self, corner: Corner) -> Bounds {
        self.corners[corner.index()]
    }
}

/// Edge arithmetic for one side of the plot, measured outward.
#[derive(Debug, Clone, Copy)]
struct Side(AxisSlot);

impl Side {
    fn outward(self) -> f64 {
        match self.0 {
            AxisSlot::Top | AxisSlot::Left => -1.0,
            AxisSlot::Bottom | AxisSlot::Right => 1.0,
        }
    }

    /// The plot edge on this side.
    fn edge(self, bounds: Bounds) -> f64 {
        match self.0 {
            AxisSlot::Top => bounds.min_y(),
            AxisSlot::Bottom => bounds.max_y(),
            AxisSlot::Left => bounds.min_x(),
            AxisSlot::Right => bounds.max_x(),
        }
    }

    /// The snapped outer edge of a raw zone on this side.
    fn snapped_outer(self, raw: Bounds, tolerance: f64) -> f64 {
        match self.0 {
            AxisSlot::Top => snap_start(raw.min_y(), tolerance),
            AxisSlot::Left => snap_start(raw.min_x(), tolerance),
            AxisSlot::Bottom => snap_end(raw.max_y(), tolerance),
            AxisSlot::Right => snap_end(raw.max_x(), tolerance),
        }
    }

    fn further(self, a: f64, b: f64) -> f64 {
        if self.outward() < 0.0 { a.min(b) } else { a.max(b) }
    }

    fn nearer(self, a: f64, b: f64) -> f64 {
        if self.outward() < 0.0 { a.max(b) } else { a.min(b) }
    }

    /// Keeps `value` between `inner` and `limit`.
    fn clamp(self, value: f64, inner: f64, limit: f64) -> f64 {
        self.further(inner, self.nearer(value, limit))
    }

    /// The zone between two cut lines, spanning the plot along the side.
    fn zone(self, plot: Bounds, near: f64, far: f64) -> Bounds {
        match self.0 {
            AxisSlot::Top => Bounds::from_edges(plot.min_x(), far, plot.max_x(), near),
            AxisSlot::Bottom => Bounds::from_edges(plot.min_x(), near, plot.max_x(), far),
            AxisSlot::Left => Bounds::from_edges(far, plot.min_y(), near, plot.max_y()),
            AxisSlot::Right => Bounds::from_edges(near, plot.min_y(), far, plot.max_y()),
        }
    }
}

/// Per-render calculator of the chart zones.
///
/// Presence lookups and the computed zones are cached on the instance; a new
/// calculator is created for every render.
pub struct BoundsCalculator<'a> {
    scene: Option<&'a VisualScene>,
    config: &'a BoundsConfig,
    axis_presence: OnceCell<[bool; 4]>,
    border_presence: OnceCell<[bool; 4]>,
    computed: OnceCell<ChartBounds>,
}

impl<'a> BoundsCalculator<'a> {
    pub fn new(scene: Option<&'a VisualScene>, config: &'a BoundsConfig) -> Self {
        Self {
            scene,
            config,
            axis_presence: OnceCell::new(),
            border_presence: OnceCell::new(),
            computed: OnceCell::new(),
        }
    }

    /// Returns true when some axis instance in `slot` draws a label or line.
    pub fn has_axis(&self, slot: AxisSlot) -> bool {
        self.axis_presence.get_or_init(|| {
            let mut presence = [false; 4];
            if let Some(scene) = self.scene {
                for slot in AxisSlot::ALL {
                    presence[slot.index()] = scene.axes_in(slot).any(|axis| axis.is_visible());
                }
            }
            presence
        })[slot.index()]
    }

    /// Returns true when a facet border or grid line is drawn at `slot`.
    pub fn has_border(&self, slot: AxisSlot) -> bool {
        self.border_presence.get_or_init(|| {
            let mut presence = [false; 4];
            if let Some(scene) = self.scene {
                for slot in AxisSlot::ALL {
                    presence[slot.index()] = scene.borders.get(slot);
                }
            }
            presence
        })[slot.index()]
    }

    /// Returns true when a title area is built for `slot`.
    pub fn has_title_area(&self, slot: TitleSlot) -> bool {
        let Some(scene) = self.scene else {
            return false;
        };
        let side = slot.side();
        scene.title(slot).is_some() || (self.has_border(side) && !self.has_axis(side))
    }

    /// Maps a rectangle from layout space onto the real image.
    pub fn to_image(&self, bounds: Bounds) -> Bounds {
        match self.scene {
            Some(scene) => {
                let (sx, sy) = scene.scale_factors();
                bounds.scale(sx, sy)
            }
            None => Bounds::default(),
        }
    }

    /// Snaps a rectangle with the configured tolerance.
    pub fn snap(&self, bounds: Bounds) -> Bounds {
        snap_bounds(bounds, self.config.snap_tolerance())
    }

    /// Returns all zones, computing them on first use.
    pub fn bounds(&self) -> &ChartBounds {
        self.computed.get_or_init(|| self.compute())
    }

    pub fn content_bounds(&self) -> Bounds {
        self.bounds().content()
    }

    pub fn plot_bounds(&self) -> Bounds {
        self.bounds().plot()
    }

    pub fn axis_bounds(&self, slot: AxisSlot) -> Bounds {
        self.bounds().axis(slot)
    }

    pub fn title_bounds(&self, slot: TitleSlot) -> Bounds {
        self.bounds().title(slot)
    }

    pub fn corner_bounds(&self, corner: Corner) -> Bounds {
        self.bounds().corner(corner)
    }

    fn compute(&self) -> ChartBounds {
        let Some(scene) = self.scene else {
            return ChartBounds::default();
        };
        let tolerance = self.config.snap_tolerance();
        let canvas = scene.canvas_size();
        let content = Bounds::from_rect(0.0, 0.0, canvas.width(), canvas.height());

        let mut raw_plot = self.to_image(scene.plot_bounds);
        if let Some(depth) = scene.depth {
            let (sx, sy) = scene.scale_factors();
            raw_plot = raw_plot
                .with_min_y(raw_plot.min_y() - depth.dy * sy)
                .with_max_x(raw_plot.max_x() + depth.dx * sx);
        }
        let plot = clamp_bounds(self.snap(raw_plot), content);

        let mut result = ChartBounds {
            content,
            plot,
            ..ChartBounds::default()
        };

        for slot in AxisSlot::ALL {
            let side = Side(slot);
            let title_slot = slot.title_slot();
            let plot_edge = side.edge(plot);
            let limit = side.edge(content);
            let strip_edge = side.clamp(
                plot_edge + side.outward() * self.config.border_strip(),
                plot_edge,
                limit,
            );

            let axis_outer = if self.has_axis(slot) {
                scene
                    .axes_in(slot)
                    .filter(|axis| axis.is_visible())
                    .map(|axis| self.to_image(axis.bounds))
                    .reduce(|acc, bounds| acc.merge(&bounds))
                    .map_or(plot_edge, |raw| {
                        side.clamp(side.snapped_outer(raw, tolerance), plot_edge, limit)
                    })
            } else {
                plot_edge
            };

            if self.has_axis(slot) {
                let mut axis = side.zone(plot, plot_edge, axis_outer);
                if !scene.is_faceted() {
                    if slot.is_horizontal() && scene.scroll.horizontal {
                        axis = axis.with_max_x((axis.max_x() - 1.0).max(axis.min_x()));
                    } else if !slot.is_horizontal() && scene.scroll.vertical {
                        axis = axis.with_max_y((axis.max_y() - 1.0).max(axis.min_y()));
                    }
                }
                result.axes[slot.index()] = axis;
            }

            if self.has_title_area(title_slot) {
                let mut outer = match scene.title(title_slot) {
                    Some(title) => side.clamp(
                        side.snapped_outer(self.to_image(title.bounds), tolerance),
                        axis_outer,
                        limit,
                    ),
                    None => axis_outer,
                };
                if self.has_border(slot) && !self.has_axis(slot) {
                    outer = side.further(outer, strip_edge);
                }
                result.titles[title_slot.index()] = side.zone(plot, axis_outer, outer);
            }
        }

        if scene.is_scrolling() {
            result.corners = [
                Bounds::from_edges(content.min_x(), content.min_y(), plot.min_x(), plot.min_y()),
                Bounds::from_edges(plot.max_x(), content.min_y(), content.max_x(), plot.min_y()),
                Bounds::from_edges(content.min_x(), plot.max_y(), plot.min_x(), content.max_y()),
                Bounds::from_edges(plot.max_x(), plot.max_y(), content.max_x(), content.max_y()),
            ];
        }

        debug!(
            plot:? = result.plot,
            scrolling = scene.is_scrolling(),
            faceted = scene.is_faceted();
            "Chart bounds computed"
        );
        result
    }
}
