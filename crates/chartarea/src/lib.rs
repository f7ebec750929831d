//! Chartarea - Interactive area trees for rendered chart images.
//!
//! A chart drawn as a static image still needs tooltips, hyperlinks,
//! selection and brushing on the client. This crate turns the laid-out
//! [`VisualScene`](scene::VisualScene) of a chart, together with its
//! [`DataSet`](data::DataSet) and [`Binding`](binding::Binding), into a tree of
//! hit-testable areas with resolved tooltip text and hyperlinks, and encodes
//! that tree into a compact binary form.

pub mod area;
pub mod assemble;
pub mod binding;
pub mod bounds;
pub mod config;
pub mod data;
pub mod export;
pub mod format;
pub mod scene;
pub mod tooltip;
pub mod wire;

mod error;

pub use chartarea_core::{geometry, palette, region, z_order};

pub use error::{ChartAreaError, DecodeError, FormatError};

use log::{debug, info};

use assemble::{AssembledChart, Cancellation, ChartAssembler, NeverCancel};
use binding::Binding;
use config::AppConfig;
use data::DataSet;
use export::svg::SvgOverlay;
use scene::VisualScene;

/// Builder for assembling and encoding chart area trees.
///
/// # Examples
///
/// ```rust
/// use chartarea::{ChartAreaBuilder, config::AppConfig};
/// use chartarea::binding::Binding;
/// use chartarea::data::{DataSet, Field};
/// use chartarea::geometry::{Bounds, Size};
/// use chartarea::scene::{PlotElement, SceneShape, VisualScene};
///
/// let mut scene = VisualScene::new(
///     Size::new(400.0, 300.0),
///     Bounds::from_rect(50.0, 20.0, 300.0, 230.0),
/// );
/// let mut bar = PlotElement::new(0, 0);
/// bar.dimensions = vec!["region".to_string()];
/// bar.measure = Some("sales".to_string());
/// bar.shapes = vec![SceneShape::Rect { bounds: Bounds::from_rect(60.0, 100.0, 30.0, 150.0) }];
/// scene.elements.push(bar);
///
/// let data = DataSet::new()
///     .with_field(Field::dimension("region"))
///     .with_field(Field::measure("sales"))
///     .with_row(vec!["East".into(), 10.0.into()]);
///
/// let builder = ChartAreaBuilder::new(AppConfig::default());
/// let chart = builder.assemble(Some(&scene), &data, &Binding::new());
/// assert_eq!(chart.tooltip_text(0, 0), Some("region: East\nsales: 10"));
///
/// // Encode for the client and read it back
/// let bytes = builder.encode(&chart);
/// let decoded = builder.decode(&bytes).expect("Failed to decode");
/// assert_eq!(decoded.tooltip_text(0, 0), chart.tooltip_text(0, 0));
///
/// // Or use default config
/// let builder = ChartAreaBuilder::default();
/// ```
#[derive(Default)]
pub struct ChartAreaBuilder {
    config: AppConfig,
}

impl ChartAreaBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including tooltip, bounds and
    ///   message settings
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chartarea::{ChartAreaBuilder, config::AppConfig};
    ///
    /// let config = AppConfig::default();
    /// let builder = ChartAreaBuilder::new(config);
    /// ```
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Assemble the interactive area tree of a rendered chart.
    ///
    /// Assembly never fails. Formatting problems surface as placeholder text
    /// inside tooltips, and a missing scene yields a chart with an empty
    /// content area.
    ///
    /// # Arguments
    ///
    /// * `scene` - The laid-out chart, if rendering produced one
    /// * `data` - The data set the chart was drawn from
    /// * `binding` - Tooltip template, aliases, drill and session state
    pub fn assemble(
        &self,
        scene: Option<&VisualScene>,
        data: &DataSet,
        binding: &Binding,
    ) -> AssembledChart {
        self.assemble_with_cancel(scene, data, binding, &NeverCancel)
    }

    /// Assemble the area tree, stopping early once `cancel` fires.
    ///
    /// A cancelled pass returns the areas built so far and reports
    /// [`AssembledChart::is_partial`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::atomic::AtomicBool;
    ///
    /// use chartarea::ChartAreaBuilder;
    /// use chartarea::binding::Binding;
    /// use chartarea::data::DataSet;
    /// use chartarea::geometry::{Bounds, Size};
    /// use chartarea::scene::VisualScene;
    ///
    /// let scene = VisualScene::new(Size::new(100.0, 100.0), Bounds::from_rect(10.0, 10.0, 80.0, 80.0));
    /// let cancelled = AtomicBool::new(true);
    ///
    /// let builder = ChartAreaBuilder::default();
    /// let chart = builder.assemble_with_cancel(Some(&scene), &DataSet::new(), &Binding::new(), &cancelled);
    /// assert!(chart.is_partial());
    /// ```
    pub fn assemble_with_cancel(
        &self,
        scene: Option<&VisualScene>,
        data: &DataSet,
        binding: &Binding,
        cancel: &dyn Cancellation,
    ) -> AssembledChart {
        info!(has_scene = scene.is_some(); "Building chart areas");
        let chart = ChartAssembler::new(scene, data, binding, &self.config, cancel).assemble();
        debug!(partial = chart.is_partial(); "Chart areas built");
        chart
    }

    /// Encode an assembled chart into its binary form.
    pub fn encode(&self, chart: &AssembledChart) -> Vec<u8> {
        wire::encode(chart)
    }

    /// Decode a chart from its binary form.
    ///
    /// # Errors
    ///
    /// Returns `ChartAreaError::Decode` when the bytes are not a complete,
    /// well-formed chart stream.
    pub fn decode(&self, bytes: &[u8]) -> Result<AssembledChart, ChartAreaError> {
        let chart = wire::decode(bytes)?;
        Ok(chart)
    }

    /// Render the regions of an assembled chart as an SVG overlay.
    pub fn render_overlay_svg(&self, chart: &AssembledChart) -> String {
        SvgOverlay::new().render_to_string(chart)
    }
}
