//! Configuration types for chart area assembly.
//!
//! This module provides configuration structures that tune how areas are
//! measured and how tooltips are written. All types implement
//! [`serde::Deserialize`] so a host application can load them from whatever
//! source it already uses; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`TooltipConfig`] - Combined tooltip limit, labels and [`Locale`].
//! - [`BoundsConfig`] - Pixel snapping and spatial index tuning.
//! - [`Messages`] - Localized text shown in place of failed formatting.
//!
//! # Example
//!
//! ```
//! # use chartarea::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.tooltip().combined_limit(), 5);
//! assert_eq!(config.bounds().grid_columns(), 3);
//! ```

use serde::Deserialize;

/// Top-level configuration combining all sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Tooltip configuration section.
    #[serde(default)]
    tooltip: TooltipConfig,

    /// Bounds configuration section.
    #[serde(default)]
    bounds: BoundsConfig,

    /// Localized messages section.
    #[serde(default)]
    messages: Messages,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(tooltip: TooltipConfig, bounds: BoundsConfig, messages: Messages) -> Self {
        Self {
            tooltip,
            bounds,
            messages,
        }
    }

    /// Returns the tooltip configuration.
    pub fn tooltip(&self) -> &TooltipConfig {
        &self.tooltip
    }

    /// Returns the bounds configuration.
    pub fn bounds(&self) -> &BoundsConfig {
        &self.bounds
    }

    /// Returns the localized messages.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}

/// Number formatting conventions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Locale {
    decimal_separator: char,
    grouping_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl Locale {
    pub fn new(decimal_separator: char, grouping_separator: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
        }
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn grouping_separator(&self) -> char {
        self.grouping_separator
    }
}

/// Tooltip construction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Maximum number of sibling tooltips merged into a combined tooltip.
    combined_limit: usize,

    /// Suffix appended to a measure caption for stack totals.
    stack_total_label: String,

    /// Text shown for null values.
    null_text: String,

    locale: Locale,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            combined_limit: 5,
            stack_total_label: String::from("Total"),
            null_text: String::new(),
            locale: Locale::default(),
        }
    }
}

impl TooltipConfig {
    pub fn combined_limit(&self) -> usize {
        self.combined_limit
    }

    pub fn stack_total_label(&self) -> &str {
        &self.stack_total_label
    }

    pub fn null_text(&self) -> &str {
        &self.null_text
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Sets the combined tooltip limit (builder style).
    pub fn with_combined_limit(mut self, limit: usize) -> Self {
        self.combined_limit = limit;
        self
    }

    /// Sets the locale (builder style).
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Pixel snapping and spatial index settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Distance to an integer under which a coordinate snaps to it.
    snap_tolerance: f64,

    /// Width of the strip synthesized for a border line with no axis.
    border_strip: f64,

    /// Distance under which two axis labels count as the same position.
    label_dedup_tolerance: f64,

    grid_columns: usize,
    grid_rows: usize,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 0.01,
            border_strip: 1.0,
            label_dedup_tolerance: 0.5,
            grid_columns: 3,
            grid_rows: 3,
        }
    }
}

impl BoundsConfig {
    pub fn snap_tolerance(&self) -> f64 {
        self.snap_tolerance
    }

    pub fn border_strip(&self) -> f64 {
        self.border_strip
    }

    pub fn label_dedup_tolerance(&self) -> f64 {
        self.label_dedup_tolerance
    }

    pub fn grid_columns(&self) -> usize {
        self.grid_columns.max(1)
    }

    pub fn grid_rows(&self) -> usize {
        self.grid_rows.max(1)
    }
}

/// Localized text shown when tooltip content cannot be produced.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Substituted for a placeholder whose value failed to format.
    format_error: String,

    /// Replaces the whole text of a tooltip whose template is malformed.
    tooltip_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            format_error: String::from("#FORMAT ERROR"),
            tooltip_error: String::from("Invalid tooltip template"),
        }
    }
}

impl Messages {
    pub fn new(format_error: impl Into<String>, tooltip_error: impl Into<String>) -> Self {
        Self {
            format_error: format_error.into(),
            tooltip_error: tooltip_error.into(),
        }
    }

    pub fn format_error(&self) -> &str {
        &self.format_error
    }

    pub fn tooltip_error(&self) -> &str {
        &self.tooltip_error
    }
}
