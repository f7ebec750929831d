//! Chart bindings that shape tooltip and hyperlink content.

use indexmap::IndexMap;
use serde::Deserialize;

/// Drill navigation state of the chart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DrillState {
    pub enabled: bool,
    /// Fields whose values no longer match the grouping level shown.
    pub stale_fields: Vec<String>,
}

impl DrillState {
    /// Returns true when `field` must not be shown or passed on.
    pub fn is_stale(&self, field: &str) -> bool {
        self.enabled && self.stale_fields.iter().any(|stale| stale == field)
    }
}

/// Tooltip, alias and hyperlink settings of one chart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Binding {
    /// Custom template with numbered placeholders.
    pub tooltip_template: Option<String>,
    /// Merge the tooltips of elements sharing a category.
    pub combined_tooltips: bool,
    /// Per field, raw axis value to displayed alias.
    pub axis_aliases: IndexMap<String, IndexMap<String, String>>,
    /// Per field, raw legend value to displayed alias.
    pub legend_aliases: IndexMap<String, IndexMap<String, String>>,
    pub drill: DrillState,
    pub session_variables: IndexMap<String, String>,
    /// Per field, the values currently selected by the user.
    pub selections: IndexMap<String, Vec<String>>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tooltip_template(mut self, template: impl Into<String>) -> Self {
        self.tooltip_template = Some(template.into());
        self
    }

    pub fn with_combined_tooltips(mut self, combined: bool) -> Self {
        self.combined_tooltips = combined;
        self
    }

    pub fn with_axis_alias(
        mut self,
        field: impl Into<String>,
        raw: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.axis_aliases
            .entry(field.into())
            .or_default()
            .insert(raw.into(), alias.into());
        self
    }

    pub fn with_legend_alias(
        mut self,
        field: impl Into<String>,
        raw: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.legend_aliases
            .entry(field.into())
            .or_default()
            .insert(raw.into(), alias.into());
        self
    }

    /// Returns the display alias of `raw` for `field`.
    ///
    /// Legend overrides win over axis overrides.
    pub fn alias(&self, field: &str, raw: &str) -> Option<&str> {
        self.legend_aliases
            .get(field)
            .and_then(|aliases| aliases.get(raw))
            .or_else(|| self.axis_aliases.get(field).and_then(|aliases| aliases.get(raw)))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_precedence() {
        let binding = Binding::new()
            .with_axis_alias("region", "E", "East (axis)")
            .with_axis_alias("region", "W", "West")
            .with_legend_alias("region", "E", "East");

        assert_eq!(binding.alias("region", "E"), Some("East"));
        assert_eq!(binding.alias("region", "W"), Some("West"));
        assert_eq!(binding.alias("region", "N"), None);
        assert_eq!(binding.alias("other", "E"), None);
    }

    #[test]
    fn test_stale_only_when_drill_enabled() {
        let mut drill = DrillState {
            enabled: false,
            stale_fields: vec!["month".to_string()],
        };
        assert!(!drill.is_stale("month"));

        drill.enabled = true;
        assert!(drill.is_stale("month"));
        assert!(!drill.is_stale("year"));
    }
}
