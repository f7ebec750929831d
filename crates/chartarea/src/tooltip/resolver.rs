use log::{trace, warn};

use chartarea_core::palette::Palette;

use crate::{
    binding::Binding,
    config::{AppConfig, Messages, TooltipConfig},
    data::{DataSet, Field, Value},
    error::FormatError,
    format::ValueFormatter,
    scene::PlotElement,
    tooltip::{
        PlaceholderStyle, Tooltip, TooltipAccumulator, TooltipTemplate, stack::stack_total,
    },
};

/// Decides which fields a tooltip shows and with what text.
///
/// One resolver serves one assembly pass. The custom template, if any, is
/// parsed once when the resolver is created.
pub struct TooltipResolver<'a> {
    data: &'a DataSet,
    binding: &'a Binding,
    config: &'a TooltipConfig,
    messages: &'a Messages,
    formatter: ValueFormatter,
    template: Option<Result<TooltipTemplate, FormatError>>,
}

impl<'a> TooltipResolver<'a> {
    pub fn new(data: &'a DataSet, binding: &'a Binding, config: &'a AppConfig) -> Self {
        let template = binding.tooltip_template.as_deref().map(|source| {
            let parsed = TooltipTemplate::parse(source);
            if let Err(err) = &parsed {
                warn!(template = source, error:% = err; "Invalid tooltip template");
            }
            parsed
        });
        Self {
            data,
            binding,
            config: config.tooltip(),
            messages: config.messages(),
            formatter: ValueFormatter::from_config(config.tooltip()),
            template,
        }
    }

    /// Returns the formatter, shared with other per-pass consumers.
    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    /// Returns the fields an element's tooltip may show, in display order:
    /// dimensions and dimension aesthetics, then the measure and measure
    /// aesthetics, then extra fields. Each field appears once.
    pub fn candidate_fields<'e>(&self, element: &'e PlotElement) -> Vec<&'e str> {
        let is_measure = |name: &str| self.data.field(name).is_some_and(Field::is_measure);
        let mut fields = Vec::new();

        for name in &element.dimensions {
            push_unique(&mut fields, name);
        }
        for aesthetic in &element.aesthetics {
            if !is_measure(&aesthetic.field) {
                push_unique(&mut fields, &aesthetic.field);
            }
        }
        if let Some(measure) = &element.measure {
            push_unique(&mut fields, measure);
        }
        for aesthetic in &element.aesthetics {
            if is_measure(&aesthetic.field) {
                push_unique(&mut fields, &aesthetic.field);
            }
        }
        for name in &element.extra_fields {
            push_unique(&mut fields, name);
        }
        fields
    }

    /// Returns true when `field` must not appear in the element's tooltip:
    /// it is already drawn as the element's text label, or the current drill
    /// level made it stale.
    pub fn is_excluded(&self, element: &PlotElement, field: &str) -> bool {
        element.text_label.as_deref() == Some(field) || self.binding.drill.is_stale(field)
    }

    /// Builds the tooltip content of a plotted element.
    pub fn element_tooltip(
        &mut self,
        element: &PlotElement,
        palette: &mut Palette,
    ) -> TooltipAccumulator {
        let candidates = self.candidate_fields(element);
        let mut tooltip = TooltipAccumulator::new();

        match &self.template {
            Some(Ok(template)) => {
                let template = template.clone();
                let text = template.render(|index, style| {
                    let Some(&name) = candidates.get(index) else {
                        return String::new();
                    };
                    self.placeholder_text(element, name, style)
                });
                tooltip.set_custom(text);
            }
            Some(Err(_)) => tooltip.set_custom(self.messages.tooltip_error().to_string()),
            None => self.default_entries(element, &candidates, &mut tooltip, palette),
        }
        tooltip
    }

    /// Builds the tooltip of an axis label or legend item bound to `field`.
    pub fn label_tooltip(
        &mut self,
        field: Option<&str>,
        raw: &str,
        shown: &str,
        palette: &mut Palette,
    ) -> Option<Tooltip> {
        let name = field?;
        let key = self.data.field(name).map_or(name, Field::caption);
        let text = self.binding.alias(name, raw).unwrap_or(shown);

        let mut tooltip = TooltipAccumulator::new();
        tooltip.push_dimension(palette.put(key), palette.put(text));
        tooltip.finish(palette)
    }

    /// Merges the tooltips of siblings sharing an element's category into
    /// the element's own, up to the configured limit of tooltips in total.
    pub fn combine<'t>(
        &self,
        mut own: TooltipAccumulator,
        siblings: impl IntoIterator<Item = &'t TooltipAccumulator>,
    ) -> TooltipAccumulator {
        let limit = self.config.combined_limit().saturating_sub(1);
        for sibling in siblings.into_iter().take(limit) {
            own.merge_sibling(sibling);
        }
        own
    }

    fn default_entries(
        &mut self,
        element: &PlotElement,
        candidates: &[&str],
        tooltip: &mut TooltipAccumulator,
        palette: &mut Palette,
    ) {
        for &name in candidates {
            if self.is_excluded(element, name) {
                trace!(field = name; "Field excluded from tooltip");
                continue;
            }
            let Some(field) = self.data.field(name) else {
                continue;
            };

            if let Some(total) = self.stack_total_of(element, name) {
                let label = self.config.stack_total_label();
                let key = if label.is_empty() {
                    field.caption().to_string()
                } else {
                    format!("{} {label}", field.caption())
                };
                let text = self.display_text(name, &Value::Number(total));
                tooltip.push_stack_total(palette.put(&key), palette.put(&text));
                continue;
            }

            let Some(value) = self.data.value(element.row, name) else {
                continue;
            };
            let text = self.display_text(name, value);
            let (key, value) = (palette.put(field.caption()), palette.put(&text));
            if field.is_measure() {
                tooltip.push(key, value);
            } else {
                tooltip.push_dimension(key, value);
            }
        }
    }

    /// Returns the re-aggregated total when `name` is the measure of an
    /// element labelling a whole stack.
    fn stack_total_of(&self, element: &PlotElement, name: &str) -> Option<f64> {
        let role = element.stack.as_ref().filter(|role| role.total)?;
        if element.measure.as_deref() != Some(name) {
            return None;
        }
        stack_total(self.data, element.row, name, role)
    }

    fn placeholder_text(
        &mut self,
        element: &PlotElement,
        name: &str,
        style: &PlaceholderStyle,
    ) -> String {
        if self.is_excluded(element, name) {
            return String::new();
        }
        let value = match self.stack_total_of(element, name) {
            Some(total) => Value::Number(total),
            None => match self.data.value(element.row, name) {
                Some(value) => value.clone(),
                None => return String::new(),
            },
        };
        let result = match style {
            PlaceholderStyle::Plain => return self.display_text(name, &value),
            PlaceholderStyle::Number(pattern) => {
                self.formatter.format_number(&value, pattern.as_deref())
            }
            PlaceholderStyle::Date(pattern) => self.formatter.format_date(&value, pattern),
        };
        result.unwrap_or_else(|err| self.format_failure(name, &err))
    }

    /// Renders a value the way its field shows it, honouring aliases.
    fn display_text(&mut self, name: &str, value: &Value) -> String {
        let raw = self.formatter.format_default(value);
        if let Some(alias) = self.binding.alias(name, &raw) {
            return alias.to_string();
        }
        let format = self.data.field(name).and_then(|field| field.format.as_deref());
        match self.formatter.format_field(value, format) {
            Ok(text) => text,
            Err(err) => self.format_failure(name, &err),
        }
    }

    fn format_failure(&self, name: &str, err: &FormatError) -> String {
        warn!(field = name, error:% = err; "Tooltip value could not be formatted");
        self.messages.format_error().to_string()
    }
}

fn push_unique<'e>(fields: &mut Vec<&'e str>, name: &'e str) {
    if !fields.contains(&name) {
        fields.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binding::DrillState,
        scene::{AestheticBinding, AestheticKind, StackRole},
    };

    fn data() -> DataSet {
        DataSet::new()
            .with_field(Field::dimension("region").with_label("Region"))
            .with_field(Field::dimension("series"))
            .with_field(Field::measure("sales").with_label("Sales").with_format("#,##0.00"))
            .with_field(Field::measure("profit"))
            .with_field(Field::dimension("note"))
            .with_row(vec![
                "East".into(),
                "a".into(),
                1234.5.into(),
                (-2.0).into(),
                "n1".into(),
            ])
            .with_row(vec![
                "East".into(),
                "b".into(),
                100.0.into(),
                (-3.0).into(),
                "n2".into(),
            ])
    }

    fn element() -> PlotElement {
        let mut element = PlotElement::new(0, 0);
        element.dimensions = vec!["region".to_string()];
        element.measure = Some("sales".to_string());
        element
    }

    fn text(tooltip: TooltipAccumulator, palette: &mut Palette) -> String {
        tooltip
            .finish(palette)
            .map(|tooltip| tooltip.to_text(palette))
            .unwrap_or_default()
    }

    #[test]
    fn test_candidate_order() {
        let data = data();
        let binding = Binding::new();
        let config = AppConfig::default();
        let resolver = TooltipResolver::new(&data, &binding, &config);

        let mut element = element();
        element.extra_fields = vec!["note".to_string(), "region".to_string()];
        element.aesthetics = vec![
            AestheticBinding {
                kind: AestheticKind::Size,
                field: "profit".to_string(),
            },
            AestheticBinding {
                kind: AestheticKind::Color,
                field: "series".to_string(),
            },
        ];
        assert_eq!(
            resolver.candidate_fields(&element),
            vec!["region", "series", "sales", "profit", "note"]
        );
    }

    #[test]
    fn test_default_entries() {
        let data = data();
        let binding = Binding::new().with_axis_alias("region", "East", "Eastern");
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let tooltip = resolver.element_tooltip(&element(), &mut palette);
        assert_eq!(text(tooltip, &mut palette), "Region: Eastern\nSales: 1,234.50");
    }

    #[test]
    fn test_text_label_and_stale_fields_skipped() {
        let data = data();
        let binding = Binding {
            drill: DrillState {
                enabled: true,
                stale_fields: vec!["series".to_string()],
            },
            ..Binding::default()
        };
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let mut element = element();
        element.dimensions.push("series".to_string());
        element.text_label = Some("sales".to_string());
        let tooltip = resolver.element_tooltip(&element, &mut palette);
        assert_eq!(text(tooltip, &mut palette), "Region: East");
    }

    #[test]
    fn test_template() {
        let data = data();
        let binding = Binding::new().with_tooltip_template("{0} sold {1,number,#,##0.0} ({2})");
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let tooltip = resolver.element_tooltip(&element(), &mut palette);
        assert_eq!(text(tooltip, &mut palette), "East sold 1,234.5 ()");
    }

    #[test]
    fn test_template_format_failure_is_localized() {
        let data = data();
        let binding = Binding::new().with_tooltip_template("{0,number}: {1}");
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let tooltip = resolver.element_tooltip(&element(), &mut palette);
        assert_eq!(text(tooltip, &mut palette), "#FORMAT ERROR: 1,234.50");
    }

    #[test]
    fn test_malformed_template() {
        let data = data();
        let binding = Binding::new().with_tooltip_template("{0");
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let tooltip = resolver.element_tooltip(&element(), &mut palette);
        assert_eq!(text(tooltip, &mut palette), "Invalid tooltip template");
    }

    #[test]
    fn test_stack_total_entry_last() {
        let data = data();
        let binding = Binding::new();
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let mut element = element();
        element.measure = Some("profit".to_string());
        element.extra_fields = vec!["note".to_string()];
        element.stack = Some(StackRole {
            group_fields: vec!["region".to_string()],
            total: true,
            sign: None,
        });
        let tooltip = resolver.element_tooltip(&element, &mut palette);
        assert_eq!(
            text(tooltip, &mut palette),
            "Region: East\nnote: n1\nprofit Total: -5"
        );
    }

    #[test]
    fn test_combine_respects_limit() {
        let data = data();
        let binding = Binding::new();
        let config: AppConfig = toml::from_str("[tooltip]\ncombined_limit = 2").expect("valid config");
        let resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let siblings: Vec<TooltipAccumulator> = (0..3)
            .map(|i| {
                let mut tooltip = TooltipAccumulator::new();
                tooltip.push(palette.put("v"), palette.put(&i.to_string()));
                tooltip
            })
            .collect();
        let combined = resolver.combine(siblings[0].clone(), &siblings[1..]);
        assert_eq!(text(combined, &mut palette), "v: 0\nv: 1");
    }

    #[test]
    fn test_label_tooltip() {
        let data = data();
        let binding = Binding::new().with_legend_alias("series", "a", "Alpha");
        let config = AppConfig::default();
        let mut resolver = TooltipResolver::new(&data, &binding, &config);
        let mut palette = Palette::new();

        let tooltip = resolver
            .label_tooltip(Some("series"), "a", "a", &mut palette)
            .expect("tooltip");
        assert_eq!(tooltip.to_text(&palette), "series: Alpha");
        assert!(resolver.label_tooltip(None, "a", "a", &mut palette).is_none());
    }
}
