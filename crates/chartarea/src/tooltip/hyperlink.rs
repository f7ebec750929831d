use log::debug;

use chartarea_core::palette::Palette;

use crate::{
    binding::Binding,
    data::{DataSet, HyperlinkDef},
    format::ValueFormatter,
    scene::PlotElement,
};

/// A hyperlink resolved for one element, as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRef {
    label: i32,
    target: i32,
    params: Vec<(i32, i32)>,
}

impl HyperlinkRef {
    pub fn new(label: i32, target: i32, params: Vec<(i32, i32)>) -> Self {
        Self {
            label,
            target,
            params,
        }
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    /// Returns `(name, value)` pairs in resolution order.
    pub fn params(&self) -> &[(i32, i32)] {
        &self.params
    }
}

/// Resolves the hyperlinks of plotted elements.
pub struct HyperlinkResolver<'a> {
    data: &'a DataSet,
    binding: &'a Binding,
    formatter: ValueFormatter,
}

impl<'a> HyperlinkResolver<'a> {
    pub fn new(data: &'a DataSet, binding: &'a Binding, formatter: ValueFormatter) -> Self {
        Self {
            data,
            binding,
            formatter,
        }
    }

    /// Resolves the links of an element: those of its measure first, then
    /// those of its dimensions.
    ///
    /// Light-weight elements get no links. A dimension link is dropped when
    /// one of its required parameters is stale under the current drill.
    pub fn resolve(&self, element: &PlotElement, palette: &mut Palette) -> Vec<HyperlinkRef> {
        if element.light_weight {
            return Vec::new();
        }

        let mut links = Vec::new();
        if let Some(field) = element.measure.as_deref().and_then(|name| self.data.field(name)) {
            for def in &field.hyperlinks {
                links.push(self.build(def, element.row, palette));
            }
        }

        for name in &element.dimensions {
            let Some(field) = self.data.field(name) else {
                continue;
            };
            for def in &field.hyperlinks {
                let blocked = def
                    .params
                    .iter()
                    .find(|param| param.required && self.binding.drill.is_stale(&param.field));
                if let Some(param) = blocked {
                    debug!(
                        link = def.label.as_str(),
                        param = param.name.as_str();
                        "Suppressed dimension hyperlink with stale drill parameter"
                    );
                    continue;
                }
                links.push(self.build(def, element.row, palette));
            }
        }
        links
    }

    fn build(&self, def: &HyperlinkDef, row: usize, palette: &mut Palette) -> HyperlinkRef {
        let mut params = Vec::new();
        for param in &def.params {
            if self.binding.drill.is_stale(&param.field) {
                continue;
            }
            let Some(value) = self.data.value(row, &param.field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let text = self.formatter.format_default(value);
            params.push((palette.put(&param.name), palette.put(&text)));
        }

        if def.include_session_variables {
            for (name, value) in &self.binding.session_variables {
                params.push((palette.put(name), palette.put(value)));
            }
        }
        if def.include_selection {
            for (field, values) in &self.binding.selections {
                params.push((palette.put(field), palette.put(&values.join(","))));
            }
        }

        HyperlinkRef::new(palette.put(&def.label), palette.put(&def.target), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binding::DrillState,
        data::{Field, LinkParam},
    };

    fn data() -> DataSet {
        DataSet::new()
            .with_field(
                Field::dimension("month").with_hyperlink(
                    HyperlinkDef::new("Month detail", "/month")
                        .with_param(LinkParam::new("m", "month").required()),
                ),
            )
            .with_field(Field::dimension("region").with_hyperlink(
                HyperlinkDef::new("Region detail", "/region").with_param(LinkParam::new("r", "region")),
            ))
            .with_field(Field::measure("sales").with_hyperlink({
                let mut link = HyperlinkDef::new("Sales report", "/sales")
                    .with_param(LinkParam::new("region", "region"))
                    .with_param(LinkParam::new("month", "month"));
                link.include_session_variables = true;
                link.include_selection = true;
                link
            }))
            .with_row(vec!["Jan".into(), "East".into(), 10.0.into()])
    }

    fn element() -> PlotElement {
        let mut element = PlotElement::new(0, 0);
        element.measure = Some("sales".to_string());
        element.dimensions = vec!["month".to_string(), "region".to_string()];
        element
    }

    fn texts(palette: &Palette, link: &HyperlinkRef) -> (String, Vec<(String, String)>) {
        let get = |index: i32| palette.get(index).unwrap_or_default().to_string();
        (
            get(link.target()),
            link.params()
                .iter()
                .map(|&(name, value)| (get(name), get(value)))
                .collect(),
        )
    }

    #[test]
    fn test_measure_links_first_with_session_and_selection() {
        let data = data();
        let mut binding = Binding::new();
        binding
            .session_variables
            .insert("user".to_string(), "ada".to_string());
        binding
            .selections
            .insert("region".to_string(), vec!["East".to_string(), "West".to_string()]);
        let resolver = HyperlinkResolver::new(&data, &binding, ValueFormatter::default());

        let mut palette = Palette::new();
        let links = resolver.resolve(&element(), &mut palette);
        assert_eq!(links.len(), 3);

        let (target, params) = texts(&palette, &links[0]);
        assert_eq!(target, "/sales");
        assert_eq!(
            params,
            vec![
                ("region".to_string(), "East".to_string()),
                ("month".to_string(), "Jan".to_string()),
                ("user".to_string(), "ada".to_string()),
                ("region".to_string(), "East,West".to_string()),
            ]
        );
        assert_eq!(texts(&palette, &links[1]).0, "/month");
        assert_eq!(texts(&palette, &links[2]).0, "/region");
    }

    #[test]
    fn test_stale_drill_suppresses_dimension_link() {
        let data = data();
        let binding = Binding {
            drill: DrillState {
                enabled: true,
                stale_fields: vec!["month".to_string()],
            },
            ..Binding::default()
        };
        let resolver = HyperlinkResolver::new(&data, &binding, ValueFormatter::default());

        let mut palette = Palette::new();
        let links = resolver.resolve(&element(), &mut palette);
        let targets: Vec<String> = links.iter().map(|link| texts(&palette, link).0).collect();
        assert_eq!(targets, vec!["/sales".to_string(), "/region".to_string()]);

        // The stale month parameter is left out of the measure link.
        assert_eq!(
            texts(&palette, &links[0]).1,
            vec![("region".to_string(), "East".to_string())]
        );
    }

    #[test]
    fn test_light_weight_elements_skip_links() {
        let data = data();
        let binding = Binding::new();
        let resolver = HyperlinkResolver::new(&data, &binding, ValueFormatter::default());

        let mut element = element();
        element.light_weight = true;
        assert!(resolver.resolve(&element, &mut Palette::new()).is_empty());
    }
}
