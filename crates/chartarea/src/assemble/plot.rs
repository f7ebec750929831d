use log::trace;

use chartarea_core::region::{Region, union_bounds};

use crate::{
    area::{AreaKind, AreaNode, Layout},
    assemble::{ChartAssembler, ShapeLink, rect},
    scene::{PlotElement, SceneShape, VisualScene},
    tooltip::TooltipAccumulator,
};

/// An element whose geometry and own tooltip are known, waiting for its
/// siblings before the tooltip is finished.
struct PreparedElement<'s> {
    element: &'s PlotElement,
    regions: Vec<Region>,
    tooltip: TooltipAccumulator,
    category: Option<(Option<u32>, String)>,
}

impl ChartAssembler<'_> {
    /// Builds the plot area with one element area per plotted element,
    /// indexed by a grid over the plot.
    pub(super) fn build_plot(&mut self, scene: &VisualScene) -> AreaNode {
        let (sx, sy) = scene.scale_factors();

        let mut prepared = Vec::with_capacity(scene.elements.len());
        for element in &scene.elements {
            if self.cancelled("elements") {
                break;
            }
            let regions: Vec<Region> = element
                .shapes
                .iter()
                .map(|shape| shape.scaled(sx, sy).to_region())
                .collect();
            if regions.is_empty() {
                trace!(row = element.row, col = element.col; "Element without shapes skipped");
                continue;
            }
            let tooltip = self.tooltips.element_tooltip(element, &mut self.palette);
            let category = self.category_of(element, &regions);
            prepared.push(PreparedElement {
                element,
                regions,
                tooltip,
                category,
            });
        }

        let combined = self.binding.combined_tooltips;
        let mut nodes = Vec::with_capacity(prepared.len());
        for (index, item) in prepared.iter().enumerate() {
            let accumulator = match &item.category {
                Some(category) if combined => {
                    let siblings = prepared
                        .iter()
                        .enumerate()
                        .filter(|(other, sibling)| {
                            *other != index && sibling.category.as_ref() == Some(category)
                        })
                        .map(|(_, sibling)| &sibling.tooltip);
                    self.tooltips.combine(item.tooltip.clone(), siblings)
                }
                _ => item.tooltip.clone(),
            };
            nodes.push(self.build_element(item, accumulator));
        }

        let columns = self.config.bounds().grid_columns();
        let rows = self.config.bounds().grid_rows();
        AreaNode::new(AreaKind::Plot, rect(self.bounds.plot_bounds()))
            .with_children(Layout::Grid { columns, rows }, nodes)
    }

    fn build_element(&mut self, item: &PreparedElement<'_>, tooltip: TooltipAccumulator) -> AreaNode {
        let element = item.element;
        let point = (element.row, element.col);

        let tooltip = tooltip.finish(&mut self.palette);
        if let Some(tooltip) = &tooltip {
            let text = tooltip.to_text(&self.palette);
            let index = self.palette.put(&text);
            self.point_tooltips.insert(point, index);
        }

        let links = self.links.resolve(element, &mut self.palette);
        let multi_shape =
            item.regions.len() > 1 || element.shapes.iter().any(SceneShape::is_multi_part);
        if multi_shape {
            self.point_shapes
                .entry(point)
                .or_default()
                .extend(item.regions.iter().cloned());
            for shape in 0..item.regions.len() {
                for link in &links {
                    self.shape_links
                        .push(ShapeLink::new(point, shape, link.clone()));
                }
            }
        }

        let value = element
            .measure
            .as_deref()
            .and_then(|measure| self.data.value(element.row, measure))
            .map(|value| self.tooltips.formatter().format_default(value));
        trace!(row = element.row, col = element.col, links = links.len(); "Built element area");

        AreaNode::new(AreaKind::Element, item.regions.clone())
            .with_point(element.row, element.col)
            .with_facet(element.facet)
            .with_light_weight(element.light_weight)
            .with_field(self.palette.put_opt(element.measure.as_deref()))
            .with_value(self.palette.put_opt(value.as_deref()))
            .with_tooltip(tooltip)
            .with_hyperlinks(links)
    }

    /// Returns the category an element shares with its siblings: its facet
    /// and first dimension value, or else the categorical axis label nearest
    /// to it.
    fn category_of(
        &self,
        element: &PlotElement,
        regions: &[Region],
    ) -> Option<(Option<u32>, String)> {
        let value = element
            .dimensions
            .first()
            .and_then(|field| self.data.value(element.row, field))
            .filter(|value| !value.is_null())
            .map(|value| self.tooltips.formatter().format_default(value));
        let key = match value {
            Some(value) => value,
            None => {
                let center = union_bounds(regions)?.center();
                self.categories.nearest(element.facet, center)?.to_string()
            }
        };
        Some((element.facet, key))
    }
}

#[cfg(test)]
mod tests {
    use chartarea_core::{
        geometry::{Bounds, Point, Size},
        region::HitTest,
    };

    use super::*;
    use crate::{
        assemble::NeverCancel,
        binding::Binding,
        config::AppConfig,
        data::{DataSet, Field, HyperlinkDef, LinkParam},
        scene::{AxisInstance, AxisLabel, AxisSlot},
    };

    fn bar(row: usize, col: usize, x: f64, y: f64, height: f64) -> PlotElement {
        let mut element = PlotElement::new(row, col);
        element.dimensions = vec!["region".to_string()];
        element.measure = Some("sales".to_string());
        element.shapes = vec![SceneShape::Rect {
            bounds: Bounds::from_rect(x, y, 20.0, height),
        }];
        element
    }

    fn data() -> DataSet {
        DataSet::new()
            .with_field(Field::dimension("region"))
            .with_field(
                Field::measure("sales").with_hyperlink(
                    HyperlinkDef::new("Details", "https://example.com/sales")
                        .with_param(LinkParam::new("region", "region")),
                ),
            )
            .with_row(vec!["East".into(), 10.0.into()])
            .with_row(vec!["East".into(), 5.0.into()])
            .with_row(vec!["West".into(), 7.0.into()])
    }

    fn scene() -> VisualScene {
        let mut scene = VisualScene::new(
            Size::new(400.0, 300.0),
            Bounds::from_rect(50.0, 20.0, 300.0, 230.0),
        );
        scene.elements = vec![
            bar(0, 0, 60.0, 150.0, 100.0),
            bar(1, 1, 60.0, 100.0, 50.0),
            bar(2, 0, 200.0, 180.0, 70.0),
        ];
        scene
    }

    #[test]
    fn test_combined_tooltips_share_category() {
        let scene = scene();
        let data = data();
        let binding = Binding::new().with_combined_tooltips(true);
        let config = AppConfig::default();
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        assert_eq!(
            chart.tooltip_text(0, 0),
            Some("region: East\nsales: 10\nsales: 5")
        );
        assert_eq!(chart.tooltip_text(2, 0), Some("region: West\nsales: 7"));
    }

    #[test]
    fn test_element_hyperlinks() {
        let scene = scene();
        let data = data();
        let (binding, config) = (Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        let plot = chart.plot().expect("plot");
        let element = &plot.children()[2];
        let link = &element.hyperlinks()[0];
        assert_eq!(chart.text(link.target()), Some("https://example.com/sales"));
        let (name, value) = link.params()[0];
        assert_eq!(chart.text(name), Some("region"));
        assert_eq!(chart.text(value), Some("West"));
        assert_eq!(chart.text(element.value()), Some("7"));
    }

    #[test]
    fn test_multi_shape_element_maps() {
        let mut scene = scene();
        let mut slice = PlotElement::new(0, 3);
        slice.measure = Some("sales".to_string());
        slice.shapes = vec![
            SceneShape::Rect {
                bounds: Bounds::from_rect(300.0, 30.0, 10.0, 10.0),
            },
            SceneShape::Rect {
                bounds: Bounds::from_rect(320.0, 30.0, 10.0, 10.0),
            },
        ];
        scene.elements.push(slice);

        let data = data();
        let (binding, config) = (Binding::new(), AppConfig::default());
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        let shapes = &chart.point_shapes()[&(0, 3)];
        assert_eq!(shapes.len(), 2);
        assert!(shapes[1].contains(Point::new(325.0, 35.0)));
        assert_eq!(chart.shape_links().len(), 2);
        assert_eq!(chart.shape_links()[1].shape(), 1);
    }

    #[test]
    fn test_category_falls_back_to_axis_label() {
        let mut scene = scene();
        for element in &mut scene.elements {
            element.dimensions.clear();
        }
        let mut axis = AxisInstance::new(AxisSlot::Bottom, Bounds::from_rect(50.0, 250.0, 300.0, 20.0));
        axis.field = Some("region".to_string());
        axis.labels = vec![
            AxisLabel::new("East", Bounds::from_rect(55.0, 255.0, 30.0, 10.0)),
            AxisLabel::new("West", Bounds::from_rect(195.0, 255.0, 30.0, 10.0)),
        ];
        scene.axes.push(axis);

        let data = data();
        let binding = Binding::new().with_combined_tooltips(true);
        let config = AppConfig::default();
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble();

        assert_eq!(chart.tooltip_text(1, 1), Some("sales: 5\nsales: 10"));
        assert_eq!(chart.tooltip_text(2, 0), Some("sales: 7"));
    }
}
