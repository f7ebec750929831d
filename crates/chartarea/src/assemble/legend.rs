use crate::{
    area::{AreaKind, AreaNode, Layout},
    assemble::{ChartAssembler, rect},
    scene::{Legend, VisualScene},
};

impl ChartAssembler<'_> {
    /// Builds the legend group, one sorted legend area per legend.
    pub(super) fn build_legend(&mut self, scene: &VisualScene) -> Option<AreaNode> {
        let group = scene.legend.as_ref().filter(|group| !group.legends.is_empty())?;

        let mut legends = Vec::with_capacity(group.legends.len());
        for legend in &group.legends {
            legends.push(self.build_legend_area(legend));
        }
        let node = AreaNode::new(AreaKind::LegendGroup, rect(self.bounds.to_image(group.bounds)))
            .with_children(Layout::Sorted, legends);
        Some(node)
    }

    fn build_legend_area(&mut self, legend: &Legend) -> AreaNode {
        let field_name = legend.field.as_deref();
        let field = self.palette.put_opt(field_name);

        let mut children = Vec::with_capacity(legend.items.len() + 1);
        if let (Some(title), Some(bounds)) = (&legend.title, legend.title_bounds) {
            children.push(
                AreaNode::new(AreaKind::LegendTitle, rect(self.bounds.to_image(bounds)))
                    .with_label(self.palette.put(title))
                    .with_field(field),
            );
        }
        for item in &legend.items {
            let raw = item.raw_value();
            let tooltip = self
                .tooltips
                .label_tooltip(field_name, raw, &item.label, &mut self.palette);
            children.push(
                AreaNode::new(AreaKind::LegendItem, rect(self.bounds.to_image(item.bounds)))
                    .with_label(self.palette.put(&item.label))
                    .with_field(field)
                    .with_value(self.palette.put(raw))
                    .with_tooltip(tooltip),
            );
        }

        AreaNode::new(AreaKind::Legend, rect(self.bounds.to_image(legend.bounds)))
            .with_field(field)
            .with_children(Layout::Sorted, children)
    }
}
