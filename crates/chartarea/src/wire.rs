//! Binary encoding of an assembled chart.
//!
//! The layout is documented once in [`schema`] and shared by [`encode`] and
//! [`decode`]. The stream carries the palette once, then the area tree with
//! every string replaced by its palette index, then the auxiliary maps.

mod decode;
mod encode;
pub mod schema;

pub use decode::decode;
pub use encode::encode;

#[cfg(test)]
mod tests {
    use chartarea_core::{
        geometry::{Bounds, Point, Size},
        region::HitTest,
    };
    use float_cmp::approx_eq;

    use super::*;
    use crate::{
        area::{Area, AreaKind},
        assemble::{AssembledChart, ChartAssembler, NeverCancel},
        binding::Binding,
        config::AppConfig,
        data::{DataSet, Field, HyperlinkDef, LinkParam},
        error::DecodeError,
        scene::{AxisInstance, AxisLabel, AxisSlot, PlotElement, SceneShape, VisualScene},
    };

    fn chart() -> AssembledChart {
        let mut scene = VisualScene::new(
            Size::new(400.0, 300.0),
            Bounds::from_rect(50.0, 20.0, 300.0, 230.0),
        );
        let mut axis = AxisInstance::new(AxisSlot::Bottom, Bounds::from_rect(50.0, 250.0, 300.0, 20.0));
        axis.field = Some("region".to_string());
        axis.labels = vec![AxisLabel::new("East", Bounds::from_rect(60.0, 255.0, 30.0, 10.0))];
        scene.axes.push(axis);

        let mut bar = PlotElement::new(0, 0);
        bar.dimensions = vec!["region".to_string()];
        bar.measure = Some("sales".to_string());
        bar.shapes = vec![SceneShape::Rect {
            bounds: Bounds::from_rect(60.0, 100.0, 30.0, 150.0),
        }];
        let mut slice = PlotElement::new(0, 1);
        slice.measure = Some("sales".to_string());
        slice.shapes = vec![
            SceneShape::Path {
                contours: vec![
                    vec![Point::new(200.0, 50.0), Point::new(240.0, 50.0), Point::new(220.5, 90.25)],
                    vec![Point::new(250.0, 50.0), Point::new(290.0, 50.0), Point::new(270.0, 90.0)],
                ],
            },
            SceneShape::Ellipse {
                center: Point::new(300.0, 200.0),
                radius_x: 8.0,
                radius_y: 4.0,
            },
            SceneShape::Line {
                from: Point::new(100.0, 60.0),
                to: Point::new(180.0, 60.0),
                width: 2.0,
            },
        ];
        scene.elements = vec![bar, slice];

        let data = DataSet::new()
            .with_field(Field::dimension("region"))
            .with_field(Field::measure("sales").with_hyperlink(
                HyperlinkDef::new("Open", "https://example.com").with_param(LinkParam::new("r", "region")),
            ))
            .with_row(vec!["East".into(), 12.5.into()]);
        let binding = Binding::new();
        let config = AppConfig::default();
        ChartAssembler::new(Some(&scene), &data, &binding, &config, &NeverCancel).assemble()
    }

    fn assert_same_tree(left: &Area, right: &Area, chart: &AssembledChart, decoded: &AssembledChart) {
        assert_eq!(left.kind(), right.kind());
        let (a, b) = (left.bounds(), right.bounds());
        assert!(approx_eq!(f64, a.min_x(), b.min_x(), epsilon = 1e-9));
        assert!(approx_eq!(f64, a.min_y(), b.min_y(), epsilon = 1e-9));
        assert!(approx_eq!(f64, a.width(), b.width(), epsilon = 1e-9));
        assert!(approx_eq!(f64, a.height(), b.height(), epsilon = 1e-9));
        assert_eq!(chart.text(left.label()), decoded.text(right.label()));
        assert_eq!(
            left.tooltip().map(|tooltip| tooltip.to_text(chart.palette())),
            right.tooltip().map(|tooltip| tooltip.to_text(decoded.palette()))
        );
        assert_eq!(left.children().len(), right.children().len());
        for (l, r) in left.children().iter().zip(right.children()) {
            assert_same_tree(l, r, chart, decoded);
        }
    }

    #[test]
    fn test_round_trip() {
        let chart = chart();
        let bytes = encode(&chart);
        let decoded = decode(&bytes).expect("decodes");

        assert_same_tree(chart.root(), decoded.root(), &chart, &decoded);
        assert_eq!(chart.palette(), decoded.palette());
        assert_eq!(chart.point_tooltips(), decoded.point_tooltips());
        assert_eq!(chart.shape_links(), decoded.shape_links());
        assert_eq!(chart.point_shapes().len(), decoded.point_shapes().len());
        assert_eq!(decoded.tooltip_text(0, 0), Some("region: East\nsales: 12.5"));

        let plot = decoded.plot().expect("plot");
        assert_eq!(plot.composition(), chart.plot().expect("plot").composition());
        let slice = &plot.children()[1];
        assert_eq!(slice.regions(), chart.plot().expect("plot").children()[1].regions());
        assert_eq!(decoded.hit_test(Point::new(70.0, 150.0)).len(), 3);
        assert!(decoded.point_shapes()[&(0, 1)][0].contains(Point::new(220.0, 60.0)));
    }

    #[test]
    fn test_header_errors() {
        let bytes = encode(&chart());

        let mut wrong_magic = bytes.clone();
        wrong_magic[0] = b'X';
        assert_eq!(decode(&wrong_magic), Err(DecodeError::InvalidMagic));

        let mut wrong_version = bytes.clone();
        wrong_version[4..6].copy_from_slice(&7u16.to_be_bytes());
        assert_eq!(decode(&wrong_version), Err(DecodeError::UnsupportedVersion(7)));

        assert!(matches!(decode(&bytes[..3]), Err(DecodeError::UnexpectedEnd(_))));
        assert!(matches!(
            decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_root_tag() {
        let bytes = encode(&chart());
        let palette_len = chart().palette().iter().map(|value| 4 + value.len()).sum::<usize>();
        // magic, version, length, palette count, palette, flags, root length
        let root = 4 + 2 + 4 + 4 + palette_len + 1 + 4;

        let mut corrupted = bytes.clone();
        corrupted[root] = 0xEE;
        assert_eq!(
            decode(&corrupted),
            Err(DecodeError::InvalidTag {
                what: "area kind",
                tag: 0xEE
            })
        );
    }

    fn stream_with_palette(values: &[&str]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(values.len() as u32).to_be_bytes());
        for value in values {
            body.extend_from_slice(&(value.len() as u32).to_be_bytes());
            body.extend_from_slice(value.as_bytes());
        }
        let mut bytes = schema::MAGIC.to_vec();
        bytes.extend_from_slice(&schema::VERSION.to_be_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&body);
        bytes
    }

    #[test]
    fn test_palette_entries_must_be_distinct_and_non_empty() {
        assert_eq!(
            decode(&stream_with_palette(&["East", "Open", "East"])),
            Err(DecodeError::DuplicateString(2))
        );
        assert_eq!(
            decode(&stream_with_palette(&["East", ""])),
            Err(DecodeError::EmptyString(1))
        );
        // A clean palette gets past the table and fails on the missing tree.
        assert!(matches!(
            decode(&stream_with_palette(&["East", "Open"])),
            Err(DecodeError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn test_duplicate_in_encoded_chart_is_rejected() {
        let chart = chart();
        let mut bytes = encode(&chart);

        // (offset of the string bytes, length) per palette entry
        let mut entries = Vec::new();
        let mut offset = 4 + 2 + 4 + 4;
        for value in chart.palette().iter() {
            entries.push((offset + 4, value.len()));
            offset += 4 + value.len();
        }
        let (first, second) = (0..entries.len())
            .flat_map(|i| (i + 1..entries.len()).map(move |j| (i, j)))
            .find(|&(i, j)| entries[i].1 == entries[j].1)
            .expect("palette has two entries of equal length");

        let (from, len) = entries[first];
        let to = entries[second].0;
        bytes.copy_within(from..from + len, to);
        assert_eq!(decode(&bytes), Err(DecodeError::DuplicateString(second)));
    }

    #[test]
    fn test_partial_flag_survives() {
        let data = DataSet::new();
        let (binding, config) = (Binding::new(), AppConfig::default());
        let scene = VisualScene::new(Size::new(10.0, 10.0), Bounds::from_rect(0.0, 0.0, 10.0, 10.0));
        let cancel = std::sync::atomic::AtomicBool::new(true);
        let chart = ChartAssembler::new(Some(&scene), &data, &binding, &config, &cancel).assemble();

        let decoded = decode(&encode(&chart)).expect("decodes");
        assert!(decoded.is_partial());
        assert_eq!(decoded.root().kind(), AreaKind::Content);
    }
}
