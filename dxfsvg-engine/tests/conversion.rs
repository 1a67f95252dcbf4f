use std::path::PathBuf;

use dxfsvg_core::document::{Arc, Dimension, Document, Entity, Line};
use dxfsvg_core::geometry::Point2;
use dxfsvg_engine::{
    AnnotationPolicy, ArcFlagMode, BoundsMode, ConversionOptions, LayerSelection, Viewport,
    convert, extract_dimensions,
};
use dxfsvg_io::{DocumentLoader, DxfFacade};

fn floorplan() -> Document {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../dxfsvg-io/tests/data/floorplan.dxf");
    DxfFacade::new().load(&path).expect("读取样例 DXF 失败")
}

fn group_paths(markup: &str) -> Vec<&str> {
    markup
        .lines()
        .filter_map(|line| line.trim().strip_prefix(r#"<path d=""#))
        .filter_map(|rest| rest.strip_suffix(r#""/>"#))
        .collect()
}

#[test]
fn floorplan_dimensions_resolve_through_blocks() {
    let dimensions = extract_dimensions(&floorplan());
    let entries: Vec<_> = dimensions
        .iter()
        .map(|(label, value)| (label.to_string(), value.measurement))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("Living Room".to_string(), 3000.0),
            ("Kitchen".to_string(), 2000.0),
            ("Hall".to_string(), 1200.0),
        ]
    );
}

#[test]
fn floorplan_converts_all_drawable_entities() {
    let conversion = convert(&floorplan(), &ConversionOptions::default()).expect("转换失败");

    let ids: Vec<_> = conversion.groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["patch-1A", "patch-1B", "patch-1C", "patch-1D", "patch-1E", "patch-1F"]
    );
    assert_eq!(
        group_paths(&conversion.markup),
        vec![
            "M 0 0 L 3000 0",
            "M 0 0 L 3000 0 L 3000 2000 Z",
            "M 750 500 A 250 250 0 0 1 500 750",
            "M 8 5 A 3 3 0 1 1 2 5 A 3 3 0 1 1 8 5",
            "M 0 0 L 100 200 L 200 -100 L 300 0",
            "M 10 10 L 20 10",
        ]
    );
    assert!(
        conversion
            .markup
            .contains(r#"viewBox="0 0 3000 2000" width="3000" height="2000""#)
    );

    // 每个分组都带上映射中第一条标注
    assert_eq!(conversion.dimension_count, 3);
    assert_eq!(conversion.annotated_count(), 6);
    assert_eq!(
        conversion
            .markup
            .matches("<!-- Dimension: Living Room | Measurement: 3000 | Group Id: patch-")
            .count(),
        6
    );
    assert!(conversion.markup.contains(
        "  <!-- Dimension: Living Room | Measurement: 3000 | Group Id: patch-1D -->\n  <g id=\"patch-1D\""
    ));
}

#[test]
fn layer_selection_limits_groups_but_not_dimensions() {
    let options = ConversionOptions::default().with_layers(LayerSelection::only(["KT-Dim"]));
    let conversion = convert(&floorplan(), &options).expect("转换失败");
    let ids: Vec<_> = conversion.groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["patch-1A", "patch-1B", "patch-1C", "patch-1E"]);
    // ANNO 图层上的标注仍然参与提取
    assert_eq!(conversion.dimension_count, 3);
}

#[test]
fn curve_bounds_are_opt_in() {
    let options = ConversionOptions::default()
        .with_layers(LayerSelection::only(["KT-Dim"]))
        .with_bounds(BoundsMode::IncludeCurves);
    let conversion = convert(&floorplan(), &options).expect("转换失败");
    assert_eq!(
        conversion.viewport,
        Viewport {
            min_x: 0.0,
            min_y: -100.0,
            width: 3000.0,
            height: 2100.0,
        }
    );
}

#[test]
fn unknown_layer_produces_an_empty_drawing() {
    let options = ConversionOptions::default().with_layers(LayerSelection::only(["NOPE"]));
    let conversion = convert(&floorplan(), &options).expect("转换失败");
    assert_eq!(conversion.group_count(), 0);
    assert!(conversion.markup.contains(r#"viewBox="0 0 4096 4096""#));
    assert!(!conversion.markup.contains("<g "));
}

#[test]
fn nearest_policy_uses_dimension_positions() {
    let mut doc = Document::new();
    for (handle, x) in [("10", 0.0), ("11", 1000.0)] {
        doc.add_entity(Entity::Line(Line {
            start: Some(Point2::new(x, 0.0)),
            end: Some(Point2::new(x + 10.0, 0.0)),
            layer: "KT-Dim".to_string(),
            handle: Some(handle.to_string()),
        }));
    }
    for (label, x, value) in [("West", 0.0, 1.0), ("East", 1000.0, 2.0)] {
        doc.add_entity(Entity::Dimension(Dimension {
            text: Some(label.to_string()),
            measurement: Some(value),
            text_midpoint: Some(Point2::new(x, 50.0)),
            layer: "KT-Dim".to_string(),
            ..Dimension::default()
        }));
    }

    let first = convert(&doc, &ConversionOptions::default()).expect("转换失败");
    assert_eq!(first.markup.matches("Dimension: West").count(), 2);

    let nearest = convert(
        &doc,
        &ConversionOptions::default().with_annotations(AnnotationPolicy::NearestAnchor),
    )
    .expect("转换失败");
    assert!(
        nearest
            .markup
            .contains("Dimension: West | Measurement: 1 | Group Id: patch-10")
    );
    assert!(
        nearest
            .markup
            .contains("Dimension: East | Measurement: 2 | Group Id: patch-11")
    );
}

#[test]
fn arc_flag_mode_changes_wrapping_arcs_only() {
    let mut doc = Document::new();
    doc.add_entity(Entity::Arc(Arc {
        center: Some(Point2::new(0.0, 0.0)),
        radius: Some(1.0),
        start_angle: Some(270.0),
        end_angle: Some(180.0),
        layer: "0".to_string(),
        handle: Some("A".to_string()),
    }));

    let literal = convert(&doc, &ConversionOptions::default()).expect("转换失败");
    let normalized = convert(
        &doc,
        &ConversionOptions::default().with_arc_flags(ArcFlagMode::Normalized),
    )
    .expect("转换失败");
    assert!(literal.groups[0].path.contains(" A 1 1 0 0 1 "), "{}", literal.groups[0].path);
    assert!(normalized.groups[0].path.contains(" A 1 1 0 1 1 "), "{}", normalized.groups[0].path);
}

#[test]
fn conversion_leaves_document_untouched() {
    let doc = floorplan();
    let before = format!("{doc:?}");
    let _ = convert(&doc, &ConversionOptions::default()).expect("转换失败");
    assert_eq!(format!("{doc:?}"), before);
}

#[test]
fn measurement_placeholder_text_yields_no_label() {
    let mut source = [
        "0", "SECTION", "2", "BLOCKS",
        "0", "BLOCK", "2", "*D9", "10", "0.0", "20", "0.0",
        "0", "LINE", "8", "0", "10", "0.0", "20", "0.0", "11", "5.0", "21", "0.0",
        "0", "ENDBLK",
        "0", "ENDSEC",
        "0", "SECTION", "2", "ENTITIES",
        "0", "DIMENSION", "5", "3F", "8", "KT-Dim", "1", "<>", "2", "*D9", "42", "5.0",
        "0", "DIMENSION", "5", "40", "8", "KT-Dim", "1", "<>", "42", "7.0",
        "0", "ENDSEC",
        "0", "EOF",
    ]
    .join("\n");
    source.push('\n');
    let doc = DxfFacade::new().parse_str(&source).expect("解析 DXF 失败");

    let texts: Vec<_> = doc
        .entities()
        .filter_map(|(_, entity)| match entity {
            Entity::Dimension(dimension) => Some(dimension.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![None, None]);
    assert!(extract_dimensions(&doc).is_empty());
}
