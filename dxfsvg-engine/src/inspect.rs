//! 诊断报告：图层实体清单与标注检查。

use std::collections::BTreeMap;

use dxfsvg_core::document::{DimensionKind, Document, Entity};

use crate::dimensions::resolve_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerCount {
    pub layer: String,
    pub count: usize,
}

/// 按图层名排序统计模型空间实体数（不含块内实体）。
pub fn layer_inventory(document: &Document) -> Vec<LayerCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, entity) in document.entities() {
        *counts.entry(entity.layer_name()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(layer, count)| LayerCount {
            layer: layer.to_string(),
            count,
        })
        .collect()
}

/// 标注块中的单个实体摘要。
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntityReport {
    pub kind: &'static str,
    pub content: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionReport {
    pub handle: Option<String>,
    pub layer: String,
    pub kind: DimensionKind,
    pub measurement: Option<f64>,
    pub actual_measurement: Option<f64>,
    pub text_override: Option<String>,
    pub block: Option<String>,
    /// `block` 有值但文档中找不到对应块时为 `false`。
    pub block_found: bool,
    pub block_entities: Vec<BlockEntityReport>,
    /// 提取标注时实际使用的标签。
    pub resolved_label: String,
}

/// 检查前 `limit` 个标注实体；`layer` 为 `Some` 时只看该图层。
pub fn inspect_dimensions(
    document: &Document,
    layer: Option<&str>,
    limit: usize,
) -> Vec<DimensionReport> {
    document
        .entities()
        .filter_map(|(_, entity)| match entity {
            Entity::Dimension(dimension) => Some(dimension),
            _ => None,
        })
        .filter(|dimension| layer.is_none_or(|layer| dimension.layer == layer))
        .take(limit)
        .map(|dimension| {
            let block = dimension.block.as_deref().and_then(|name| document.block(name));
            DimensionReport {
                handle: dimension.handle.clone(),
                layer: dimension.layer.clone(),
                kind: dimension.kind,
                measurement: dimension.measurement,
                actual_measurement: dimension.actual_measurement,
                text_override: dimension.text.clone(),
                block: dimension.block.clone(),
                block_found: block.is_some(),
                block_entities: block
                    .map(|block| block.entities.iter().map(block_entity_report).collect())
                    .unwrap_or_default(),
                resolved_label: resolve_label(document, dimension),
            }
        })
        .collect()
}

fn block_entity_report(entity: &Entity) -> BlockEntityReport {
    let (content, height, width) = match entity {
        Entity::Text(text) => (Some(text.content.clone()), text.height, None),
        Entity::MText(mtext) => (
            Some(mtext.content.clone()),
            mtext.height,
            mtext.reference_width,
        ),
        _ => (None, None, None),
    };
    BlockEntityReport {
        kind: entity.kind_name(),
        content,
        height,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfsvg_core::document::{BlockDefinition, Dimension, Line, MText};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_block_definition(BlockDefinition {
            name: "*D1".to_string(),
            entities: vec![
                Entity::Line(Line::default()),
                Entity::MText(MText {
                    content: r"Bed\A1;room".to_string(),
                    height: Some(2.5),
                    reference_width: Some(40.0),
                    ..MText::default()
                }),
            ],
        });
        for (layer, block, text) in [
            ("KT-Dim", Some("*D1"), None),
            ("ANNO", None, Some("Hall")),
            ("KT-Dim", Some("*D7"), Some("Porch")),
        ] {
            doc.add_entity(Entity::Dimension(Dimension {
                layer: layer.to_string(),
                block: block.map(str::to_string),
                text: text.map(str::to_string),
                actual_measurement: Some(10.0),
                ..Dimension::default()
            }));
        }
        doc.add_entity(Entity::Line(Line {
            layer: "WALLS".to_string(),
            ..Line::default()
        }));
        doc
    }

    #[test]
    fn inventory_is_sorted_by_layer() {
        let inventory = layer_inventory(&sample());
        let pairs: Vec<_> = inventory
            .iter()
            .map(|entry| (entry.layer.as_str(), entry.count))
            .collect();
        assert_eq!(pairs, vec![("ANNO", 1), ("KT-Dim", 2), ("WALLS", 1)]);
    }

    #[test]
    fn dimension_reports_describe_blocks() {
        let doc = sample();
        let reports = inspect_dimensions(&doc, Some("KT-Dim"), 10);
        assert_eq!(reports.len(), 2);

        let first = &reports[0];
        assert!(first.block_found);
        assert_eq!(first.resolved_label, "Bedroom");
        assert_eq!(first.block_entities.len(), 2);
        assert_eq!(first.block_entities[1].kind, "MTEXT");
        assert_eq!(first.block_entities[1].width, Some(40.0));

        let second = &reports[1];
        assert!(!second.block_found);
        assert!(second.block_entities.is_empty());
        assert_eq!(second.resolved_label, "Porch");
    }

    #[test]
    fn limit_and_layer_filter_apply() {
        let doc = sample();
        assert_eq!(inspect_dimensions(&doc, None, 2).len(), 2);
        assert_eq!(inspect_dimensions(&doc, None, 0).len(), 0);
        assert!(inspect_dimensions(&doc, Some("WALLS"), 5).is_empty());
    }
}
