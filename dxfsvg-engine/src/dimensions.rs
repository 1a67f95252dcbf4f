//! 标注提取：把 DIMENSION 实体整理为「标签 → 测量值」映射。

use dxfsvg_core::document::{Dimension, Document, Entity};
use dxfsvg_core::geometry::Point2;
use indexmap::IndexMap;
use tracing::trace;

use crate::text::normalize_text;

/// 单个标签对应的测量值，以及可选的文字位置（供就近匹配使用）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionValue {
    pub measurement: f64,
    pub anchor: Option<Point2>,
}

/// 按首次插入顺序保存的标注映射。重复标签覆盖旧值，但保持原有位置。
#[derive(Debug, Clone, Default)]
pub struct DimensionMap {
    entries: IndexMap<String, DimensionValue>,
}

impl DimensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入标签，返回被覆盖的旧值。
    pub fn insert(&mut self, label: impl Into<String>, value: DimensionValue) -> Option<DimensionValue> {
        self.entries.insert(label.into(), value)
    }

    #[inline]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.get(label).map(|value| value.measurement)
    }

    #[inline]
    pub fn value(&self, label: &str) -> Option<&DimensionValue> {
        self.entries.get(label)
    }

    /// 迭代顺序中的第一项。
    #[inline]
    pub fn first(&self) -> Option<(&str, &DimensionValue)> {
        self.entries
            .first()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DimensionValue)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 遍历整个文档（不做图层过滤）收集标注。
pub fn extract_dimensions(document: &Document) -> DimensionMap {
    let mut map = DimensionMap::new();
    for (id, entity) in document.entities() {
        let Entity::Dimension(dimension) = entity else {
            continue;
        };
        let label = resolve_label(document, dimension);
        if label.is_empty() {
            trace!(entity = id.get(), "标注没有可用标签，忽略");
            continue;
        }
        let value = DimensionValue {
            measurement: measurement_of(dimension),
            anchor: dimension.text_midpoint.or(dimension.definition_point),
        };
        if map.insert(label, value).is_some() {
            trace!(entity = id.get(), "重复标签覆盖先前的测量值");
        }
    }
    map
}

/// `measurement` 优先，其次 `actual_measurement`，都缺失时为 0。显式的 0 不会回退。
pub(crate) fn measurement_of(dimension: &Dimension) -> f64 {
    dimension
        .measurement
        .or(dimension.actual_measurement)
        .unwrap_or(0.0)
}

/// 先取自身文字；若引用的块中存在 TEXT/MTEXT，则以第一个文字（清理格式码后）为准。
pub(crate) fn resolve_label(document: &Document, dimension: &Dimension) -> String {
    let inline = dimension.text.clone().unwrap_or_default();
    let Some(block) = dimension.block.as_deref().and_then(|name| document.block(name)) else {
        return inline;
    };
    block
        .entities
        .iter()
        .find_map(|entity| match entity {
            Entity::Text(text) => Some(normalize_text(Some(&text.content))),
            Entity::MText(mtext) => Some(normalize_text(Some(&mtext.content))),
            _ => None,
        })
        .unwrap_or(inline)
}
