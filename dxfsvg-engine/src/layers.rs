//! 图层筛选。

use std::collections::BTreeSet;

use dxfsvg_core::document::{Document, Entity};

/// 要转换的图层集合；`All` 表示不做筛选。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayerSelection {
    #[default]
    All,
    /// 图层名精确匹配（区分大小写）。空集合不会选中任何实体。
    Only(BTreeSet<String>),
}

impl LayerSelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn includes(&self, layer: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(layer),
        }
    }
}

/// 保持原有顺序返回选中图层上的实体。
pub fn select_entities<'a, I>(entities: I, selection: &LayerSelection) -> Vec<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    entities
        .into_iter()
        .filter(|entity| selection.includes(entity.layer_name()))
        .collect()
}

/// 文档模型空间中的实体，按插入顺序。
pub fn document_entities(document: &Document) -> impl Iterator<Item = &Entity> {
    document.entities().map(|(_, entity)| entity)
}
