use std::path::Path;

use dxfsvg_config::{AnnotationSetting, AppConfig, ArcFlagSetting, BoundsSetting};
use dxfsvg_core::document::Document;
use dxfsvg_engine::{
    AnnotationPolicy, ArcFlagMode, BoundsMode, ConversionOptions, LayerSelection, SvgStyle,
};
use tracing::info;

use crate::errors::FrontendError;

/// 按扩展名加载 DXF 或 JSON 文档。
pub fn load_source(path: &Path) -> Result<Document, FrontendError> {
    let document = dxfsvg_io::load_document(path).map_err(|source| FrontendError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        entities = document.entity_count(),
        "文档加载成功"
    );
    Ok(document)
}

/// 把配置文件中的转换参数映射为引擎参数。空图层列表表示全部图层。
pub fn conversion_options(config: &AppConfig) -> ConversionOptions {
    let conversion = &config.conversion;
    let layers = if conversion.layers.is_empty() {
        LayerSelection::All
    } else {
        LayerSelection::only(conversion.layers.iter().cloned())
    };
    ConversionOptions {
        layers,
        arc_flags: match conversion.arc_flags {
            ArcFlagSetting::Literal => ArcFlagMode::Literal,
            ArcFlagSetting::Normalized => ArcFlagMode::Normalized,
        },
        bounds: match conversion.bounds {
            BoundsSetting::Linear => BoundsMode::LinearOnly,
            BoundsSetting::IncludeCurves => BoundsMode::IncludeCurves,
        },
        annotations: match conversion.annotations {
            AnnotationSetting::FirstEntry => AnnotationPolicy::FirstEntry,
            AnnotationSetting::Nearest => AnnotationPolicy::NearestAnchor,
        },
        default_extent: conversion.default_extent,
        style: SvgStyle {
            stroke: config.style.stroke.clone(),
            stroke_width: config.style.stroke_width,
        },
    }
}
