//! 端到端转换流程：筛选 → 提取标注 → 几何转换 → 视口 → 装配。

use dxfsvg_core::document::Document;
use tracing::{debug, info};

use crate::annotate::{AnnotationPolicy, SvgStyle, assemble};
use crate::bounds::{BoundsMode, DEFAULT_EXTENT, Viewport, compute_viewport};
use crate::dimensions::extract_dimensions;
use crate::errors::EngineError;
use crate::geometry::{ArcFlagMode, VectorGroup, convert_entities};
use crate::layers::{LayerSelection, document_entities, select_entities};

/// 单次转换的全部可调参数。
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub layers: LayerSelection,
    pub arc_flags: ArcFlagMode,
    pub bounds: BoundsMode,
    pub annotations: AnnotationPolicy,
    pub default_extent: f64,
    pub style: SvgStyle,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            layers: LayerSelection::All,
            arc_flags: ArcFlagMode::default(),
            bounds: BoundsMode::default(),
            annotations: AnnotationPolicy::default(),
            default_extent: DEFAULT_EXTENT,
            style: SvgStyle::default(),
        }
    }
}

impl ConversionOptions {
    pub fn with_layers(mut self, layers: LayerSelection) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_arc_flags(mut self, mode: ArcFlagMode) -> Self {
        self.arc_flags = mode;
        self
    }

    pub fn with_bounds(mut self, mode: BoundsMode) -> Self {
        self.bounds = mode;
        self
    }

    pub fn with_annotations(mut self, policy: AnnotationPolicy) -> Self {
        self.annotations = policy;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.default_extent.is_finite() && self.default_extent > 0.0) {
            return Err(EngineError::InvalidExtent(self.default_extent));
        }
        if !(self.style.stroke_width.is_finite() && self.style.stroke_width > 0.0) {
            return Err(EngineError::InvalidStrokeWidth(self.style.stroke_width));
        }
        if self.style.stroke.trim().is_empty() {
            return Err(EngineError::EmptyStroke);
        }
        Ok(())
    }
}

/// 转换结果。
#[derive(Debug, Clone)]
pub struct Conversion {
    pub markup: String,
    pub viewport: Viewport,
    pub groups: Vec<VectorGroup>,
    /// 提取到的不同标注标签数。
    pub dimension_count: usize,
}

impl Conversion {
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn annotated_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|group| group.annotation.is_some())
            .count()
    }
}

/// 把文档转换为带标注的 SVG。文档本身不会被修改。
pub fn convert(document: &Document, options: &ConversionOptions) -> Result<Conversion, EngineError> {
    options.validate()?;

    let selected = select_entities(document_entities(document), &options.layers);
    debug!(
        selected = selected.len(),
        total = document.entity_count(),
        "图层筛选完成"
    );

    let dimensions = extract_dimensions(document);
    let mut groups = convert_entities(selected.iter().copied(), options.arc_flags);
    let viewport = compute_viewport(selected.iter().copied(), options.bounds, options.default_extent);
    let markup = assemble(
        &mut groups,
        &dimensions,
        options.annotations.matcher(),
        &viewport,
        &options.style,
    );

    let conversion = Conversion {
        markup,
        viewport,
        groups,
        dimension_count: dimensions.len(),
    };
    info!(
        groups = conversion.group_count(),
        annotated = conversion.annotated_count(),
        dimensions = conversion.dimension_count,
        "文档转换完成"
    );
    Ok(conversion)
}
