//! 标注装配：把标注注释附加到分组上并输出完整的 SVG 文档。

use std::fmt::Write;

use tracing::debug;

use crate::bounds::Viewport;
use crate::dimensions::DimensionMap;
use crate::geometry::VectorGroup;
use crate::number::JsNumber;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// 只有标识中含有该标记的分组才会被标注。
const ANNOTATED_MARKER: &str = "patch";

/// 写在分组前的注释内容。
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub label: String,
    pub measurement: f64,
}

/// 决定某个分组附加哪条标注。
pub trait AnnotationMatcher: Send + Sync {
    fn annotation_for(&self, group: &VectorGroup, dimensions: &DimensionMap) -> Option<Annotation>;
}

/// 每个符合条件的分组都附加映射中的第一条标注。
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEntryMatcher;

impl AnnotationMatcher for FirstEntryMatcher {
    fn annotation_for(&self, group: &VectorGroup, dimensions: &DimensionMap) -> Option<Annotation> {
        if !group.id.contains(ANNOTATED_MARKER) {
            return None;
        }
        dimensions.first().map(|(label, value)| Annotation {
            label: label.to_string(),
            measurement: value.measurement,
        })
    }
}

/// 选择文字位置离分组代表点最近的标注；没有位置信息的标注不参与匹配。
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestAnchorMatcher;

impl AnnotationMatcher for NearestAnchorMatcher {
    fn annotation_for(&self, group: &VectorGroup, dimensions: &DimensionMap) -> Option<Annotation> {
        if !group.id.contains(ANNOTATED_MARKER) {
            return None;
        }
        dimensions
            .iter()
            .filter_map(|(label, value)| {
                let anchor = value.anchor.filter(|anchor| anchor.is_finite())?;
                Some((label, value.measurement, anchor.distance_squared(group.reference)))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(label, measurement, _)| Annotation {
                label: label.to_string(),
                measurement,
            })
    }
}

/// 可配置的匹配策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationPolicy {
    #[default]
    FirstEntry,
    NearestAnchor,
}

impl AnnotationPolicy {
    pub fn matcher(self) -> &'static dyn AnnotationMatcher {
        match self {
            AnnotationPolicy::FirstEntry => &FirstEntryMatcher,
            AnnotationPolicy::NearestAnchor => &NearestAnchorMatcher,
        }
    }
}

/// 分组的描边样式。
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            stroke: "white".to_string(),
            stroke_width: 1.0,
        }
    }
}

/// 为分组附加标注，返回被标注的分组数。
pub fn annotate_groups(
    groups: &mut [VectorGroup],
    dimensions: &DimensionMap,
    matcher: &dyn AnnotationMatcher,
) -> usize {
    let mut annotated = 0;
    for group in groups.iter_mut() {
        group.annotation = matcher.annotation_for(group, dimensions);
        if group.annotation.is_some() {
            annotated += 1;
        }
    }
    debug!(annotated, total = groups.len(), "标注匹配完成");
    annotated
}

/// 附加标注后输出完整的 SVG 文档。
pub fn assemble(
    groups: &mut [VectorGroup],
    dimensions: &DimensionMap,
    matcher: &dyn AnnotationMatcher,
    viewport: &Viewport,
    style: &SvgStyle,
) -> String {
    annotate_groups(groups, dimensions, matcher);
    render_svg(groups, viewport, style)
}

/// 按分组顺序输出 SVG，不改动分组。
pub fn render_svg(groups: &[VectorGroup], viewport: &Viewport, style: &SvgStyle) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    let width = JsNumber(viewport.width);
    let height = JsNumber(viewport.height);
    // 写入 String 不会失败
    let _ = writeln!(
        out,
        r#"<svg xmlns="{SVG_NAMESPACE}" viewBox="{} {} {width} {height}" width="{width}" height="{height}">"#,
        JsNumber(viewport.min_x),
        JsNumber(viewport.min_y),
    );
    let stroke = escape_attribute(&style.stroke);
    let stroke_width = JsNumber(style.stroke_width);
    for group in groups {
        if let Some(annotation) = &group.annotation {
            let _ = writeln!(
                out,
                "  <!-- Dimension: {} | Measurement: {} | Group Id: {} -->",
                comment_safe(&annotation.label),
                JsNumber(annotation.measurement),
                comment_safe(&group.id),
            );
        }
        let _ = writeln!(
            out,
            r#"  <g id="{}" stroke="{stroke}" stroke-width="{stroke_width}" fill="none">"#,
            escape_attribute(&group.id),
        );
        let _ = writeln!(out, r#"    <path d="{}"/>"#, group.path);
        out.push_str("  </g>\n");
    }
    out.push_str("</svg>\n");
    out
}

/// 转义属性值中的 XML 特殊字符。
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// XML 注释中不允许出现 `--`。
fn comment_safe(value: &str) -> String {
    let mut text = value.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    text
}
