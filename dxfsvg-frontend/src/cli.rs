//! 终端输出：批量转换摘要与诊断报告。

use std::fmt::Write;

use dxfsvg_core::document::DimensionKind;
use dxfsvg_engine::{DimensionReport, LayerCount};

use crate::batch::BatchReport;

pub fn format_batch_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for file in report.succeeded() {
        let _ = writeln!(
            out,
            "已转换 {} -> {}（分组 {}，带标注 {}，标注标签 {}）",
            file.input.display(),
            file.output.display(),
            file.groups,
            file.annotated,
            file.dimensions
        );
    }
    for (path, err) in report.failed() {
        let _ = writeln!(out, "转换失败 {}: {err}", path.display());
    }
    let _ = writeln!(
        out,
        "共 {} 个文件，成功 {}，失败 {}",
        report.outcomes.len(),
        report.outcomes.len() - report.failure_count(),
        report.failure_count()
    );
    out
}

pub fn format_layer_inventory(inventory: &[LayerCount]) -> String {
    let mut out = String::new();
    if inventory.is_empty() {
        out.push_str("文档中没有实体。\n");
        return out;
    }
    out.push_str("图层实体统计：\n");
    for entry in inventory {
        let _ = writeln!(out, "  - {}: {}", entry.layer, entry.count);
    }
    out
}

pub fn format_dimension_reports(reports: &[DimensionReport]) -> String {
    let mut out = String::new();
    if reports.is_empty() {
        out.push_str("没有找到标注实体。\n");
        return out;
    }
    for (index, report) in reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "标注 #{} 句柄={} 图层={} 类型={}",
            index + 1,
            report.handle.as_deref().unwrap_or("-"),
            report.layer,
            kind_label(report.kind)
        );
        let _ = writeln!(
            out,
            "  测量值={} 实际测量值={}",
            optional_number(report.measurement),
            optional_number(report.actual_measurement)
        );
        let _ = writeln!(
            out,
            "  文字覆盖={}",
            report.text_override.as_deref().unwrap_or("(无)")
        );
        match (&report.block, report.block_found) {
            (Some(name), true) => {
                let _ = writeln!(out, "  块={} 子实体数={}", name, report.block_entities.len());
                for child in &report.block_entities {
                    let _ = write!(out, "    - {}", child.kind);
                    if let Some(content) = &child.content {
                        let _ = write!(out, " 内容={content:?}");
                    }
                    if let Some(height) = child.height {
                        let _ = write!(out, " 字高={height}");
                    }
                    if let Some(width) = child.width {
                        let _ = write!(out, " 宽度={width}");
                    }
                    out.push('\n');
                }
            }
            (Some(name), false) => {
                let _ = writeln!(out, "  块={name}（文档中不存在）");
            }
            (None, _) => out.push_str("  块=(无)\n"),
        }
        let _ = writeln!(out, "  解析标签={:?}", report.resolved_label);
    }
    out
}

fn kind_label(kind: DimensionKind) -> String {
    match kind {
        DimensionKind::Linear => "线性".to_string(),
        DimensionKind::Aligned => "对齐".to_string(),
        DimensionKind::Angular => "角度".to_string(),
        DimensionKind::Diameter => "直径".to_string(),
        DimensionKind::Radius => "半径".to_string(),
        DimensionKind::Angular3Point => "三点角度".to_string(),
        DimensionKind::Ordinate => "坐标".to_string(),
        DimensionKind::Unknown(code) => format!("未知({code})"),
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map_or_else(|| "(无)".to_string(), |v| v.to_string())
}
