//! 视口计算：根据选中实体的范围生成 SVG `viewBox`。

use dxfsvg_core::document::Entity;
use dxfsvg_core::geometry::{Bounds2D, Point2};
use tracing::debug;

use crate::geometry::{arc_geometry, circle_geometry, line_endpoints, polyline_vertices};

/// 没有可用范围或范围退化时使用的边长。
pub const DEFAULT_EXTENT: f64 = 4096.0;

/// 参与范围计算的实体类型。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsMode {
    /// 只统计直线端点与多段线顶点。
    #[default]
    LinearOnly,
    /// 额外统计圆、圆弧（按外接框）与样条控制点。
    IncludeCurves,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// 原点处的默认视口。
    pub fn fallback(extent: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: extent,
            height: extent,
        }
    }
}

/// 汇总实体范围；没有任何贡献点时返回空边界框。
pub fn geometry_bounds<'a, I>(entities: I, mode: BoundsMode) -> Bounds2D
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut bounds = Bounds2D::empty();
    for entity in entities {
        match entity {
            Entity::Line(line) => {
                if let Some((start, end)) = line_endpoints(line) {
                    bounds.include_point(start);
                    bounds.include_point(end);
                }
            }
            Entity::Polyline(polyline) => {
                for vertex in polyline_vertices(polyline).unwrap_or_default() {
                    bounds.include_point(*vertex);
                }
            }
            _ if mode == BoundsMode::LinearOnly => {}
            Entity::Circle(circle) => {
                if let Some((center, radius)) = circle_geometry(circle) {
                    include_disc(&mut bounds, center, radius);
                }
            }
            Entity::Arc(arc) => {
                if let Some(geometry) = arc_geometry(arc) {
                    include_disc(&mut bounds, geometry.center, geometry.radius);
                }
            }
            Entity::Spline(spline) => {
                for point in spline.control_points.iter().filter(|p| p.is_finite()) {
                    bounds.include_point(*point);
                }
            }
            Entity::Dimension(_) | Entity::Text(_) | Entity::MText(_) => {}
        }
    }
    bounds
}

fn include_disc(bounds: &mut Bounds2D, center: Point2, radius: f64) {
    let r = radius.abs();
    bounds.include_bounds(&Bounds2D::new(
        Point2::new(center.x() - r, center.y() - r),
        Point2::new(center.x() + r, center.y() + r),
    ));
}

/// 计算视口；范围为空时回落到 `(0, 0, extent, extent)`，单轴为零时该轴取 `extent`。
pub fn compute_viewport<'a, I>(entities: I, mode: BoundsMode, default_extent: f64) -> Viewport
where
    I: IntoIterator<Item = &'a Entity>,
{
    let bounds = geometry_bounds(entities, mode);
    if bounds.is_empty() {
        debug!("没有可计算范围的实体，使用默认视口");
        return Viewport::fallback(default_extent);
    }
    let width = non_zero(bounds.width(), default_extent);
    let height = non_zero(bounds.height(), default_extent);
    Viewport {
        min_x: bounds.min().x(),
        min_y: bounds.min().y(),
        width,
        height,
    }
}

#[inline]
fn non_zero(extent: f64, fallback: f64) -> f64 {
    if extent == 0.0 { fallback } else { extent }
}
