//! 几何转换：把实体转换成 SVG 路径数据并分配分组标识。

use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use dxfsvg_core::document::{Arc, Circle, Entity, Line, Polyline, Spline};
use dxfsvg_core::geometry::{Bounds2D, Point2};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::annotate::Annotation;
use crate::number::push_numbers;

const GROUP_PREFIX: &str = "patch-";
const TOKEN_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 圆弧大弧标志的计算方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArcFlagMode {
    /// 直接比较 `end - start` 与 π，跨越 0° 的圆弧可能取到小弧。
    #[default]
    Literal,
    /// 先把扫掠角归一化到 `[0, 2π)` 再比较。
    Normalized,
}

impl ArcFlagMode {
    /// 角度单位为度。
    pub fn large_arc(self, start_deg: f64, end_deg: f64) -> bool {
        let start = start_deg.to_radians();
        let end = end_deg.to_radians();
        match self {
            ArcFlagMode::Literal => end - start > PI,
            ArcFlagMode::Normalized => (end - start).rem_euclid(TAU) > PI,
        }
    }
}

/// 单个实体转换后的 SVG 分组。
#[derive(Debug, Clone, PartialEq)]
pub struct VectorGroup {
    pub id: String,
    pub path: String,
    /// 代表点，就近匹配标注时使用。
    pub reference: Point2,
    pub annotation: Option<Annotation>,
}

/// 为一次转换分配唯一的分组标识。
#[derive(Debug, Default)]
pub struct GroupIdAllocator {
    used: HashSet<String>,
}

impl GroupIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 有句柄时使用 `patch-<句柄>`，否则生成随机标识并保证在本次转换中不重复。
    pub fn allocate(&mut self, handle: Option<&str>) -> String {
        if let Some(handle) = handle.filter(|handle| !handle.is_empty()) {
            let id = format!("{GROUP_PREFIX}{handle}");
            if !self.used.insert(id.clone()) {
                debug!(id = %id, "实体句柄重复，分组标识将重复出现");
            }
            return id;
        }
        loop {
            let id = format!("{GROUP_PREFIX}{}", random_token());
            if self.used.insert(id.clone()) {
                return id;
            }
            trace!(id = %id, "随机标识冲突，重新生成");
        }
    }
}

/// 由 v4 UUID 的随机位生成 9 位 base36 串。
fn random_token() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut token = String::with_capacity(TOKEN_LEN);
    for _ in 0..TOKEN_LEN {
        token.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    token
}

/// 按输入顺序转换实体；不支持或数据不完整的实体被跳过。
pub fn convert_entities<'a, I>(entities: I, mode: ArcFlagMode) -> Vec<VectorGroup>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut ids = GroupIdAllocator::new();
    let mut buf = ryu_js::Buffer::new();
    let mut groups = Vec::new();
    for entity in entities {
        let Some((path, reference)) = entity_path(entity, mode, &mut buf) else {
            debug!(
                kind = entity.kind_name(),
                handle = entity.handle().unwrap_or("-"),
                "实体无法转换为路径，跳过"
            );
            continue;
        };
        groups.push(VectorGroup {
            id: ids.allocate(entity.handle()),
            path,
            reference,
            annotation: None,
        });
    }
    debug!(groups = groups.len(), "几何转换完成");
    groups
}

/// 单个实体的路径数据；无法转换时返回 `None`。
pub fn path_data(entity: &Entity, mode: ArcFlagMode) -> Option<String> {
    let mut buf = ryu_js::Buffer::new();
    entity_path(entity, mode, &mut buf).map(|(path, _)| path)
}

fn entity_path(
    entity: &Entity,
    mode: ArcFlagMode,
    buf: &mut ryu_js::Buffer,
) -> Option<(String, Point2)> {
    match entity {
        Entity::Line(line) => {
            let (start, end) = line_endpoints(line)?;
            let mut path = PathBuilder::new(buf);
            path.move_to(start);
            path.line_to(end);
            Some((path.finish(), Point2::from_vec((start.0 + end.0) * 0.5)))
        }
        Entity::Polyline(polyline) => {
            let vertices = polyline_vertices(polyline)?;
            Some((
                vertex_path(vertices, polyline.is_closed, buf),
                bbox_center(vertices),
            ))
        }
        Entity::Spline(spline) => {
            let points = spline_points(spline)?;
            Some((vertex_path(points, false, buf), bbox_center(points)))
        }
        Entity::Arc(arc) => {
            let geometry = arc_geometry(arc)?;
            let start = geometry.center.polar(geometry.radius, geometry.start_deg.to_radians());
            let end = geometry.center.polar(geometry.radius, geometry.end_deg.to_radians());
            let large = mode.large_arc(geometry.start_deg, geometry.end_deg);
            let mut path = PathBuilder::new(buf);
            path.move_to(start);
            path.arc_to(geometry.radius, large, end);
            Some((path.finish(), geometry.center))
        }
        Entity::Circle(circle) => {
            let (center, radius) = circle_geometry(circle)?;
            let right = Point2::new(center.x() + radius, center.y());
            let left = Point2::new(center.x() - radius, center.y());
            let mut path = PathBuilder::new(buf);
            path.move_to(right);
            path.arc_to(radius, true, left);
            path.arc_to(radius, true, right);
            Some((path.finish(), center))
        }
        Entity::Dimension(_) | Entity::Text(_) | Entity::MText(_) => None,
    }
}

fn vertex_path(points: &[Point2], closed: bool, buf: &mut ryu_js::Buffer) -> String {
    let mut path = PathBuilder::new(buf);
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
    }
    for point in iter {
        path.line_to(*point);
    }
    if closed {
        path.close();
    }
    path.finish()
}

fn bbox_center(points: &[Point2]) -> Point2 {
    let mut bounds = Bounds2D::empty();
    for point in points {
        bounds.include_point(*point);
    }
    bounds.center()
}

/// 两端点齐全且有限时返回。
pub(crate) fn line_endpoints(line: &Line) -> Option<(Point2, Point2)> {
    match (line.start, line.end) {
        (Some(start), Some(end)) if start.is_finite() && end.is_finite() => Some((start, end)),
        _ => None,
    }
}

/// 至少一个顶点且全部有限时返回。
pub(crate) fn polyline_vertices(polyline: &Polyline) -> Option<&[Point2]> {
    finite_points(&polyline.vertices)
}

pub(crate) fn spline_points(spline: &Spline) -> Option<&[Point2]> {
    finite_points(&spline.control_points)
}

fn finite_points(points: &[Point2]) -> Option<&[Point2]> {
    if points.is_empty() || !points.iter().all(|point| point.is_finite()) {
        return None;
    }
    Some(points)
}

pub(crate) fn circle_geometry(circle: &Circle) -> Option<(Point2, f64)> {
    let center = circle.center.filter(|center| center.is_finite())?;
    let radius = circle.radius.filter(|radius| radius.is_finite())?;
    Some((center, radius))
}

/// 圆弧的有效参数，角度单位为度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArcGeometry {
    pub center: Point2,
    pub radius: f64,
    pub start_deg: f64,
    pub end_deg: f64,
}

/// 缺失的起始角按 0°，缺失或为 0 的终止角按 360°。
pub(crate) fn arc_geometry(arc: &Arc) -> Option<ArcGeometry> {
    let center = arc.center.filter(|center| center.is_finite())?;
    let radius = arc.radius.filter(|radius| radius.is_finite())?;
    let start_deg = arc.start_angle.filter(|angle| angle.is_finite()).unwrap_or(0.0);
    let end_deg = arc
        .end_angle
        .filter(|angle| angle.is_finite() && *angle != 0.0)
        .unwrap_or(360.0);
    Some(ArcGeometry {
        center,
        radius,
        start_deg,
        end_deg,
    })
}

/// 逐段拼接 SVG 路径命令。
struct PathBuilder<'b> {
    out: String,
    buf: &'b mut ryu_js::Buffer,
}

impl<'b> PathBuilder<'b> {
    fn new(buf: &'b mut ryu_js::Buffer) -> Self {
        Self {
            out: String::new(),
            buf,
        }
    }

    fn command(&mut self, letter: char) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push(letter);
        self.out.push(' ');
    }

    fn move_to(&mut self, point: Point2) {
        self.command('M');
        push_numbers(&mut self.out, &[point.x(), point.y()], self.buf);
    }

    fn line_to(&mut self, point: Point2) {
        self.command('L');
        push_numbers(&mut self.out, &[point.x(), point.y()], self.buf);
    }

    /// 圆形半径、无旋转、正向扫掠。
    fn arc_to(&mut self, radius: f64, large: bool, end: Point2) {
        self.command('A');
        let large = if large { 1.0 } else { 0.0 };
        push_numbers(
            &mut self.out,
            &[radius, radius, 0.0, large, 1.0, end.x(), end.y()],
            self.buf,
        );
    }

    fn close(&mut self) {
        self.out.push_str(" Z");
    }

    fn finish(self) -> String {
        self.out
    }
}
