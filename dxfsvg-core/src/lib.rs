pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示，坐标保持 DXF 的双精度。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        /// 两个分量均为有限值时返回 `true`。
        #[inline]
        pub fn is_finite(self) -> bool {
            self.0.is_finite()
        }

        #[inline]
        pub fn distance_squared(self, other: Point2) -> f64 {
            self.0.distance_squared(other.0)
        }

        /// 以 `self` 为圆心，按极坐标求圆周上的点。角度单位为弧度。
        #[inline]
        pub fn polar(self, radius: f64, angle: f64) -> Point2 {
            Self(self.0 + DVec2::new(angle.cos(), angle.sin()) * radius)
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 轴对齐边界框，用于估算视口范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.max.x() - self.min.x()
        }

        #[inline]
        pub fn height(&self) -> f64 {
            self.max.y() - self.min.y()
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let center = (self.min.as_vec2() + self.max.as_vec2()) * 0.5;
            Point2::from_vec(center)
        }
    }
}

pub mod document {
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};

    use crate::geometry::Point2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EntityId(u64);

    impl EntityId {
        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        /// 提供原始数值，便于序列化或日志输出。
        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }
    }

    /// 图元的封闭集合。新增类型时，所有 `match` 都会在编译期提示补全。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum Entity {
        Line(Line),
        Polyline(Polyline),
        Arc(Arc),
        Circle(Circle),
        Spline(Spline),
        Dimension(Dimension),
        Text(Text),
        #[serde(rename = "mtext")]
        MText(MText),
    }

    impl Entity {
        #[inline]
        pub fn layer_name(&self) -> &str {
            match self {
                Entity::Line(line) => &line.layer,
                Entity::Polyline(polyline) => &polyline.layer,
                Entity::Arc(arc) => &arc.layer,
                Entity::Circle(circle) => &circle.layer,
                Entity::Spline(spline) => &spline.layer,
                Entity::Dimension(dimension) => &dimension.layer,
                Entity::Text(text) => &text.layer,
                Entity::MText(mtext) => &mtext.layer,
            }
        }

        /// DXF 句柄（组码 5），文档内唯一，可能缺失。
        #[inline]
        pub fn handle(&self) -> Option<&str> {
            let handle = match self {
                Entity::Line(line) => &line.handle,
                Entity::Polyline(polyline) => &polyline.handle,
                Entity::Arc(arc) => &arc.handle,
                Entity::Circle(circle) => &circle.handle,
                Entity::Spline(spline) => &spline.handle,
                Entity::Dimension(dimension) => &dimension.handle,
                Entity::Text(text) => &text.handle,
                Entity::MText(mtext) => &mtext.handle,
            };
            handle.as_deref()
        }

        /// 与 DXF 实体名一致的类型名称，用于日志与报告。
        pub fn kind_name(&self) -> &'static str {
            match self {
                Entity::Line(_) => "LINE",
                Entity::Polyline(_) => "POLYLINE",
                Entity::Arc(_) => "ARC",
                Entity::Circle(_) => "CIRCLE",
                Entity::Spline(_) => "SPLINE",
                Entity::Dimension(_) => "DIMENSION",
                Entity::Text(_) => "TEXT",
                Entity::MText(_) => "MTEXT",
            }
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Line {
        pub start: Option<Point2>,
        pub end: Option<Point2>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    /// 多段线，同时承载 LWPOLYLINE 与二维 POLYLINE。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Polyline {
        pub vertices: Vec<Point2>,
        #[serde(default)]
        pub is_closed: bool,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    /// 圆弧实体，角度以度储存（与 DXF 组码 50/51 一致），逆时针为正。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Option<Point2>,
        pub radius: Option<f64>,
        pub start_angle: Option<f64>,
        pub end_angle: Option<f64>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Option<Point2>,
        pub radius: Option<f64>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    /// 样条只保留控制点；不做曲线拟合。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Spline {
        pub control_points: Vec<Point2>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum DimensionKind {
        #[default]
        Linear,
        Aligned,
        Angular,
        Diameter,
        Radius,
        Angular3Point,
        Ordinate,
        Unknown(i16),
    }

    /// 标注实体。标签可以来自自身文字，也可以委托给 `block` 指向的匿名块。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Dimension {
        #[serde(default)]
        pub kind: DimensionKind,
        #[serde(default)]
        pub text: Option<String>,
        #[serde(default)]
        pub measurement: Option<f64>,
        #[serde(default)]
        pub actual_measurement: Option<f64>,
        #[serde(default)]
        pub block: Option<String>,
        #[serde(default)]
        pub definition_point: Option<Point2>,
        #[serde(default)]
        pub text_midpoint: Option<Point2>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Text {
        pub content: String,
        #[serde(default)]
        pub height: Option<f64>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    /// 多行文字，`content` 保留原始格式控制码。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct MText {
        pub content: String,
        #[serde(default)]
        pub height: Option<f64>,
        #[serde(default)]
        pub reference_width: Option<f64>,
        pub layer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub handle: Option<String>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct BlockDefinition {
        pub name: String,
        #[serde(default)]
        pub entities: Vec<Entity>,
    }

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    pub struct Document {
        entities: Vec<(EntityId, Entity)>,
        next_entity_id: u64,
        #[serde(default)]
        blocks: HashMap<String, BlockDefinition>,
    }

    impl Document {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_entity(&mut self, entity: Entity) -> EntityId {
            let id = self.next_id();
            self.entities.push((id, entity));
            id
        }

        #[inline]
        pub fn entities(&self) -> impl Iterator<Item = &(EntityId, Entity)> {
            self.entities.iter()
        }

        #[inline]
        pub fn entity_count(&self) -> usize {
            self.entities.len()
        }

        #[inline]
        pub fn entity(&self, id: EntityId) -> Option<&Entity> {
            self.entities
                .iter()
                .find_map(|(entity_id, entity)| (*entity_id == id).then_some(entity))
        }

        /// 同名块后写覆盖先写，与 DXF 中的块表语义一致。
        pub fn add_block_definition(&mut self, definition: BlockDefinition) {
            self.blocks.insert(definition.name.clone(), definition);
        }

        #[inline]
        pub fn block(&self, name: &str) -> Option<&BlockDefinition> {
            self.blocks.get(name)
        }

        #[inline]
        pub fn blocks(&self) -> impl Iterator<Item = &BlockDefinition> {
            self.blocks.values()
        }

        fn next_id(&mut self) -> EntityId {
            let id = EntityId::new(self.next_entity_id);
            self.next_entity_id += 1;
            id
        }
    }

}
