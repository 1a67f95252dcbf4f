use std::fs;
use std::path::Path;

use dxfsvg_core::{
    document::{
        Arc, BlockDefinition, Circle, Dimension, DimensionKind, Document, Entity, Line, MText,
        Polyline, Spline, Text,
    },
    geometry::Point2,
};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),
}

/// 把外部文件解析为 [`Document`] 的协作者。
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, IoError>;
}

/// ASCII DXF 读取器。只保留转换需要的实体，其余实体整体跳过。
#[derive(Debug, Default)]
pub struct DxfFacade;

impl DxfFacade {
    pub fn new() -> Self {
        Self
    }

    /// 直接解析内存中的 DXF 文本。
    pub fn parse_str(&self, source: &str) -> Result<Document, IoError> {
        DxfParser::new(source).parse().map_err(|err| match err {
            DxfError::Unsupported { feature } => IoError::UnsupportedFeature(feature),
            DxfError::Invalid { message } => IoError::InvalidDocument(message),
        })
    }
}

impl DocumentLoader for DxfFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let bytes = fs::read(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        // 旧版 DXF 常用 ANSI 代码页，非 UTF-8 字节按替换字符处理。
        let data = String::from_utf8_lossy(&bytes);
        self.parse_str(&data)
    }
}

/// 读取以 JSON 序列化的 [`Document`]，便于其他解析器直接对接。
#[derive(Debug, Default)]
pub struct JsonFacade;

impl JsonFacade {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for JsonFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data)
            .map_err(|err| IoError::InvalidDocument(format!("JSON 文档解析失败: {err}")))
    }
}

/// 按扩展名（不区分大小写）选择加载器。
pub fn load_document(path: &Path) -> Result<Document, IoError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("dxf") => DxfFacade::new().load(path),
        Some("json") => JsonFacade::new().load(path),
        _ => Err(IoError::UnsupportedFeature(format!(
            "无法识别的文件类型 {path:?}（支持 .dxf / .json）"
        ))),
    }
}

/// 写出完整的 SVG 文本。调用方保证内容已全部生成。
pub fn save_svg(path: &Path, markup: &str) -> Result<(), IoError> {
    fs::write(path, markup).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug)]
enum DxfError {
    Unsupported { feature: String },
    Invalid { message: String },
}

impl DxfError {
    fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// 所有实体共有的图层（组码 8）与句柄（组码 5）。
#[derive(Debug, Default)]
struct CommonFields {
    layer: Option<String>,
    handle: Option<String>,
}

impl CommonFields {
    fn accept(&mut self, code: i32, value: &str) -> bool {
        match code {
            8 => {
                self.layer = Some(value.trim().to_string());
                true
            }
            5 => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    self.handle = Some(trimmed.to_string());
                }
                true
            }
            _ => false,
        }
    }

    fn finish(self) -> (String, Option<String>) {
        (self.layer.unwrap_or_else(|| "0".to_string()), self.handle)
    }
}

struct DxfParser<'a> {
    reader: DxfReader<'a>,
}

impl<'a> DxfParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            reader: DxfReader::new(source),
        }
    }

    fn parse(mut self) -> Result<Document, DxfError> {
        let mut document = Document::new();
        while let Some((code, value)) = self.reader.next_pair()? {
            if code == 999 {
                continue;
            }
            if code != 0 {
                return Err(DxfError::invalid(format!(
                    "意外的组码 {code}（期望 0 表示 SECTION/EOF）"
                )));
            }
            match value.trim() {
                "SECTION" => {
                    let (name_code, name) = self
                        .reader
                        .next_pair()?
                        .ok_or_else(|| DxfError::invalid("SECTION 缺少名称（组码 2）"))?;
                    if name_code != 2 {
                        return Err(DxfError::invalid(format!(
                            "SECTION 名称使用了组码 {name_code}（期望 2）"
                        )));
                    }
                    match name.trim() {
                        "ENTITIES" => self.parse_entities(&mut document)?,
                        "BLOCKS" => self.parse_blocks(&mut document)?,
                        _ => self.skip_section()?,
                    }
                }
                "EOF" => break,
                unexpected => {
                    return Err(DxfError::invalid(format!(
                        "意外的标记 {unexpected}，期望 SECTION 或 EOF"
                    )));
                }
            }
        }
        Ok(document)
    }

    fn skip_section(&mut self) -> Result<(), DxfError> {
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) if value.trim() == "ENDSEC" => break,
                Some(_) => continue,
                None => {
                    return Err(DxfError::invalid("SECTION 未找到 ENDSEC 终止标记"));
                }
            }
        }
        Ok(())
    }

    fn parse_entities(&mut self, document: &mut Document) -> Result<(), DxfError> {
        loop {
            let (code, value) = match self.reader.next_pair()? {
                Some(pair) => pair,
                None => return Err(DxfError::invalid("ENTITIES 段提前结束")),
            };
            if code != 0 {
                return Err(DxfError::invalid(format!(
                    "ENTITIES 段遇到组码 {code}（期望 0 表示实体起始）"
                )));
            }

            match value.trim() {
                "ENDSEC" => break,
                kind => {
                    if let Some(entity) = self.parse_entity(kind)? {
                        document.add_entity(entity);
                    }
                }
            }
        }
        Ok(())
    }

    fn parse_blocks(&mut self, document: &mut Document) -> Result<(), DxfError> {
        loop {
            let (code, value) = match self.reader.next_pair()? {
                Some(pair) => pair,
                None => return Err(DxfError::invalid("BLOCKS 段提前结束")),
            };
            if code != 0 {
                return Err(DxfError::invalid(format!(
                    "BLOCKS 段遇到组码 {code}（期望 0 表示实体起始）"
                )));
            }

            match value.trim() {
                "ENDSEC" => break,
                "BLOCK" => {
                    let definition = self.parse_block_definition()?;
                    document.add_block_definition(definition);
                }
                _ => {
                    // 未预期的条目（例如孤立的 ENDBLK），直接跳过
                    self.skip_entity_body()?;
                }
            }
        }
        Ok(())
    }

    /// 解析块定义。标注引用的匿名块（`*D…`）同样收集，其中的文字是标签来源。
    fn parse_block_definition(&mut self) -> Result<BlockDefinition, DxfError> {
        let mut name: Option<String> = None;
        let mut entities: Vec<Entity> = Vec::new();

        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => match value.trim() {
                    "ENDBLK" => {
                        self.skip_entity_body()?;
                        break;
                    }
                    kind => {
                        if let Some(entity) = self.parse_entity(kind)? {
                            entities.push(entity);
                        }
                    }
                },
                Some((2, value)) => {
                    name = Some(value.trim().to_string());
                }
                Some(_) => {
                    // 基点、标志、句柄等暂不使用
                }
                None => {
                    return Err(DxfError::invalid("BLOCK 定义未找到 ENDBLK 终止标记"));
                }
            }
        }

        let name = name.ok_or_else(|| DxfError::invalid("BLOCK 缺少名称（组码 2）"))?;
        Ok(BlockDefinition { name, entities })
    }

    /// 解析单个实体；不支持的类型跳过实体体并返回 `None`。
    fn parse_entity(&mut self, kind: &str) -> Result<Option<Entity>, DxfError> {
        let parsed = match kind {
            "LINE" => self.parse_line(),
            "CIRCLE" => self.parse_circle(),
            "ARC" => self.parse_arc(),
            "LWPOLYLINE" => self.parse_lwpolyline(),
            "POLYLINE" => self.parse_polyline(),
            "SPLINE" => self.parse_spline(),
            "TEXT" => self.parse_text(),
            "MTEXT" => self.parse_mtext(),
            "DIMENSION" => self.parse_dimension(),
            other => Err(DxfError::unsupported(format!("暂不支持的实体类型 {other}"))),
        };
        match parsed {
            Ok(entity) => Ok(Some(entity)),
            Err(DxfError::Unsupported { feature }) => {
                trace!(kind, feature = %feature, "跳过不参与转换的实体");
                self.skip_entity_body()?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// 读取当前实体的下一个字段；遇到组码 0 时回退并返回 `None`。
    fn next_field(&mut self, kind: &str) -> Result<Option<(i32, String)>, DxfError> {
        match self.reader.next_pair()? {
            Some((0, value)) => {
                self.reader.put_back((0, value));
                Ok(None)
            }
            Some(pair) => Ok(Some(pair)),
            None => Err(DxfError::invalid(format!("{kind} 未正确结束"))),
        }
    }

    fn parse_line(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut start_x = None;
        let mut start_y = None;
        let mut end_x = None;
        let mut end_y = None;
        while let Some((code, value)) = self.next_field("LINE")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                10 => assign_coord(&mut start_x, &value, "LINE 起点 X（组码 10）")?,
                20 => assign_coord(&mut start_y, &value, "LINE 起点 Y（组码 20）")?,
                11 => assign_coord(&mut end_x, &value, "LINE 终点 X（组码 11）")?,
                21 => assign_coord(&mut end_y, &value, "LINE 终点 Y（组码 21）")?,
                _ => {} // 包括 Z 坐标（组码 30/31）
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Line(Line {
            start: point_from(start_x, start_y),
            end: point_from(end_x, end_y),
            layer,
            handle,
        }))
    }

    fn parse_circle(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut center_x = None;
        let mut center_y = None;
        let mut radius = None;
        while let Some((code, value)) = self.next_field("CIRCLE")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                10 => assign_coord(&mut center_x, &value, "CIRCLE 圆心 X（组码 10）")?,
                20 => assign_coord(&mut center_y, &value, "CIRCLE 圆心 Y（组码 20）")?,
                40 => assign_coord(&mut radius, &value, "CIRCLE 半径（组码 40）")?,
                _ => {}
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Circle(Circle {
            center: point_from(center_x, center_y),
            radius,
            layer,
            handle,
        }))
    }

    fn parse_arc(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut center_x = None;
        let mut center_y = None;
        let mut radius = None;
        let mut start_angle = None;
        let mut end_angle = None;
        while let Some((code, value)) = self.next_field("ARC")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                10 => assign_coord(&mut center_x, &value, "ARC 圆心 X（组码 10）")?,
                20 => assign_coord(&mut center_y, &value, "ARC 圆心 Y（组码 20）")?,
                40 => assign_coord(&mut radius, &value, "ARC 半径（组码 40）")?,
                50 => assign_coord(&mut start_angle, &value, "ARC 起始角（组码 50）")?,
                51 => assign_coord(&mut end_angle, &value, "ARC 终止角（组码 51）")?,
                _ => {}
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Arc(Arc {
            center: point_from(center_x, center_y),
            radius,
            start_angle,
            end_angle,
            layer,
            handle,
        }))
    }

    fn parse_lwpolyline(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut is_closed = false;
        let mut vertices: Vec<Point2> = Vec::new();
        let mut pending_x: Option<f64> = None;
        let mut pending_y: Option<f64> = None;
        while let Some((code, value)) = self.next_field("LWPOLYLINE")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                70 => {
                    let flag = parse_i32(&value, "LWPOLYLINE 标志")?;
                    is_closed = flag & 0x01 == 0x01;
                }
                10 => {
                    let x = parse_f64(&value, "LWPOLYLINE 顶点 X")?;
                    if let Some(y) = pending_y.take() {
                        vertices.push(Point2::new(x, y));
                    } else if pending_x.replace(x).is_some() {
                        return Err(DxfError::invalid("LWPOLYLINE 顶点缺少对应的 Y（组码 20）"));
                    }
                }
                20 => {
                    let y = parse_f64(&value, "LWPOLYLINE 顶点 Y")?;
                    if let Some(x) = pending_x.take() {
                        vertices.push(Point2::new(x, y));
                    } else if pending_y.replace(y).is_some() {
                        return Err(DxfError::invalid("LWPOLYLINE 顶点缺少对应的 X（组码 10）"));
                    }
                }
                _ => {} // bulge（组码 42）与宽度暂不使用
            }
        }

        if pending_x.is_some() || pending_y.is_some() {
            return Err(DxfError::invalid(
                "LWPOLYLINE 顶点坐标成对出现（组码 10/20），检测到不完整的顶点",
            ));
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Polyline(Polyline {
            vertices,
            is_closed,
            layer,
            handle,
        }))
    }

    /// 旧式 POLYLINE：头部之后跟随 VERTEX 记录，以 SEQEND 结束。
    /// 网格与多面网格（标志 0x10 / 0x40）不参与转换，整体跳过。
    fn parse_polyline(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut flags: i32 = 0;
        while let Some((code, value)) = self.next_field("POLYLINE")? {
            if common.accept(code, &value) {
                continue;
            }
            if code == 70 {
                flags = parse_i32(&value, "POLYLINE 标志（组码 70）")?;
            }
        }

        if flags & (0x10 | 0x40) != 0 {
            self.skip_polyline_sequence()?;
            return Err(DxfError::unsupported("POLYLINE 网格/多面网格"));
        }

        let mut vertices = Vec::new();
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => match value.trim() {
                    "VERTEX" => {
                        if let Some(vertex) = self.parse_vertex()? {
                            vertices.push(vertex);
                        }
                    }
                    "SEQEND" => {
                        self.skip_entity_body()?;
                        break;
                    }
                    _ => {
                        self.reader.put_back((0, value));
                        break;
                    }
                },
                Some(_) => continue,
                None => return Err(DxfError::invalid("POLYLINE 缺少 SEQEND 终止标记")),
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Polyline(Polyline {
            vertices,
            is_closed: flags & 0x01 != 0,
            layer,
            handle,
        }))
    }

    fn parse_vertex(&mut self) -> Result<Option<Point2>, DxfError> {
        let mut x = None;
        let mut y = None;
        while let Some((code, value)) = self.next_field("VERTEX")? {
            match code {
                10 => assign_coord(&mut x, &value, "VERTEX X（组码 10）")?,
                20 => assign_coord(&mut y, &value, "VERTEX Y（组码 20）")?,
                _ => {}
            }
        }
        Ok(point_from(x, y))
    }

    fn skip_polyline_sequence(&mut self) -> Result<(), DxfError> {
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => match value.trim() {
                    "VERTEX" => self.skip_entity_body()?,
                    "SEQEND" => {
                        self.skip_entity_body()?;
                        break;
                    }
                    _ => {
                        self.reader.put_back((0, value));
                        break;
                    }
                },
                Some(_) => continue,
                None => break,
            }
        }
        Ok(())
    }

    fn parse_spline(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut control_points: Vec<Point2> = Vec::new();
        let mut pending_control_x: Option<f64> = None;
        while let Some((code, value)) = self.next_field("SPLINE")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                10 => {
                    if pending_control_x
                        .replace(parse_f64(&value, "SPLINE 控制点 X（组码 10）")?)
                        .is_some()
                    {
                        return Err(DxfError::invalid(
                            "SPLINE 控制点 X（组码 10）在未提供 Y 之前重复出现",
                        ));
                    }
                }
                20 => {
                    let y = parse_f64(&value, "SPLINE 控制点 Y（组码 20）")?;
                    let x = pending_control_x.take().ok_or_else(|| {
                        DxfError::invalid("SPLINE 控制点 Y（组码 20）缺少对应的 X")
                    })?;
                    control_points.push(Point2::new(x, y));
                }
                _ => {
                    // 节点、权重、拟合点不参与折线近似
                }
            }
        }

        if let Some(x) = pending_control_x {
            return Err(DxfError::invalid(format!(
                "SPLINE 控制点 X={x} 缺少对应的 Y（组码 20）"
            )));
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Spline(Spline {
            control_points,
            layer,
            handle,
        }))
    }

    fn parse_text(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut height = None;
        let mut content: Option<String> = None;
        while let Some((code, value)) = self.next_field("TEXT")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                40 => assign_coord(&mut height, &value, "TEXT 高度（组码 40）")?,
                1 => match content {
                    Some(ref mut existing) => {
                        existing.push('\n');
                        existing.push_str(&value);
                    }
                    None => content = Some(value),
                },
                _ => {}
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Text(Text {
            content: content.unwrap_or_default(),
            height,
            layer,
            handle,
        }))
    }

    /// MTEXT 内容由若干组码 3 片段加最后的组码 1 组成，原样拼接、保留格式码。
    fn parse_mtext(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut height = None;
        let mut reference_width: Option<f64> = None;
        let mut fragments: Vec<String> = Vec::new();
        while let Some((code, value)) = self.next_field("MTEXT")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                40 => assign_coord(&mut height, &value, "MTEXT 高度（组码 40）")?,
                41 => {
                    let width = parse_f64(&value, "MTEXT 参考宽度（组码 41）")?;
                    reference_width = (width.abs() >= f64::EPSILON).then_some(width);
                }
                1 | 3 => fragments.push(value),
                _ => {}
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::MText(MText {
            content: fragments.concat(),
            height,
            reference_width,
            layer,
            handle,
        }))
    }

    fn parse_dimension(&mut self) -> Result<Entity, DxfError> {
        let mut common = CommonFields::default();
        let mut flags: i16 = 0;
        let mut text: Option<String> = None;
        let mut block: Option<String> = None;
        let mut definition_x = None;
        let mut definition_y = None;
        let mut text_mid_x = None;
        let mut text_mid_y = None;
        let mut actual_measurement = None;
        while let Some((code, value)) = self.next_field("DIMENSION")? {
            if common.accept(code, &value) {
                continue;
            }
            match code {
                70 => flags = parse_i16(&value, "DIMENSION 类型标志（组码 70）")?,
                1 => {
                    // `<>` 表示沿用测量值，视为无覆盖文字
                    let entry = value.trim();
                    text = (!entry.is_empty() && entry != "<>").then(|| entry.to_string());
                }
                2 => {
                    let name = value.trim();
                    block = (!name.is_empty()).then(|| name.to_string());
                }
                10 => assign_coord(&mut definition_x, &value, "DIMENSION 定义点 X（组码 10）")?,
                20 => assign_coord(&mut definition_y, &value, "DIMENSION 定义点 Y（组码 20）")?,
                11 => assign_coord(&mut text_mid_x, &value, "DIMENSION 文本位置 X（组码 11）")?,
                21 => assign_coord(&mut text_mid_y, &value, "DIMENSION 文本位置 Y（组码 21）")?,
                42 => {
                    actual_measurement = Some(parse_f64(&value, "DIMENSION 测量值（组码 42）")?);
                }
                _ => {}
            }
        }

        let (layer, handle) = common.finish();
        Ok(Entity::Dimension(Dimension {
            kind: dimension_kind_from_flags(flags),
            text,
            measurement: None,
            actual_measurement,
            block,
            definition_point: point_from(definition_x, definition_y),
            text_midpoint: point_from(text_mid_x, text_mid_y),
            layer,
            handle,
        }))
    }

    fn skip_entity_body(&mut self) -> Result<(), DxfError> {
        loop {
            match self.reader.next_pair()? {
                Some((0, value)) => {
                    self.reader.put_back((0, value));
                    break;
                }
                Some(_) => continue,
                None => break,
            }
        }
        Ok(())
    }
}

fn dimension_kind_from_flags(flags: i16) -> DimensionKind {
    match flags & 0x0F {
        0 => DimensionKind::Linear,
        1 => DimensionKind::Aligned,
        2 => DimensionKind::Angular,
        3 => DimensionKind::Diameter,
        4 => DimensionKind::Radius,
        5 => DimensionKind::Angular3Point,
        6 => DimensionKind::Ordinate,
        other => DimensionKind::Unknown(other),
    }
}

struct DxfReader<'a> {
    lines: std::str::Lines<'a>,
    buffer: Option<(i32, String)>,
    line_number: usize,
}

impl<'a> DxfReader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            buffer: None,
            line_number: 0,
        }
    }

    fn next_pair(&mut self) -> Result<Option<(i32, String)>, DxfError> {
        if let Some(pair) = self.buffer.take() {
            return Ok(Some(pair));
        }

        let code_line = loop {
            match self.lines.next() {
                Some(line) => {
                    self.line_number += 1;
                    // 文件末尾的空行不构成组码
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Ok(None),
            }
        };

        let value_line = match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                line
            }
            None => {
                return Err(DxfError::invalid(format!(
                    "文件在第 {} 行结束，缺少与组码对应的值行",
                    self.line_number
                )));
            }
        };

        let code = code_line.trim().parse::<i32>().map_err(|_| {
            DxfError::invalid(format!(
                "第 {} 行的组码 \"{}\" 无法解析为整数",
                self.line_number - 1,
                code_line.trim()
            ))
        })?;
        let value = value_line.trim_end_matches('\r').to_string();
        Ok(Some((code, value)))
    }

    fn put_back(&mut self, pair: (i32, String)) {
        debug_assert!(self.buffer.is_none(), "DXF pair 只能回退一次");
        self.buffer = Some(pair);
    }
}

fn point_from(x: Option<f64>, y: Option<f64>) -> Option<Point2> {
    match (x, y) {
        (Some(x), Some(y)) => Some(Point2::new(x, y)),
        _ => None,
    }
}

fn assign_coord(slot: &mut Option<f64>, raw: &str, context: &str) -> Result<(), DxfError> {
    if slot.is_some() {
        return Err(DxfError::invalid(format!("{context} 出现重复值")));
    }
    *slot = Some(parse_f64(raw, context)?);
    Ok(())
}

fn parse_f64(raw: &str, context: &str) -> Result<f64, DxfError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| DxfError::invalid(format!("{context} 解析失败（值：\"{raw}\"）")))
}

fn parse_i32(raw: &str, context: &str) -> Result<i32, DxfError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DxfError::invalid(format!("{context} 解析失败（值：\"{raw}\"）")))
}

fn parse_i16(raw: &str, context: &str) -> Result<i16, DxfError> {
    let value = parse_i32(raw, context)?;
    i16::try_from(value)
        .map_err(|_| DxfError::invalid(format!("{context} 超出 i16 范围（值：{value}）")))
}
