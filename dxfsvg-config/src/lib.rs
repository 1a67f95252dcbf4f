use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 指向配置文件的环境变量。
pub const CONFIG_ENV: &str = "DXFSVG_CONFIG";

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `DXFSVG_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArcFlagSetting {
    #[default]
    Literal,
    Normalized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundsSetting {
    #[default]
    Linear,
    IncludeCurves,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationSetting {
    #[default]
    FirstEntry,
    Nearest,
}

/// 转换参数。`layers` 为空表示转换全部图层。
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub arc_flags: ArcFlagSetting,
    #[serde(default)]
    pub bounds: BoundsSetting,
    #[serde(default)]
    pub annotations: AnnotationSetting,
    #[serde(default = "ConversionConfig::default_extent")]
    pub default_extent: f64,
}

impl ConversionConfig {
    fn default_extent() -> f64 {
        4096.0
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            arc_flags: ArcFlagSetting::default(),
            bounds: BoundsSetting::default(),
            annotations: AnnotationSetting::default(),
            default_extent: Self::default_extent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "StyleConfig::default_stroke")]
    pub stroke: String,
    #[serde(default = "StyleConfig::default_stroke_width")]
    pub stroke_width: f64,
}

impl StyleConfig {
    fn default_stroke() -> String {
        "white".to_string()
    }

    fn default_stroke_width() -> f64 {
        1.0
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke: Self::default_stroke(),
            stroke_width: Self::default_stroke_width(),
        }
    }
}

/// 批量转换参数。`threads = 0` 使用线程池默认大小。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub threads: usize,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let cfg = AppConfig::discover().expect("discover should succeed");
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.conversion.layers.is_empty());
        assert_eq!(cfg.conversion.arc_flags, ArcFlagSetting::Literal);
        assert_eq!(cfg.conversion.bounds, BoundsSetting::Linear);
        assert_eq!(cfg.conversion.annotations, AnnotationSetting::FirstEntry);
        assert_eq!(cfg.conversion.default_extent, 4096.0);
        assert_eq!(cfg.style.stroke, "white");
        assert_eq!(cfg.style.stroke_width, 1.0);
        assert_eq!(cfg.batch.threads, 0);
        assert!(cfg.batch.output_dir.is_none());
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r##"
            [logging]
            level = "debug"

            [conversion]
            layers = ["KT-Dim", "WALLS"]
            arc_flags = "normalized"
            bounds = "include-curves"
            annotations = "nearest"
            default_extent = 1024.0

            [style]
            stroke = "#00ff00"
            stroke_width = 0.5

            [batch]
            threads = 4
            output_dir = "../out"
            "##
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.conversion.layers, vec!["KT-Dim", "WALLS"]);
        assert_eq!(cfg.conversion.arc_flags, ArcFlagSetting::Normalized);
        assert_eq!(cfg.conversion.bounds, BoundsSetting::IncludeCurves);
        assert_eq!(cfg.conversion.annotations, AnnotationSetting::Nearest);
        assert_eq!(cfg.conversion.default_extent, 1024.0);
        assert_eq!(cfg.style.stroke, "#00ff00");
        assert_eq!(cfg.style.stroke_width, 0.5);
        assert_eq!(cfg.batch.threads, 4);
        assert_eq!(
            cfg.batch
                .output_dir
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("../out".to_string())
        );
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [conversion]
            layers = ["KT-Dim"]
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.conversion.layers, vec!["KT-Dim"]);
        assert_eq!(cfg.conversion.default_extent, 4096.0);
        assert_eq!(cfg.style.stroke, "white");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[conversion]\narc_flags = \"sideways\"").unwrap();

        let err = AppConfig::from_file(file.path()).expect_err("invalid value should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = AppConfig::from_file(dir.path().join("absent.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
