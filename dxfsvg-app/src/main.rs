use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dxfsvg_config::{AnnotationSetting, AppConfig, ArcFlagSetting, BoundsSetting, ConfigError};
use dxfsvg_frontend::BatchRequest;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

/// 把 DXF 图纸转换为带标注注释的 SVG。
#[derive(Debug, Parser)]
#[command(name = "dxfsvg", version)]
struct Cli {
    /// 配置文件路径，缺省时读取 `DXFSVG_CONFIG` 或 `./config/default.toml`
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 批量转换 DXF/JSON 文件，目录会展开为其中的 DXF 文件
    Convert(ConvertArgs),
    /// 统计各图层的实体数量
    Layers {
        file: PathBuf,
    },
    /// 检查标注实体及其引用的块
    Inspect {
        file: PathBuf,
        #[arg(long)]
        layer: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Debug, Args)]
struct ConvertArgs {
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,
    /// 只转换指定图层，可重复
    #[arg(long = "layer", value_name = "NAME")]
    layers: Vec<String>,
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    arc_flags: Option<ArcFlagArg>,
    #[arg(long, value_enum)]
    bounds: Option<BoundsArg>,
    #[arg(long, value_enum)]
    annotations: Option<AnnotationArg>,
    /// 转换线程数，0 表示自动
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArcFlagArg {
    Literal,
    Normalized,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundsArg {
    Linear,
    IncludeCurves,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnnotationArg {
    FirstEntry,
    Nearest,
}

fn main() {
    let cli = Cli::parse();
    let config = load_configuration(cli.config.clone());
    init_logging(&config);
    info!("启动 dxfsvg");

    match run(cli.command, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error!(error = %err, "执行失败");
            eprintln!("错误：{err:#}");
            std::process::exit(1);
        }
    }
}

/// 返回 `false` 表示批量转换中有文件失败。
fn run(command: Command, config: AppConfig) -> anyhow::Result<bool> {
    match command {
        Command::Convert(args) => {
            let request = batch_request(args, config);
            let report = dxfsvg_frontend::run_convert(&request).context("批量转换无法启动")?;
            Ok(!report.has_failures())
        }
        Command::Layers { file } => {
            dxfsvg_frontend::run_layers(&file)?;
            Ok(true)
        }
        Command::Inspect { file, layer, limit } => {
            dxfsvg_frontend::run_inspect(&file, layer.as_deref(), limit)?;
            Ok(true)
        }
    }
}

/// 命令行参数覆盖配置文件。
fn batch_request(args: ConvertArgs, mut config: AppConfig) -> BatchRequest {
    if !args.layers.is_empty() {
        config.conversion.layers = args.layers;
    }
    if let Some(mode) = args.arc_flags {
        config.conversion.arc_flags = match mode {
            ArcFlagArg::Literal => ArcFlagSetting::Literal,
            ArcFlagArg::Normalized => ArcFlagSetting::Normalized,
        };
    }
    if let Some(mode) = args.bounds {
        config.conversion.bounds = match mode {
            BoundsArg::Linear => BoundsSetting::Linear,
            BoundsArg::IncludeCurves => BoundsSetting::IncludeCurves,
        };
    }
    if let Some(policy) = args.annotations {
        config.conversion.annotations = match policy {
            AnnotationArg::FirstEntry => AnnotationSetting::FirstEntry,
            AnnotationArg::Nearest => AnnotationSetting::Nearest,
        };
    }
    BatchRequest {
        options: dxfsvg_frontend::conversion_options(&config),
        inputs: args.files,
        output_dir: args.out_dir.or(config.batch.output_dir),
        threads: args.threads.unwrap_or(config.batch.threads),
    }
}

/// 日志尚未初始化，回退提示直接写到 stderr。
fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            eprintln!("警告：加载指定配置 {} 失败，使用默认配置：{err}", path.display());
            AppConfig::default()
        }),
        None => AppConfig::discover().unwrap_or_else(|err| {
            match &err {
                ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                    eprintln!("警告：加载默认配置 {} 失败，使用内建默认值：{err}", path.display());
                }
                ConfigError::Context { .. } => {
                    eprintln!("警告：加载默认配置失败，使用内建默认值：{err}");
                }
            }
            AppConfig::default()
        }),
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
