pub mod batch;
pub mod cli;
pub mod errors;
pub mod loader;

use std::path::Path;

use dxfsvg_engine::{inspect_dimensions, layer_inventory};
use errors::FrontendError;
use tracing::info;

pub use batch::{BatchReport, BatchRequest, ConvertedFile, run_batch};
pub use loader::{conversion_options, load_source};

/// 执行批量转换并打印摘要，返回报告供调用方决定退出码。
pub fn run_convert(request: &BatchRequest) -> Result<BatchReport, FrontendError> {
    info!(files = request.inputs.len(), threads = request.threads, "开始批量转换");
    let report = run_batch(request)?;
    print!("{}", cli::format_batch_report(&report));
    Ok(report)
}

/// 打印各图层的实体数量。
pub fn run_layers(path: &Path) -> Result<(), FrontendError> {
    let document = load_source(path)?;
    print!("{}", cli::format_layer_inventory(&layer_inventory(&document)));
    Ok(())
}

/// 打印标注及其引用块的检查结果。
pub fn run_inspect(path: &Path, layer: Option<&str>, limit: usize) -> Result<(), FrontendError> {
    let document = load_source(path)?;
    let reports = inspect_dimensions(&document, layer, limit);
    print!("{}", cli::format_dimension_reports(&reports));
    Ok(())
}
