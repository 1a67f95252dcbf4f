use std::path::PathBuf;

use dxfsvg_engine::EngineError;
use dxfsvg_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("加载 {path:?} 失败: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("转换 {path:?} 失败: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
    #[error("写出 {path:?} 失败: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("输出 {path:?} 已由 {first:?} 占用")]
    OutputConflict { path: PathBuf, first: PathBuf },
    #[error("扫描目录 {path:?} 失败: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("转换参数无效: {0}")]
    InvalidOptions(#[from] EngineError),
    #[error("创建转换线程池失败: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
