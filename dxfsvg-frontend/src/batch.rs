//! 批量转换：每个文件独立加载、转换、写出，失败不影响其他文件。

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use dxfsvg_engine::{Conversion, ConversionOptions, convert};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::FrontendError;
use crate::loader::load_source;

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub inputs: Vec<PathBuf>,
    /// 为 `None` 时 SVG 写在源文件旁边。
    pub output_dir: Option<PathBuf>,
    pub options: ConversionOptions,
    /// `0` 使用线程池默认大小。
    pub threads: usize,
}

/// 单个文件的转换摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub groups: usize,
    pub annotated: usize,
    pub dimensions: usize,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ConvertedFile, FrontendError>,
}

/// 按输入顺序排列的结果。
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ConvertedFile> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &FrontendError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|err| (outcome.input.as_path(), err))
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    #[inline]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

/// 并行转换所有输入文件。只有参数无效或线程池创建失败时才整体返回错误。
pub fn run_batch(request: &BatchRequest) -> Result<BatchReport, FrontendError> {
    request.options.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.threads)
        .build()?;

    let planned = plan_files(&request.inputs, request.output_dir.as_deref());
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        planned
            .into_par_iter()
            .map(|file| FileOutcome {
                result: file
                    .output
                    .and_then(|output| convert_file(&file.input, &output, &request.options)),
                input: file.input,
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    info!(
        total = report.outcomes.len(),
        failed = report.failure_count(),
        "批量转换结束"
    );
    Ok(report)
}

/// 展开后的单个输入及其输出路径。
#[derive(Debug)]
struct PlannedFile {
    input: PathBuf,
    output: Result<PathBuf, FrontendError>,
}

/// 展开目录并预先分配输出路径；同一输出路径只归第一个输入所有。
fn plan_files(inputs: &[PathBuf], output_dir: Option<&Path>) -> Vec<PlannedFile> {
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut planned = Vec::with_capacity(inputs.len());
    for input in inputs {
        for expanded in expand_input(input) {
            let file = match expanded {
                Ok(file) => file,
                Err(err) => {
                    planned.push(PlannedFile {
                        input: input.clone(),
                        output: Err(err),
                    });
                    continue;
                }
            };
            let output = match owners.entry(output_path(&file, output_dir)) {
                Entry::Occupied(owner) => {
                    warn!(
                        input = %file.display(),
                        output = %owner.key().display(),
                        "输出路径冲突，跳过该文件"
                    );
                    Err(FrontendError::OutputConflict {
                        path: owner.key().clone(),
                        first: owner.get().clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    let output = slot.key().clone();
                    slot.insert(file.clone());
                    Ok(output)
                }
            };
            planned.push(PlannedFile { input: file, output });
        }
    }
    planned
}

/// 目录展开为其中的 `.dxf` 文件（不区分大小写、按文件名排序、不递归），其他路径原样返回。
pub fn expand_input(input: &Path) -> Vec<Result<PathBuf, FrontendError>> {
    if !input.is_dir() {
        return vec![Ok(input.to_path_buf())];
    }
    let files: Vec<_> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => (entry.file_type().is_file() && has_dxf_extension(entry.path()))
                .then(|| Ok(entry.into_path())),
            Err(source) => Some(Err(FrontendError::Scan {
                path: input.to_path_buf(),
                source,
            })),
        })
        .collect();
    if files.is_empty() {
        warn!(path = %input.display(), "目录中没有 DXF 文件");
    } else {
        debug!(path = %input.display(), files = files.len(), "已展开输入目录");
    }
    files
}

fn has_dxf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dxf"))
}

/// 转换单个文件并写到 `output`。SVG 完整生成后才会写盘。
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConversionOptions,
) -> Result<ConvertedFile, FrontendError> {
    let result = load_source(input).and_then(|document| {
        convert(&document, options).map_err(|source| FrontendError::Convert {
            path: input.to_path_buf(),
            source,
        })
    });
    let conversion: Conversion = match result {
        Ok(conversion) => conversion,
        Err(err) => {
            warn!(path = %input.display(), error = %err, "文件转换失败");
            return Err(err);
        }
    };

    dxfsvg_io::save_svg(output, &conversion.markup).map_err(|source| {
        warn!(path = %output.display(), error = %source, "写出 SVG 失败");
        FrontendError::Write {
            path: output.to_path_buf(),
            source,
        }
    })?;
    info!(
        input = %input.display(),
        output = %output.display(),
        groups = conversion.group_count(),
        "已写出 SVG"
    );

    Ok(ConvertedFile {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        groups: conversion.group_count(),
        annotated: conversion.annotated_count(),
        dimensions: conversion.dimension_count,
    })
}

/// `.dxf`/`.json`（不区分大小写）替换为 `.svg`，其他文件名直接追加 `.svg`。
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input.file_name().map(OsString::from).unwrap_or_default();
    let known = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dxf") || ext.eq_ignore_ascii_case("json"));
    let mut name = if known {
        input.file_stem().map(OsString::from).unwrap_or_default()
    } else {
        file_name
    };
    name.push(".svg");

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
