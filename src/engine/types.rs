use crate::{commands::CommandTemplates, error::OcrError, select::ColorMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parameters shared by every task of one run.
#[derive(Debug, Clone)]
pub struct TaskParams {
    pub templates: CommandTemplates,
    pub language: String,
    pub version: String,
    pub color: ColorMode,
    pub work_dir: PathBuf,
    pub hocr_extension: String,
}

/// One page's OCR job, fully resolved before dispatch.
#[derive(Debug, Clone)]
pub struct OcrTask {
    pub page: String,
    pub source: PathBuf,
    /// Expected engine output, `<work_dir>/<stem>.<hocr_extension>`.
    pub target: PathBuf,
    pub target_base: PathBuf,
    pub hocr_file_name: String,
    pub params: Arc<TaskParams>,
}

impl OcrTask {
    /// Fails when the source image is not in the working directory or the
    /// filename has no usable stem.
    pub fn new(page: &str, params: Arc<TaskParams>) -> Result<Self, OcrError> {
        let source = params.work_dir.join(page);
        if !source.is_file() {
            return Err(OcrError::task_construction(
                page,
                format!("source image not found: {}", source.display()),
            ));
        }
        let stem = Path::new(page)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| OcrError::task_construction(page, "filename has no base name"))?;

        let hocr_file_name = format!("{stem}.{}", params.hocr_extension);
        Ok(Self {
            page: page.to_string(),
            target: params.work_dir.join(&hocr_file_name),
            target_base: params.work_dir.join(stem),
            source,
            hocr_file_name,
            params,
        })
    }
}

/// A task whose engine call succeeded and whose output file exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub page: String,
    pub hocr_file_name: String,
}
