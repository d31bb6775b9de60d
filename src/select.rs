use crate::{batch::Batch, batch::Page, error::OcrError};
use serde::{Deserialize, Serialize};

/// Which page filename feeds the OCR engine for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Use `ocr_input_file_name`.
    On,
    /// Use `new_file_name`.
    Off,
}

impl ColorMode {
    /// Only the exact value `ON` selects color input.
    pub fn from_switch(value: &str) -> Self {
        if value == "ON" {
            ColorMode::On
        } else {
            ColorMode::Off
        }
    }

    pub fn as_switch(self) -> &'static str {
        match self {
            ColorMode::On => "ON",
            ColorMode::Off => "OFF",
        }
    }

    /// The authoritative filename of `page` under this mode.
    pub fn file_name(self, page: &Page) -> &str {
        match self {
            ColorMode::On => &page.ocr_input_file_name,
            ColorMode::Off => &page.new_file_name,
        }
    }
}

/// Filenames of every page eligible for OCR, in document then page order.
///
/// Duplicates are kept. An empty result is an error.
pub fn select_pages(batch: &Batch, mode: ColorMode) -> Result<Vec<String>, OcrError> {
    let pages: Vec<String> = batch
        .pages()
        .map(|p| mode.file_name(p))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if pages.is_empty() {
        return Err(OcrError::NoPagesFound {
            batch_id: batch.batch_instance_id.clone(),
        });
    }
    Ok(pages)
}
