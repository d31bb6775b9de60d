use crate::{batch::Batch, select::ColorMode};
use tracing::debug;

/// Writes `hocr_file_name` onto every page whose authoritative filename
/// matches `source` case-insensitively. Returns how many pages changed.
///
/// No match is not an error. Calling this again with the same pair leaves
/// the tree as it is.
pub fn merge_result(batch: &mut Batch, mode: ColorMode, source: &str, hocr_file_name: &str) -> usize {
    let mut updated = 0;
    for page in batch.pages_mut() {
        if mode.file_name(page).trim().eq_ignore_ascii_case(source.trim()) {
            page.hocr_file_name = hocr_file_name.to_string();
            updated += 1;
        }
    }
    if updated == 0 {
        debug!("no page matched {source}; leaving tree unchanged");
    }
    updated
}
