use crate::error::OcrError;

/// Parses a `;`-separated allow-list, dropping empty entries.
pub fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checks `file_name` against `allowed`.
///
/// The candidate extension is everything after the *first* dot, so
/// `scan.part1.tif` is checked as `part1.tif`. A name without a dot is
/// compared whole.
pub fn validate_extension(file_name: &str, allowed: &[String]) -> Result<(), OcrError> {
    if allowed.is_empty() {
        return Err(OcrError::NoValidExtensionsConfigured);
    }
    let candidate = match file_name.find('.') {
        Some(i) => &file_name[i + 1..],
        None => file_name,
    };
    if allowed.iter().any(|ext| candidate.eq_ignore_ascii_case(ext)) {
        Ok(())
    } else {
        Err(OcrError::InvalidExtension {
            file_name: file_name.to_string(),
        })
    }
}
