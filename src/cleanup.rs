use crate::config::Cleanup;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Deletes transient rasters directly inside `dir`.
///
/// An entry goes when its lowercased name contains both the source marker
/// and the intermediate marker, anywhere in the name. Subdirectories are not
/// visited; a matching directory is removed only when it is empty. A missing
/// directory or a blank marker is a no-op.
pub fn clean_intermediates(dir: &Path, markers: &Cleanup) -> Vec<PathBuf> {
    if markers.source_marker.trim().is_empty() || markers.intermediate_marker.trim().is_empty() {
        warn!("skip cleanup of {}: cleanup markers must not be blank", dir.display());
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("skip cleanup of {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let source = markers.source_marker.to_lowercase();
    let intermediate = markers.intermediate_marker.to_lowercase();
    let mut removed = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !(name.contains(&source) && name.contains(&intermediate)) {
            continue;
        }
        let path = entry.path();
        let removal = if path.is_dir() {
            std::fs::remove_dir(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match removal {
            Ok(()) => removed.push(path),
            Err(err) => warn!("cannot remove intermediate {}: {err}", path.display()),
        }
    }
    removed
}
