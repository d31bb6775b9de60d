use crate::{error::OcrError, util::now_rfc3339};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Advisory "OCR in progress" marker for one (batch, plugin) pair.
///
/// This is a signal for external supervisors, not a mutex: nothing stops a
/// second run from creating the same marker. The file is removed by
/// [`LockMarker::release`] or, failing that, on drop.
#[derive(Debug)]
pub struct LockMarker {
    path: PathBuf,
    released: bool,
}

impl LockMarker {
    /// `<batch_folder>/<lock_folder_name>/<plugin>`.
    pub fn path_for(batch_folder: &Path, lock_folder_name: &str, plugin: &str) -> PathBuf {
        batch_folder.join(lock_folder_name).join(plugin)
    }

    pub fn acquire(
        batch_folder: &Path,
        lock_folder_name: &str,
        batch_id: &str,
        plugin: &str,
    ) -> Result<Self, OcrError> {
        let path = Self::path_for(batch_folder, lock_folder_name, plugin);
        let create = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let body = format!("batch={batch_id}\nplugin={plugin}\ncreated={}\n", now_rfc3339());
            std::fs::write(&path, body)
        };
        create().map_err(|source| OcrError::LockCreation {
            path: path.clone(),
            source,
        })?;
        debug!("lock marker created {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the marker. An already missing file counts as released.
    pub fn release(mut self) -> Result<(), OcrError> {
        self.released = true;
        remove_marker(&self.path).map_err(|source| OcrError::LockRemoval {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for LockMarker {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!("lock marker dropped without release: {}", self.path.display());
        if let Err(err) = remove_marker(&self.path) {
            error!("cannot remove lock marker {}: {err}", self.path.display());
        }
    }
}

fn remove_marker(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("lock marker removed {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
