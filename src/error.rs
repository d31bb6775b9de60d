use std::path::PathBuf;

/// Every way a batch OCR run can abort.
///
/// All variants are fatal to the run; the caller is expected to mark the
/// enclosing batch as errored. Nothing in this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("no pages found in batch {batch_id}")]
    NoPagesFound { batch_id: String },

    #[error("no valid extensions are configured")]
    NoValidExtensionsConfigured,

    #[error("file {file_name} has invalid extension")]
    InvalidExtension { file_name: String },

    #[error("no OCR command templates are configured for this platform")]
    NoCommandsConfigured,

    #[error("missing property `{key}` for plugin {plugin}")]
    MissingProperty { plugin: String, key: String },

    #[error("cannot create lock marker {}: {source}", path.display())]
    LockCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot remove lock marker {}: {source}", path.display())]
    LockRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot prepare OCR task for {page}: {reason}")]
    TaskConstruction { page: String, reason: String },

    #[error("OCR failed for {page}: {reason}")]
    TaskFailed { page: String, reason: String },

    #[error("cannot start OCR worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("batch store: {0:#}")]
    Store(anyhow::Error),
}

impl OcrError {
    pub fn task_failed(page: impl Into<String>, reason: impl Into<String>) -> Self {
        OcrError::TaskFailed {
            page: page.into(),
            reason: reason.into(),
        }
    }

    pub fn task_construction(page: impl Into<String>, reason: impl Into<String>) -> Self {
        OcrError::TaskConstruction {
            page: page.into(),
            reason: reason.into(),
        }
    }
}
