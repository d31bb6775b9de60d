pub mod command;
pub mod types;

use anyhow::Result;

pub use types::{CompletedTask, OcrTask, TaskParams};

/// An external OCR engine. Implementations must be callable from several
/// worker threads at once.
pub trait OcrEngine: Send + Sync {
    /// Produces `task.target` or fails.
    fn recognize(&self, task: &OcrTask) -> Result<()>;
}
