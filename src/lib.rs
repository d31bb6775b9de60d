//! Parallel OCR orchestration for scanned batches.
//!
//! A run selects the pages of a batch, checks their extensions, raises an
//! advisory lock marker, runs an external OCR engine per page on a bounded
//! worker pool and writes each produced hOCR filename back onto its page.

pub mod batch;
pub mod cleanup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod lock;
pub mod merge;
pub mod pipeline;
pub mod pool;
pub mod properties;
pub mod select;
pub mod util;

pub use error::OcrError;
