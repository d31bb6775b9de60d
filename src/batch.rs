use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The document tree of one batch instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_instance_id: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Fields this crate does not interpret, carried through load/save.
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub new_file_name: String,
    #[serde(default)]
    pub ocr_input_file_name: String,
    #[serde(default)]
    pub hocr_file_name: String,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Batch {
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.documents.iter().flat_map(|d| d.pages.iter())
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.documents.iter_mut().flat_map(|d| d.pages.iter_mut())
    }
}

/// Load/save capability for batch document trees.
pub trait BatchStore {
    fn load(&self, batch_id: &str) -> Result<Batch>;
    fn save(&self, batch: &Batch) -> Result<()>;
}

/// Stores each batch as pretty JSON at `<root>/<batch_id>/<file_name>`.
pub struct JsonBatchStore {
    root: PathBuf,
    file_name: String,
}

impl JsonBatchStore {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path_for(&self, batch_id: &str) -> PathBuf {
        self.root.join(batch_id).join(&self.file_name)
    }
}

impl BatchStore for JsonBatchStore {
    fn load(&self, batch_id: &str) -> Result<Batch> {
        let path = self.path_for(batch_id);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading batch: {}", path.display()))?;
        let mut batch: Batch = serde_json::from_str(&raw)
            .with_context(|| format!("parsing batch JSON: {}", path.display()))?;
        if batch.batch_instance_id.is_empty() {
            batch.batch_instance_id = batch_id.to_string();
        }
        Ok(batch)
    }

    fn save(&self, batch: &Batch) -> Result<()> {
        let path = self.path_for(&batch.batch_instance_id);
        let body = serde_json::to_string_pretty(batch)?;
        std::fs::write(&path, body).with_context(|| format!("writing batch: {}", path.display()))
    }
}
