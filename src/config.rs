use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Plugin-scoped string properties: plugin name -> key -> value.
pub type PluginProperties = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub cleanup: Cleanup,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub properties: PluginProperties,
    /// Per-batch overrides keyed by batch instance id.
    #[serde(default)]
    pub batch_properties: BTreeMap<String, PluginProperties>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Working folder of one batch: `<local_folder>/<batch_id>`.
    pub fn batch_folder(&self, batch_id: &str) -> PathBuf {
        PathBuf::from(&self.paths.local_folder).join(batch_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub max_parallel_tasks: usize,
    pub keep_intermediates: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 4,
            keep_intermediates: false,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub local_folder: String,
    pub lock_folder_name: String,
    pub batch_file_name: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            local_folder: "batches".into(),
            lock_folder_name: "thread-pool-lock".into(),
            batch_file_name: "batch.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Commands {
    pub windows: String,
    pub unix: String,
}
impl Default for Commands {
    fn default() -> Self {
        Self {
            windows: "cmd;/c;tesseract;{source};{target_base};-l;{language};hocr".into(),
            unix: "tesseract;{source};{target_base};-l;{language};hocr".into(),
        }
    }
}

impl Commands {
    /// The raw template string for the host this binary was built for.
    pub fn for_host(&self) -> &str {
        if cfg!(windows) {
            &self.windows
        } else {
            &self.unix
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub hocr_extension: String,
    /// 0 disables the timeout; a hung engine then blocks its worker.
    pub timeout_seconds: u64,
    pub keep_stderr: bool,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            hocr_extension: "hocr".into(),
            timeout_seconds: 0,
            keep_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Cleanup {
    pub source_marker: String,
    pub intermediate_marker: String,
}
impl Default for Cleanup {
    fn default() -> Self {
        Self {
            source_marker: ".tif".into(),
            intermediate_marker: ".png".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
