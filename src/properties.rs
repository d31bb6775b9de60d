use crate::config::{Config, PluginProperties};
use crate::error::OcrError;
use std::collections::BTreeMap;

pub const SWITCH: &str = "switch";
pub const VALID_EXTENSIONS: &str = "valid_extensions";
pub const LANGUAGE: &str = "language";
pub const VERSION: &str = "version";
pub const COLOR_SWITCH: &str = "color_switch";

/// Key/value lookup scoped to a batch instance and a plugin.
pub trait PropertySource {
    fn property(&self, batch_id: &str, plugin: &str, key: &str) -> Option<String>;

    fn require(&self, batch_id: &str, plugin: &str, key: &str) -> Result<String, OcrError> {
        self.property(batch_id, plugin, key)
            .ok_or_else(|| OcrError::MissingProperty {
                plugin: plugin.to_string(),
                key: key.to_string(),
            })
    }
}

/// Properties read from the `[properties]` and `[batch_properties]` tables.
#[derive(Debug, Clone, Default)]
pub struct ConfigProperties {
    defaults: PluginProperties,
    overrides: BTreeMap<String, PluginProperties>,
}

impl ConfigProperties {
    pub fn new(cfg: &Config) -> Self {
        Self {
            defaults: cfg.properties.clone(),
            overrides: cfg.batch_properties.clone(),
        }
    }
}

impl PropertySource for ConfigProperties {
    fn property(&self, batch_id: &str, plugin: &str, key: &str) -> Option<String> {
        self.overrides
            .get(batch_id)
            .and_then(|plugins| plugins.get(plugin))
            .and_then(|keys| keys.get(key))
            .or_else(|| self.defaults.get(plugin).and_then(|keys| keys.get(key)))
            .cloned()
    }
}

/// `"ON"` in any case, surrounding whitespace ignored.
pub fn is_on(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("ON")
}
