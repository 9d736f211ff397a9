//! Storage configuration.

use serde::Deserialize;
use std::path::PathBuf;

use crate::storage::JsonStoreConfig;

/// Trade log and statistics file settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both documents (default: "data").
    pub data_dir: String,
    /// Trade log file name inside data_dir.
    pub trade_history_file: String,
    /// Statistics file name inside data_dir.
    pub stats_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let store = JsonStoreConfig::default();
        Self {
            data_dir: store.data_dir.display().to_string(),
            trade_history_file: store.trade_history_file,
            stats_file: store.stats_file,
        }
    }
}

impl StorageConfig {
    pub fn to_store_config(&self) -> JsonStoreConfig {
        JsonStoreConfig {
            data_dir: PathBuf::from(&self.data_dir),
            trade_history_file: self.trade_history_file.clone(),
            stats_file: self.stats_file.clone(),
        }
    }
}
