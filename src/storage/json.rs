//! Flat JSON file implementation of TradeStore.
//!
//! Two documents live in the data directory: a JSON array of arbitrage
//! records and a JSON object of running statistics. Both are rewritten in
//! full on every change, via a temporary file and a rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{ArbitrageRecord, RunningStats};
use crate::storage::{StatsUpdate, StorageError, TradeStore};

/// JsonStoreConfig holds file locations for the JSON store.
#[derive(Debug, Clone)]
pub struct JsonStoreConfig {
    /// Directory holding both documents. Created if missing.
    pub data_dir: PathBuf,
    pub trade_history_file: String,
    pub stats_file: String,
}

impl Default for JsonStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            trade_history_file: "trade_history.json".to_string(),
            stats_file: "stats.json".to_string(),
        }
    }
}

impl JsonStoreConfig {
    pub fn trade_history_path(&self) -> PathBuf {
        self.data_dir.join(&self.trade_history_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.stats_file)
    }
}

/// JsonFileStore implements TradeStore on top of two JSON files.
pub struct JsonFileStore {
    trades_path: PathBuf,
    stats_path: PathBuf,
    // Serializes read-modify-write cycles on both files.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, creating the data directory and any missing or
    /// unreadable document. `initial_stats` is written when the stats
    /// document has to be created.
    pub async fn open(
        config: &JsonStoreConfig,
        initial_stats: &RunningStats,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| io_error(&config.data_dir, e))?;

        let store = Self {
            trades_path: config.trade_history_path(),
            stats_path: config.stats_path(),
            lock: Mutex::new(()),
        };

        store
            .ensure_document::<Vec<ArbitrageRecord>>(&store.trades_path, &Vec::new())
            .await?;
        store
            .ensure_document::<RunningStats>(&store.stats_path, initial_stats)
            .await?;

        info!(
            trades = %store.trades_path().display(),
            stats = %store.stats_path().display(),
            "JSON storage initialized"
        );
        Ok(store)
    }

    pub fn trades_path(&self) -> &Path {
        &self.trades_path
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    /// Writes `default` to `path` unless it already holds a valid document.
    async fn ensure_document<T>(&self, path: &Path, default: &T) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
    {
        match read_json::<T>(path).await {
            Ok(_) => Ok(()),
            Err(StorageError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!(path = %path.display(), "Creating document");
                write_json(path, default).await
            }
            Err(StorageError::Json { source, .. }) => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "Malformed document, reinitializing"
                );
                write_json(path, default).await
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl TradeStore for JsonFileStore {
    async fn append_trade(&self, record: &ArbitrageRecord) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        let mut trades: Vec<ArbitrageRecord> = read_json(&self.trades_path).await?;
        trades.push(record.clone());
        write_json(&self.trades_path, &trades).await?;

        debug!(count = trades.len(), "Trade appended");
        Ok(())
    }

    async fn update_stats(&self, update: &StatsUpdate) -> Result<RunningStats, StorageError> {
        let _guard = self.lock.lock().await;

        let mut stats: RunningStats = read_json(&self.stats_path).await?;
        stats.record_trade(
            update.is_profitable,
            update.profit,
            update.current_balance,
            update.asset_balance,
        );
        write_json(&self.stats_path, &stats).await?;

        Ok(stats)
    }

    async fn load_trades(&self) -> Result<Vec<ArbitrageRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        read_json(&self.trades_path).await
    }

    async fn load_stats(&self) -> Result<RunningStats, StorageError> {
        let _guard = self.lock.lock().await;
        read_json(&self.stats_path).await
    }

    async fn overwrite(
        &self,
        trades: &[ArbitrageRecord],
        stats: &RunningStats,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        write_json(&self.trades_path, trades).await?;
        write_json(&self.stats_path, stats).await
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;

    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.display().to_string(),
        source,
    })
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.display().to_string(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).await.map_err(|e| io_error(path, e))
}
