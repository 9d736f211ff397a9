//! Storage interfaces and implementations for persisting arbitrage data.

mod json;
mod memory;

pub use json::{JsonFileStore, JsonStoreConfig};
pub use memory::MemoryStore;

use crate::domain::{ArbitrageRecord, RunningStats};
use async_trait::async_trait;

/// Changes applied to the statistics document after an executed arbitrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsUpdate {
    pub is_profitable: bool,
    pub profit: f64,
    /// Engine balance after the trade; overwrites the stored value.
    pub current_balance: f64,
    pub asset_balance: f64,
}

/// TradeStore persists the trade log and the cumulative statistics.
///
/// Every mutating call is a single read-modify-write performed under the
/// store's own lock.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Appends one record to the end of the trade log.
    async fn append_trade(&self, record: &ArbitrageRecord) -> Result<(), StorageError>;

    /// Applies an update to the statistics and returns the stored result.
    async fn update_stats(&self, update: &StatsUpdate) -> Result<RunningStats, StorageError>;

    /// Returns the whole trade log, oldest first.
    async fn load_trades(&self) -> Result<Vec<ArbitrageRecord>, StorageError>;

    /// Returns the current statistics.
    async fn load_stats(&self) -> Result<RunningStats, StorageError>;

    /// Replaces both documents.
    async fn overwrite(
        &self,
        trades: &[ArbitrageRecord],
        stats: &RunningStats,
    ) -> Result<(), StorageError>;
}

/// StorageError represents errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
