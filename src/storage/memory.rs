//! In-memory TradeStore, for runs that should not touch disk.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ArbitrageRecord, RunningStats};
use crate::storage::{StatsUpdate, StorageError, TradeStore};

/// MemoryStore keeps both documents in process memory.
pub struct MemoryStore {
    state: Mutex<(Vec<ArbitrageRecord>, RunningStats)>,
}

impl MemoryStore {
    pub fn new(initial_stats: RunningStats) -> Self {
        Self {
            state: Mutex::new((Vec::new(), initial_stats)),
        }
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn append_trade(&self, record: &ArbitrageRecord) -> Result<(), StorageError> {
        self.state.lock().await.0.push(record.clone());
        Ok(())
    }

    async fn update_stats(&self, update: &StatsUpdate) -> Result<RunningStats, StorageError> {
        let mut state = self.state.lock().await;
        state.1.record_trade(
            update.is_profitable,
            update.profit,
            update.current_balance,
            update.asset_balance,
        );
        Ok(state.1.clone())
    }

    async fn load_trades(&self) -> Result<Vec<ArbitrageRecord>, StorageError> {
        Ok(self.state.lock().await.0.clone())
    }

    async fn load_stats(&self) -> Result<RunningStats, StorageError> {
        Ok(self.state.lock().await.1.clone())
    }

    async fn overwrite(
        &self,
        trades: &[ArbitrageRecord],
        stats: &RunningStats,
    ) -> Result<(), StorageError> {
        *self.state.lock().await = (trades.to_vec(), stats.clone());
        Ok(())
    }
}
