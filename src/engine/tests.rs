//! Tests for the arbitrage engine.

use super::*;
use crate::domain::RunningStats;
use crate::storage::{JsonFileStore, JsonStoreConfig, MemoryStore, StorageError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tempfile::TempDir;

// ==================== Helpers ====================

fn engine_config(threshold: f64, max_slippage: f64) -> EngineConfig {
    EngineConfig {
        min_profit_threshold: threshold,
        trade_amount: 1.0,
        start_balance: 1000.0,
        asset_balance: 10.0,
        max_slippage,
        seed: Some(11),
    }
}

fn exchange(name: &str, base_price: f64, volatility: f64) -> Exchange {
    Exchange::new(name, base_price, volatility).unwrap()
}

fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(RunningStats::new(1000.0, 10.0)))
}

/// Feeds each exchange a fixed price sequence; the last price repeats.
struct ScriptedPrices {
    prices: HashMap<String, VecDeque<f64>>,
}

impl ScriptedPrices {
    fn new(script: &[(&str, &[f64])]) -> Self {
        Self {
            prices: script
                .iter()
                .map(|(name, prices)| (name.to_string(), prices.iter().copied().collect()))
                .collect(),
        }
    }
}

impl PriceSource for ScriptedPrices {
    fn update_price(&mut self, exchange: &mut Exchange) -> f64 {
        if let Some(queue) = self.prices.get_mut(exchange.name()) {
            if queue.len() > 1 {
                if let Some(price) = queue.pop_front() {
                    exchange.set_current_price(price);
                }
            } else if let Some(price) = queue.front() {
                exchange.set_current_price(*price);
            }
        }
        exchange.current_price()
    }
}

/// Store whose every call fails.
struct FailingStore;

fn disk_on_fire() -> StorageError {
    StorageError::Io {
        path: "trade_history.json".into(),
        source: std::io::Error::other("disk on fire"),
    }
}

#[async_trait]
impl TradeStore for FailingStore {
    async fn append_trade(&self, _record: &ArbitrageRecord) -> Result<(), StorageError> {
        Err(disk_on_fire())
    }

    async fn update_stats(&self, _update: &StatsUpdate) -> Result<RunningStats, StorageError> {
        Err(disk_on_fire())
    }

    async fn load_trades(&self) -> Result<Vec<ArbitrageRecord>, StorageError> {
        Err(disk_on_fire())
    }

    async fn load_stats(&self) -> Result<RunningStats, StorageError> {
        Err(disk_on_fire())
    }

    async fn overwrite(
        &self,
        _trades: &[ArbitrageRecord],
        _stats: &RunningStats,
    ) -> Result<(), StorageError> {
        Err(disk_on_fire())
    }
}

// ==================== Construction ====================

#[test]
fn test_new_rejects_non_positive_trade_amount() {
    let mut cfg = engine_config(0.01, 0.0);
    cfg.trade_amount = 0.0;

    let result = ArbitrageEngine::new(cfg, vec![exchange("A", 1.0, 0.0)], memory_store());
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn test_new_rejects_negative_threshold() {
    let result = ArbitrageEngine::new(engine_config(-0.1, 0.0), Vec::new(), memory_store());
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn test_new_rejects_duplicate_exchange_names() {
    let exchanges = vec![exchange("A", 1.0, 0.0), exchange("A", 2.0, 0.0)];
    let result = ArbitrageEngine::new(engine_config(0.01, 0.0), exchanges, memory_store());
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_engine_without_exchanges_never_trades() {
    let mut engine =
        ArbitrageEngine::new(engine_config(0.0, 0.0), Vec::new(), memory_store()).unwrap();
    assert_eq!(engine.run_tick().await, TickOutcome::NoOpportunity);
}

// ==================== End-to-end scenarios ====================

#[tokio::test]
async fn test_two_exchange_fixed_spread() {
    let store = memory_store();
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 110.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, store.clone()).unwrap();

    let outcome = engine.run_tick().await;

    let TickOutcome::Executed { record, candidates } = outcome else {
        panic!("expected a trade, got {:?}", outcome);
    };
    assert_eq!(candidates, 1);
    assert_eq!(record.buy_trade.exchange, "A");
    assert_eq!(record.buy_trade.side, TradeSide::Buy);
    assert_eq!(record.buy_trade.price, 100.0);
    assert_eq!(record.sell_trade.exchange, "B");
    assert_eq!(record.sell_trade.side, TradeSide::Sell);
    assert_eq!(record.sell_trade.price, 110.0);
    assert_eq!(record.profit, 10.0);
    assert!((record.profit_percentage - 0.10).abs() < 1e-12);
    assert_eq!(engine.balance(), 1010.0);
    assert_eq!(engine.history(), &[record.clone()]);

    let stats = store.load_stats().await.unwrap();
    assert_eq!(stats.total_trades, 1);
    assert_eq!(stats.profitable_trades, 1);
    assert_eq!(stats.total_profit, 10.0);
    assert_eq!(stats.current_balance, 1010.0);
    assert_eq!(stats.asset_balance, 10.0);
    assert_eq!(store.load_trades().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_identical_prices_never_trade() {
    let store = memory_store();
    let exchanges = vec![
        exchange("A", 250.0, 0.0),
        exchange("B", 250.0, 0.0),
        exchange("C", 250.0, 0.0),
    ];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.0001, 0.001), exchanges, store.clone()).unwrap();

    for _ in 0..20 {
        assert_eq!(engine.run_tick().await, TickOutcome::NoOpportunity);
        assert_eq!(engine.balance(), 1000.0);
    }

    assert!(engine.history().is_empty());
    assert_eq!(engine.stats().ticks, 20);
    assert_eq!(engine.stats().trades_executed, 0);
    assert_eq!(store.load_stats().await.unwrap().total_trades, 0);
    assert!(store.load_trades().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_total_trades_matches_ticks_with_opportunities() {
    let store = memory_store();
    let exchanges = vec![
        exchange("Binance", 50_000.0, 0.02),
        exchange("Coinbase", 50_100.0, 0.025),
        exchange("Kraken", 49_900.0, 0.03),
    ];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.03, 0.001), exchanges, store.clone()).unwrap();

    let mut traded = 0;
    for _ in 0..200 {
        if let TickOutcome::Executed { .. } = engine.run_tick().await {
            traded += 1;
        }
    }

    assert!(traded > 0);
    assert!(traded < 200);
    assert_eq!(engine.stats().ticks_with_opportunities, traded);
    assert_eq!(store.load_stats().await.unwrap().total_trades, traded);
    assert_eq!(store.load_trades().await.unwrap().len() as u64, traded);
    assert_eq!(engine.history().len() as u64, traded);
}

// ==================== Bookkeeping ====================

#[tokio::test]
async fn test_balance_moves_by_realized_profit_exactly() {
    let exchanges = vec![
        exchange("A", 100.0, 0.05),
        exchange("B", 101.0, 0.05),
        exchange("C", 99.0, 0.05),
    ];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.005, 0.001), exchanges, memory_store()).unwrap();

    for _ in 0..100 {
        let before = engine.balance();
        if let TickOutcome::Executed { record, .. } = engine.run_tick().await {
            let expected = before
                + (record.sell_trade.price * record.sell_trade.amount
                    - record.buy_trade.price * record.buy_trade.amount);
            assert_eq!(engine.balance(), expected);
        } else {
            assert_eq!(engine.balance(), before);
        }
    }
}

#[tokio::test]
async fn test_records_pre_trade_estimate() {
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 103.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.01, 0.001), exchanges, memory_store()).unwrap();

    let TickOutcome::Executed { record, .. } = engine.run_tick().await else {
        panic!("expected a trade");
    };

    // The scan saw exactly 3%; slippage moves the executed spread.
    assert!((record.profit_percentage - 0.03).abs() < 1e-12);
    assert!((record.realized_percentage() - 0.03).abs() <= 0.0021);
}

#[tokio::test]
async fn test_picks_widest_spread() {
    let exchanges = vec![
        exchange("A", 100.0, 0.0),
        exchange("B", 100.0, 0.0),
        exchange("C", 100.0, 0.0),
    ];
    let prices = ScriptedPrices::new(&[
        ("A", &[100.0, 104.0]),
        ("B", &[103.0, 100.0]),
        ("C", &[101.0, 101.0]),
    ]);
    let mut engine = ArbitrageEngine::new(engine_config(0.005, 0.0), exchanges, memory_store())
        .unwrap()
        .with_price_source(Box::new(prices));

    // Tick 1: A=100, B=103, C=101. Candidates A->B 3%, A->C 1%, C->B ~1.98%.
    let TickOutcome::Executed { record, candidates } = engine.run_tick().await else {
        panic!("expected a trade");
    };
    assert_eq!(candidates, 3);
    assert_eq!(record.buy_trade.exchange, "A");
    assert_eq!(record.sell_trade.exchange, "B");

    // Tick 2: A=104, B=100, C=101. Direction flips: B->A wins at 4%.
    let TickOutcome::Executed { record, .. } = engine.run_tick().await else {
        panic!("expected a trade");
    };
    assert_eq!(record.buy_trade.exchange, "B");
    assert_eq!(record.sell_trade.exchange, "A");
    assert_eq!(engine.balance(), 1000.0 + 3.0 + 4.0);
}

#[tokio::test]
async fn test_tie_goes_to_first_enumerated_pair() {
    // A->B and A->C both show 10%; (0, 1) is enumerated before (0, 2).
    let exchanges = vec![
        exchange("A", 100.0, 0.0),
        exchange("B", 110.0, 0.0),
        exchange("C", 110.0, 0.0),
    ];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, memory_store()).unwrap();

    let TickOutcome::Executed { record, candidates } = engine.run_tick().await else {
        panic!("expected a trade");
    };
    assert_eq!(candidates, 2);
    assert_eq!(record.sell_trade.exchange, "B");
}

#[tokio::test]
async fn test_loss_counts_as_unprofitable() {
    // A 0.0001% spread clears a zero threshold, but slippage of up to 0.1%
    // per leg dwarfs it, so some fills lose money.
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 100.0001, 0.0)];
    let store = memory_store();
    let mut engine =
        ArbitrageEngine::new(engine_config(0.0, 0.001), exchanges, store.clone()).unwrap();

    for _ in 0..200 {
        engine.run_tick().await;
    }

    let stats = store.load_stats().await.unwrap();
    assert_eq!(stats.total_trades, 200);
    assert!(stats.profitable_trades < stats.total_trades);
    assert_eq!(stats.profitable_trades, engine.stats().profitable_trades);
}

// ==================== Persistence failures ====================

#[tokio::test]
async fn test_storage_failures_do_not_stop_the_run() {
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 110.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, Arc::new(FailingStore))
            .unwrap();

    let summary = engine.run_simulation(3, Duration::ZERO).await;

    assert_eq!(summary.stats.trades_executed, 3);
    assert_eq!(summary.stats.persist_failures, 6);
    assert_eq!(summary.final_balance, 1030.0);
    assert_eq!(engine.history().len(), 3);
}

#[tokio::test]
async fn test_restore_balances_fails_with_storage() {
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), Vec::new(), Arc::new(FailingStore))
            .unwrap();

    let result = engine.restore_balances().await;
    assert!(matches!(result, Err(EngineError::Storage(_))));
    assert_eq!(engine.balance(), 1000.0);
}

// ==================== Simulation runs ====================

#[tokio::test]
async fn test_run_simulation_summary() {
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 110.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, memory_store()).unwrap();

    let summary = engine.run_simulation(4, Duration::ZERO).await;

    assert_eq!(summary.opening_balance, 1000.0);
    assert_eq!(summary.final_balance, 1040.0);
    assert_eq!(summary.stats.ticks, 4);
    assert_eq!(summary.stats.trades_executed, 4);
    assert_eq!(summary.stats.profitable_trades, 4);
    assert_eq!(summary.stats.best_trade, Some(10.0));
    assert_eq!(summary.stats.total_volume, 4.0 * 210.0);
}

#[tokio::test]
async fn test_run_simulation_zero_iterations() {
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 110.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, memory_store()).unwrap();

    let summary = engine.run_simulation(0, Duration::from_secs(60)).await;
    assert_eq!(summary.stats.ticks, 0);
    assert_eq!(summary.final_balance, 1000.0);
}

#[tokio::test(start_paused = true)]
async fn test_run_simulation_sleeps_between_ticks_only() {
    let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 100.0, 0.0)];
    let mut engine =
        ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, memory_store()).unwrap();

    let started = tokio::time::Instant::now();
    engine.run_simulation(3, Duration::from_millis(30)).await;

    assert_eq!(started.elapsed(), Duration::from_millis(60));
}

#[tokio::test]
async fn test_consecutive_runs_share_one_ledger() {
    let dir = TempDir::new().unwrap();
    let store_cfg = JsonStoreConfig {
        data_dir: dir.path().to_path_buf(),
        ..JsonStoreConfig::default()
    };
    let initial = RunningStats::new(1000.0, 10.0);

    for _ in 0..2 {
        let store = Arc::new(JsonFileStore::open(&store_cfg, &initial).await.unwrap());
        let exchanges = vec![exchange("A", 100.0, 0.0), exchange("B", 110.0, 0.0)];
        let mut engine =
            ArbitrageEngine::new(engine_config(0.05, 0.0), exchanges, store).unwrap();
        engine.restore_balances().await.unwrap();
        engine.run_simulation(2, Duration::ZERO).await;
    }

    let store = JsonFileStore::open(&store_cfg, &initial).await.unwrap();
    let stats = store.load_stats().await.unwrap();
    assert_eq!(stats.total_trades, 4);
    assert_eq!(stats.start_balance, 1000.0);
    assert_eq!(stats.total_profit, 40.0);
    assert_eq!(stats.current_balance, 1040.0);
    assert_eq!(stats.balance_drift(), 0.0);
    assert_eq!(store.load_trades().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    async fn run() -> Vec<f64> {
        let exchanges = vec![
            exchange("A", 100.0, 0.03),
            exchange("B", 100.0, 0.03),
            exchange("C", 100.0, 0.03),
        ];
        let mut engine =
            ArbitrageEngine::new(engine_config(0.01, 0.001), exchanges, memory_store()).unwrap();
        engine.run_simulation(30, Duration::ZERO).await;
        engine.history().iter().map(|r| r.profit).collect()
    }

    let first = run().await;
    assert!(!first.is_empty());
    assert_eq!(first, run().await);
}
