//! Arbitrage simulation engine.
//!
//! Coordinates the price feeds, the opportunity scanner, the trade executor
//! and the trade store. Everything runs on one sequential control flow: a
//! tick refreshes every price, scans, trades at most once and persists.

mod config;
mod error;
mod stats;

pub use config::EngineConfig;
pub use error::EngineError;
pub use stats::{SimulationSummary, TickStats};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::{ArbitrageRecord, Exchange, TradeSide};
use crate::market::{
    OpportunityScanner, PriceSource, TradeExecutor, UniformPriceSource, rng_from_seed, select_best,
};
use crate::storage::{StatsUpdate, TradeStore};

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No pair cleared the threshold. Only prices changed.
    NoOpportunity,
    /// The best opportunity was traded.
    Executed {
        record: ArbitrageRecord,
        /// Number of opportunities the scan found.
        candidates: usize,
    },
}

/// Simulated cross-exchange arbitrage engine.
pub struct ArbitrageEngine {
    exchanges: Vec<Exchange>,
    price_source: Box<dyn PriceSource>,
    executor: TradeExecutor,
    scanner: OpportunityScanner,
    store: Arc<dyn TradeStore>,

    trade_amount: f64,
    start_balance: f64,
    balance: f64,
    assets: f64,

    history: Vec<ArbitrageRecord>,
    stats: TickStats,
}

impl ArbitrageEngine {
    /// Creates an engine over `exchanges`, which are scanned in the given order.
    pub fn new(
        cfg: EngineConfig,
        exchanges: Vec<Exchange>,
        store: Arc<dyn TradeStore>,
    ) -> Result<Self, EngineError> {
        validate(&cfg, &exchanges)?;

        let price_rng = rng_from_seed(cfg.seed);
        let executor_rng = rng_from_seed(cfg.seed.map(|s| s.wrapping_add(1)));

        Ok(Self {
            exchanges,
            price_source: Box::new(UniformPriceSource::new(price_rng)),
            executor: TradeExecutor::new(cfg.max_slippage, executor_rng),
            scanner: OpportunityScanner::new(cfg.min_profit_threshold),
            store,
            trade_amount: cfg.trade_amount,
            start_balance: cfg.start_balance,
            balance: cfg.start_balance,
            assets: cfg.asset_balance,
            history: Vec::new(),
            stats: TickStats::default(),
        })
    }

    /// Replaces the price feed.
    #[cfg(test)]
    pub fn with_price_source(mut self, price_source: Box<dyn PriceSource>) -> Self {
        self.price_source = price_source;
        self
    }

    /// Picks up balances from the persisted statistics so consecutive runs
    /// continue one ledger.
    pub async fn restore_balances(&mut self) -> Result<(), EngineError> {
        let stats = self.store.load_stats().await?;

        self.start_balance = stats.start_balance;
        self.balance = stats.current_balance;
        self.assets = stats.asset_balance;

        info!(
            start_balance = self.start_balance,
            current_balance = self.balance,
            total_trades = stats.total_trades,
            "Restored balances from storage"
        );
        Ok(())
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn start_balance(&self) -> f64 {
        self.start_balance
    }

    pub fn asset_balance(&self) -> f64 {
        self.assets
    }

    /// Arbitrages executed by this engine, oldest first.
    pub fn history(&self) -> &[ArbitrageRecord] {
        &self.history
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Runs one tick: refresh, scan, trade the best opportunity, persist.
    pub async fn run_tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        // All prices move before the scan so it sees one consistent snapshot.
        for exchange in self.exchanges.iter_mut() {
            self.price_source.update_price(exchange);
        }

        let opportunities = self.scanner.scan(&self.exchanges);
        self.stats.opportunities_detected += opportunities.len() as u64;

        let Some(best) = select_best(&opportunities) else {
            info!("No arbitrage opportunities found");
            self.report_prices();
            return TickOutcome::NoOpportunity;
        };
        self.stats.ticks_with_opportunities += 1;

        info!(
            buy_exchange = %best.buy_exchange,
            buy_price = best.buy_price,
            sell_exchange = %best.sell_exchange,
            sell_price = best.sell_price,
            expected_profit = best.expected_profit(self.trade_amount),
            candidates = opportunities.len(),
            "Found arbitrage opportunity"
        );

        let buy_trade = self.executor.execute_trade(
            &self.exchanges[best.buy_index],
            self.trade_amount,
            TradeSide::Buy,
        );
        let sell_trade = self.executor.execute_trade(
            &self.exchanges[best.sell_index],
            self.trade_amount,
            TradeSide::Sell,
        );

        let volume = buy_trade.notional() + sell_trade.notional();
        let record = ArbitrageRecord::from_legs(buy_trade, sell_trade, best.profit_percentage);
        self.balance += record.profit;
        self.stats.record_trade(record.profit, volume);

        info!(
            profit = record.profit,
            estimated_pct = record.profit_percentage * 100.0,
            realized_pct = record.realized_percentage() * 100.0,
            "Executed arbitrage"
        );

        self.history.push(record.clone());
        self.persist(&record).await;
        self.report_prices();

        TickOutcome::Executed {
            record,
            candidates: opportunities.len(),
        }
    }

    /// Runs `iterations` ticks, pausing `interval` between them.
    pub async fn run_simulation(
        &mut self,
        iterations: usize,
        interval: Duration,
    ) -> SimulationSummary {
        let opening_balance = self.balance;

        info!(
            iterations,
            interval = ?interval,
            threshold = self.scanner.min_profit_threshold(),
            exchanges = self.exchanges.len(),
            "Starting arbitrage simulation"
        );
        for exchange in &self.exchanges {
            debug!(
                exchange = %exchange.name(),
                floor = exchange.price_floor(),
                ceiling = exchange.price_ceiling(),
                "Price band"
            );
        }

        for i in 0..iterations {
            info!(iteration = i + 1, total = iterations, "Tick");
            if let TickOutcome::Executed { record, candidates } = self.run_tick().await {
                debug!(candidates, profit = record.profit, "Tick traded");
            }

            if i + 1 < iterations && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        let summary = SimulationSummary {
            stats: self.stats.clone(),
            opening_balance,
            final_balance: self.balance,
        };

        info!(
            final_balance = summary.final_balance,
            trades = summary.stats.trades_executed,
            profitable = summary.stats.profitable_trades,
            persist_failures = summary.stats.persist_failures,
            "Simulation completed"
        );

        summary
    }

    /// Writes the record and the stats update. Failures are logged and
    /// counted; in-memory state stays authoritative.
    async fn persist(&mut self, record: &ArbitrageRecord) {
        if let Err(e) = self.store.append_trade(record).await {
            self.stats.persist_failures += 1;
            error!(error = %e, "Error saving trade");
        }

        let update = StatsUpdate {
            is_profitable: record.is_profitable(),
            profit: record.profit,
            current_balance: self.balance,
            asset_balance: self.assets,
        };

        match self.store.update_stats(&update).await {
            Ok(stats) => {
                debug!(
                    total_trades = stats.total_trades,
                    total_profit = stats.total_profit,
                    win_rate = stats.win_rate(),
                    "Stats updated"
                );
                if stats.balance_drift().abs() > 1e-6 {
                    warn!(
                        drift = stats.balance_drift(),
                        "Stored balance diverges from start_balance + total_profit"
                    );
                }
            }
            Err(e) => {
                self.stats.persist_failures += 1;
                error!(error = %e, "Error updating stats");
            }
        }
    }

    fn report_prices(&self) {
        for exchange in &self.exchanges {
            info!(
                exchange = %exchange.name(),
                price = exchange.current_price(),
                "Current price"
            );
        }
        info!(balance = self.balance, "Current balance");
    }
}

fn validate(cfg: &EngineConfig, exchanges: &[Exchange]) -> Result<(), EngineError> {
    if !cfg.trade_amount.is_finite() || cfg.trade_amount <= 0.0 {
        return Err(EngineError::InvalidConfig(format!(
            "trade_amount must be positive, got {}",
            cfg.trade_amount
        )));
    }
    if !cfg.min_profit_threshold.is_finite() || cfg.min_profit_threshold < 0.0 {
        return Err(EngineError::InvalidConfig(format!(
            "min_profit_threshold must be non-negative, got {}",
            cfg.min_profit_threshold
        )));
    }
    if !cfg.max_slippage.is_finite() || !(0.0..1.0).contains(&cfg.max_slippage) {
        return Err(EngineError::InvalidConfig(format!(
            "max_slippage must be in [0, 1), got {}",
            cfg.max_slippage
        )));
    }

    let mut names = HashSet::new();
    for exchange in exchanges {
        if !names.insert(exchange.name()) {
            return Err(EngineError::InvalidConfig(format!(
                "duplicate exchange name {}",
                exchange.name()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
