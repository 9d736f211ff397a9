//! Engine configuration.

use crate::config::Config;

/// Engine configuration options.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Spread a pair must strictly exceed to be traded.
    pub min_profit_threshold: f64,
    /// Quantity bought and sold per arbitrage.
    pub trade_amount: f64,
    /// Opening quote balance, unless restored from the store.
    pub start_balance: f64,
    /// Asset holdings, carried into the statistics unchanged.
    pub asset_balance: f64,
    /// Execution slippage bound.
    pub max_slippage: f64,
    /// RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn from_config(cfg: &Config) -> Self {
        let sim = &cfg.simulation;
        Self {
            min_profit_threshold: sim.min_profit_threshold,
            trade_amount: sim.trade_amount,
            start_balance: sim.start_balance,
            asset_balance: sim.asset_balance,
            max_slippage: sim.max_slippage,
            seed: sim.seed,
        }
    }
}
