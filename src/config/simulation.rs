//! Simulation loop configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;
use crate::market::DEFAULT_MAX_SLIPPAGE;

/// Simulation loop and bookkeeping settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run (default: 10).
    pub iterations: usize,
    /// Pause between ticks (default: 1s).
    #[serde(with = "duration")]
    pub interval: Duration,
    /// Minimum spread to trade, as a fraction (e.g. 0.005 for 0.5%).
    pub min_profit_threshold: f64,
    /// Quantity bought and sold on each arbitrage.
    pub trade_amount: f64,
    /// Quote balance of a fresh stats document.
    pub start_balance: f64,
    /// Asset balance of a fresh stats document.
    pub asset_balance: f64,
    /// Execution slippage bound, as a fraction (default: 0.001).
    pub max_slippage: f64,
    /// RNG seed for reproducible runs (optional).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            interval: Duration::from_secs(1),
            min_profit_threshold: 0.005,
            trade_amount: 1.0,
            start_balance: 1000.0,
            asset_balance: 10.0,
            max_slippage: DEFAULT_MAX_SLIPPAGE,
            seed: None,
        }
    }
}
