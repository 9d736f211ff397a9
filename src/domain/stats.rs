//! Cumulative trading statistics, as written to the stats document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profit realized on a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: f64,
}

/// Running statistics across all runs sharing a stats document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    pub total_trades: u64,
    pub profitable_trades: u64,
    pub total_profit: f64,
    pub start_balance: f64,
    pub current_balance: f64,
    /// Asset holdings. Copied through unchanged by the simulation.
    pub asset_balance: f64,
    /// Per-day breakdown. Only the sample generator fills this in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_profits: Option<Vec<DailyProfit>>,
}

impl RunningStats {
    /// Fresh statistics with no trades.
    pub fn new(start_balance: f64, asset_balance: f64) -> Self {
        Self {
            total_trades: 0,
            profitable_trades: 0,
            total_profit: 0.0,
            start_balance,
            current_balance: start_balance,
            asset_balance,
            daily_profits: None,
        }
    }

    /// Applies one executed arbitrage.
    pub fn record_trade(
        &mut self,
        is_profitable: bool,
        profit: f64,
        current_balance: f64,
        asset_balance: f64,
    ) {
        self.total_trades += 1;
        if is_profitable {
            self.profitable_trades += 1;
        }
        self.total_profit += profit;
        self.current_balance = current_balance;
        self.asset_balance = asset_balance;
    }

    /// Share of trades that made money, 0 when nothing has traded.
    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.profitable_trades as f64 / self.total_trades as f64
    }

    /// Difference between the recorded balance and start_balance + total_profit.
    pub fn balance_drift(&self) -> f64 {
        self.current_balance - (self.start_balance + self.total_profit)
    }
}
