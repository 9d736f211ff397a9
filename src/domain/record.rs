//! Completed arbitrage records, as written to the trade log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Trade;
use super::timestamp;

/// ArbitrageRecord pairs the two executed legs of one arbitrage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageRecord {
    pub buy_trade: Trade,
    pub sell_trade: Trade,
    /// Realized profit: sell notional minus buy notional. Negative when
    /// slippage ate the spread.
    pub profit: f64,
    /// Spread estimated by the scan that triggered the trade, not the spread
    /// actually executed. See [`ArbitrageRecord::realized_percentage`].
    pub profit_percentage: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ArbitrageRecord {
    /// Builds a record from two legs, computing realized profit.
    pub fn from_legs(buy_trade: Trade, sell_trade: Trade, profit_percentage: f64) -> Self {
        let profit = sell_trade.notional() - buy_trade.notional();
        Self {
            buy_trade,
            sell_trade,
            profit,
            profit_percentage,
            timestamp: Utc::now(),
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    /// Spread between the executed prices of the two legs.
    pub fn realized_percentage(&self) -> f64 {
        (self.sell_trade.price - self.buy_trade.price) / self.buy_trade.price
    }
}
