//! Executed trade legs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp;

/// Direction of a trade leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// Trade is a single executed leg. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Name of the exchange the leg was executed on.
    pub exchange: String,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub side: TradeSide,
    /// Quantity of the asset traded.
    pub amount: f64,
    /// Execution price after slippage.
    pub price: f64,
    /// When the leg was executed.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Quote-currency value of the leg.
    pub fn notional(&self) -> f64 {
        self.price * self.amount
    }
}
