//! Simulated trade execution with slippage.

use chrono::Utc;
use rand::rngs::StdRng;

use super::symmetric_uniform;
use crate::domain::{Exchange, Trade, TradeSide};

/// Slippage bound applied when none is configured (0.1%).
pub const DEFAULT_MAX_SLIPPAGE: f64 = 0.001;

/// Fills trade legs at the exchange's current price, shifted by a uniform
/// slippage draw from `[-max_slippage, +max_slippage]`.
pub struct TradeExecutor {
    max_slippage: f64,
    rng: StdRng,
}

impl TradeExecutor {
    pub fn new(max_slippage: f64, rng: StdRng) -> Self {
        Self { max_slippage, rng }
    }

    /// Executes one leg. The exchange is only read.
    pub fn execute_trade(&mut self, exchange: &Exchange, amount: f64, side: TradeSide) -> Trade {
        let slippage = symmetric_uniform(&mut self.rng, self.max_slippage);

        Trade {
            exchange: exchange.name().to_string(),
            side,
            amount,
            price: exchange.current_price() * (1.0 + slippage),
            timestamp: Utc::now(),
        }
    }
}
