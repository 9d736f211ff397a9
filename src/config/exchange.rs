//! Simulated exchange configuration.

use serde::Deserialize;

use crate::domain::{DomainError, Exchange};

/// Settings for a single simulated exchange.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeConfig {
    /// Unique exchange name.
    pub name: String,
    /// Price the feed oscillates around.
    pub base_price: f64,
    /// Maximum relative deviation from the base price per tick (e.g. 0.02 for 2%).
    pub volatility: f64,
}

impl ExchangeConfig {
    pub fn new(name: &str, base_price: f64, volatility: f64) -> Self {
        Self {
            name: name.to_string(),
            base_price,
            volatility,
        }
    }

    pub fn build(&self) -> Result<Exchange, DomainError> {
        Exchange::new(self.name.clone(), self.base_price, self.volatility)
    }
}

/// Stock exchanges used when none are configured.
pub(super) fn default_exchanges() -> Vec<ExchangeConfig> {
    vec![
        ExchangeConfig::new("Binance", 50_000.0, 0.02),
        ExchangeConfig::new("Coinbase", 50_100.0, 0.025),
        ExchangeConfig::new("Kraken", 49_900.0, 0.03),
    ]
}
