//! Arbitrage opportunity domain model.

/// A buy/sell exchange pair whose spread cleared the threshold during a scan.
///
/// Exchanges are referenced by their position in the engine's exchange list
/// and by name, never by reference, so an opportunity stays a plain value
/// after prices move on.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    /// Index of the exchange to buy on.
    pub buy_index: usize,
    /// Index of the exchange to sell on.
    pub sell_index: usize,
    /// Name of the exchange to buy on.
    pub buy_exchange: String,
    /// Name of the exchange to sell on.
    pub sell_exchange: String,
    /// Price observed on the buy exchange at scan time.
    pub buy_price: f64,
    /// Price observed on the sell exchange at scan time.
    pub sell_price: f64,
    /// (sell_price - buy_price) / buy_price.
    pub profit_percentage: f64,
}

impl Opportunity {
    /// Expected profit for `amount` at the scanned prices, before slippage.
    pub fn expected_profit(&self, amount: f64) -> f64 {
        (self.sell_price - self.buy_price) * amount
    }
}
