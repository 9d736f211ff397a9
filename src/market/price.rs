//! Simulated price feeds.

use rand::rngs::StdRng;

use super::symmetric_uniform;
use crate::domain::Exchange;

/// PriceSource produces a new current price for an exchange on every tick.
pub trait PriceSource: Send {
    /// Refreshes `exchange.current_price` and returns the new price.
    fn update_price(&mut self, exchange: &mut Exchange) -> f64;
}

/// Perturbs the base price by a uniform draw from `[-volatility, +volatility]`.
///
/// Prices do not walk: every tick starts again from the base price, so the
/// result always lies in `[base * (1 - v), base * (1 + v)]`.
pub struct UniformPriceSource {
    rng: StdRng,
}

impl UniformPriceSource {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl PriceSource for UniformPriceSource {
    fn update_price(&mut self, exchange: &mut Exchange) -> f64 {
        let change = symmetric_uniform(&mut self.rng, exchange.volatility());
        let price = exchange.base_price() * (1.0 + change);
        exchange.set_current_price(price);
        price
    }
}
