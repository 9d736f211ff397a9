//! Simulated exchange state.

use super::DomainError;

/// A simulated exchange quoting a single asset.
///
/// `base_price` and `volatility` are fixed for the lifetime of a run;
/// `current_price` is rewritten by a price source on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    name: String,
    base_price: f64,
    volatility: f64,
    current_price: f64,
}

impl Exchange {
    /// Creates an exchange quoting `base_price` until the first refresh.
    pub fn new(
        name: impl Into<String>,
        base_price: f64,
        volatility: f64,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(DomainError::InvalidBasePrice {
                name,
                value: base_price,
            });
        }
        if !volatility.is_finite() || !(0.0..1.0).contains(&volatility) {
            return Err(DomainError::InvalidVolatility {
                name,
                value: volatility,
            });
        }

        Ok(Self {
            name,
            base_price,
            volatility,
            current_price: base_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Lowest price a refresh can produce.
    pub fn price_floor(&self) -> f64 {
        self.base_price * (1.0 - self.volatility)
    }

    /// Highest price a refresh can produce.
    pub fn price_ceiling(&self) -> f64 {
        self.base_price * (1.0 + self.volatility)
    }

    pub(crate) fn set_current_price(&mut self, price: f64) {
        self.current_price = price;
    }
}
