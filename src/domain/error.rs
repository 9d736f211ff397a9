//! Domain error types.

use thiserror::Error;

/// Rejected construction parameters for domain values.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("exchange name must not be empty")]
    EmptyName,
    #[error("exchange {name}: base price must be positive and finite, got {value}")]
    InvalidBasePrice { name: String, value: f64 },
    #[error("exchange {name}: volatility must be in [0, 1), got {value}")]
    InvalidVolatility { name: String, value: f64 },
}
