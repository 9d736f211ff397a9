//! Domain models for the arbitrage simulation.

mod error;
mod exchange;
mod opportunity;
mod record;
mod stats;
mod timestamp;
mod trade;

pub use error::DomainError;
pub use exchange::Exchange;
pub use opportunity::Opportunity;
pub use record::ArbitrageRecord;
pub use stats::{DailyProfit, RunningStats};
pub use trade::{Trade, TradeSide};
