//! Simulated market: price generation, trade execution and spread scanning.

mod executor;
mod price;
mod scanner;

pub use executor::{DEFAULT_MAX_SLIPPAGE, TradeExecutor};
pub use price::{PriceSource, UniformPriceSource};
pub use scanner::{OpportunityScanner, select_best};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates the simulation RNG, reproducible when a seed is given.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws uniformly from `[-bound, +bound]`. A zero bound draws nothing.
fn symmetric_uniform<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if bound <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}
