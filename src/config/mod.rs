//! Configuration loading and validation for the simulator.
//!
//! Uses serde_yaml to load an optional YAML file. Every section has
//! defaults, so an empty file (or no file at all) gives the stock three
//! exchange simulation. A few settings can be overridden from the
//! environment or a `.env` file.

mod app;
mod duration;
mod error;
mod exchange;
mod simulation;
mod storage;

pub use app::AppConfig;
pub use error::ConfigError;
pub use exchange::ExchangeConfig;
pub use simulation::SimulationConfig;
pub use storage::StorageConfig;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::{env, fs};

use crate::domain::Exchange;

/// Config file read when `--config` is not given. Optional.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// Overrides `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "ARB_DATA_DIR";
/// Overrides `app.log_level`.
pub const ENV_LOG_LEVEL: &str = "ARB_LOG_LEVEL";

/// Root configuration structure for the simulator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application-level settings like name and log level.
    pub app: AppConfig,
    /// Loop pacing, threshold and bookkeeping settings.
    pub simulation: SimulationConfig,
    /// Simulated exchanges, in scan order.
    pub exchanges: Vec<ExchangeConfig>,
    /// Where the trade log and statistics are written.
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            simulation: SimulationConfig::default(),
            exchanges: exchange::default_exchanges(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment overrides are applied after parsing, then the result is
    /// validated.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads `path` when given. Otherwise loads the default path if that
    /// file exists, falling back to built-in defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::load(DEFAULT_CONFIG_PATH);
        }

        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses YAML without overrides or validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document parses as null rather than an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = dir;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.app.log_level = Some(level);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        let sim = &self.simulation;
        if !sim.trade_amount.is_finite() || sim.trade_amount <= 0.0 {
            return Err(ConfigError::Validation(
                "simulation.trade_amount must be positive".into(),
            ));
        }
        if !sim.min_profit_threshold.is_finite() || sim.min_profit_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "simulation.min_profit_threshold must be non-negative".into(),
            ));
        }
        if !sim.max_slippage.is_finite() || !(0.0..1.0).contains(&sim.max_slippage) {
            return Err(ConfigError::Validation(
                "simulation.max_slippage must be in [0, 1)".into(),
            ));
        }
        if !sim.start_balance.is_finite() || !sim.asset_balance.is_finite() {
            return Err(ConfigError::Validation(
                "simulation balances must be finite".into(),
            ));
        }

        if self.exchanges.len() < 2 {
            return Err(ConfigError::Validation(
                "at least two exchanges are required".into(),
            ));
        }

        let mut names = HashSet::new();
        for exchange in &self.exchanges {
            if !names.insert(exchange.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "exchange {}: duplicate name",
                    exchange.name
                )));
            }
            exchange.build()?;
        }

        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.data_dir must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Builds the simulated exchanges in configured order.
    pub fn build_exchanges(&self) -> Result<Vec<Exchange>, ConfigError> {
        self.exchanges
            .iter()
            .map(|ex| ex.build().map_err(ConfigError::from))
            .collect()
    }
}
