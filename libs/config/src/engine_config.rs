//! Engine Configuration Module
//!
//! Loads [`EngineConfig`] from built-in defaults, an optional TOML file and
//! `DEX_`-prefixed environment variables, in that order of precedence.
//!
//! ```toml
//! [fees]
//! numerator = 1
//! denominator = 10000
//!
//! [liquidity]
//! min_initial_liquidity = 1
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `DEX_FEES__NUMERATOR=30`.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use dex_types::FeeSchedule;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "DEX";

/// Main engine configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Fee schedule applied by `initialize_default`
    pub fees: FeeConfig,

    /// Deposit policy
    pub liquidity: LiquidityConfig,

    /// Log output settings for binaries
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeeConfig {
    pub numerator: u64,
    pub denominator: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LiquidityConfig {
    /// LP shares the first deposit into an empty pool must mint at least
    pub min_initial_liquidity: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            numerator: FeeSchedule::DEFAULT.numerator(),
            denominator: FeeSchedule::DEFAULT.denominator(),
        }
    }
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            min_initial_liquidity: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration with `DEX_` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults = Config::try_from(&EngineConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            info!("Loading engine config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(?config, "Engine configuration loaded");
        Ok(config)
    }

    /// Check every value that the engine would otherwise reject later
    pub fn validate(&self) -> Result<()> {
        self.fee_schedule()?;
        Ok(())
    }

    /// Configured default fee as a validated schedule
    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        FeeSchedule::new(self.fees.numerator, self.fees.denominator)
            .context("Invalid [fees] configuration")
    }
}
