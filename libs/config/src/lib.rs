//! # Dex Engine Configuration
//!
//! Centralized configuration for the pool engine and the binaries that host
//! it: the default fee schedule for new pools, the first-deposit minimum and
//! log settings.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dex_config::EngineConfig;
//!
//! let config = EngineConfig::load(None)?;
//! let fee = config.fee_schedule()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod engine_config;

pub use engine_config::{EngineConfig, FeeConfig, LiquidityConfig, LoggingConfig, ENV_PREFIX};
