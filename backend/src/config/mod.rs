//! Configuration management for the wellness backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: WELLNESS__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub source: SourceConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Step tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackerConfig {
    /// Period of the simulated step increment
    #[validate(range(min = 1))]
    pub tick_period_ms: u64,
    /// Smallest increment per tick (inclusive)
    pub min_increment: u32,
    /// Largest increment per tick (inclusive)
    #[validate(range(min = 1))]
    pub max_increment: u32,
    /// Lower bound for seeded past days (inclusive)
    pub seed_min_steps: u32,
    /// Upper bound for seeded past days (exclusive)
    #[validate(range(min = 1))]
    pub seed_max_steps: u32,
    /// Cadence the dashboard is told to poll at
    #[validate(range(min = 1))]
    pub poll_interval_secs: u64,
    /// Fixed RNG seed for reproducible simulations
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 3000,
            min_increment: 5,
            max_increment: 20,
            seed_min_steps: 3000,
            seed_max_steps: 12000,
            poll_interval_secs: 5,
            rng_seed: None,
        }
    }
}

impl TrackerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Check the cross-field ranges the derive cannot express
    pub fn check_ranges(&self) -> Result<()> {
        if self.min_increment > self.max_increment {
            anyhow::bail!(
                "tracker.min_increment ({}) must not exceed tracker.max_increment ({})",
                self.min_increment,
                self.max_increment
            );
        }
        if self.seed_min_steps >= self.seed_max_steps {
            anyhow::bail!(
                "tracker.seed_min_steps ({}) must be below tracker.seed_max_steps ({})",
                self.seed_min_steps,
                self.seed_max_steps
            );
        }
        Ok(())
    }
}

/// Which step data source backs the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Simulated,
    Device,
}

/// Step data source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Base URL of the device capability bridge
    #[validate(url)]
    pub device_url: String,
    #[validate(range(min = 1, max = 120))]
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Simulated,
            device_url: "http://127.0.0.1:9400".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            tracker: TrackerConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with WELLNESS__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(
                config::File::with_name(&config_file)
                    .required(false)
            )
            // Override with environment variables (WELLNESS__ prefix)
            // e.g., WELLNESS__TRACKER__TICK_PERIOD_MS=1000 sets tracker.tick_period_ms
            .add_source(
                config::Environment::with_prefix("WELLNESS")
                    .separator("__")
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate_all()?;
        Ok(config)
    }

    /// Run field validation and cross-field range checks
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;
        self.tracker.check_ranges()
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
