//! Configuration management for the Beereign console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with BEEREIGN_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{Language, OrderDirection, PageSize, StockFilter};

/// Main console configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// REST API configuration
    pub api: ApiConfig,

    /// List defaults
    pub listing: ListingConfig,

    /// Language for user-facing messages
    pub language: Language,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Bearer token attached to every request
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Rows per page (10, 25 or 50)
    pub page_size: PageSize,

    /// Quiet period before free-text search fires, in milliseconds
    pub debounce_ms: u64,

    pub order: OrderDirection,

    pub stock_filter: StockFilter,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ListingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Ten,
            debounce_ms: 500,
            order: OrderDirection::Asc,
            stock_filter: StockFilter::InStock,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BEEREIGN_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::builder(&environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("api.base_url", "http://localhost:3000/api/v1")?
            .set_default("api.timeout_secs", 15)?
            .set_default("listing.page_size", 10)?
            .set_default("listing.debounce_ms", 500)?
            .set_default("listing.order", "ASC")?
            .set_default("listing.stock_filter", "inStock")?
            .set_default("language", "es")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BEEREIGN_ prefix)
            .add_source(
                Environment::with_prefix("BEEREIGN")
                    .separator("__")
                    .try_parsing(true),
            ))
    }
}
