//! Application configuration module
//!
//! This module provides type-safe configuration loading using the `config`
//! and `dotenvy` crates. Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults (serde defaults on every section)
//! 2. An optional file `config/{APP_ENV}` (any format `config` detects)
//! 3. Environment variables with the `WELLBEING` prefix, nested values
//!    separated by double underscores
//!
//! # Example
//!
//! ```no_run
//! use wellbeing_survey::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod broker;
mod error;
mod insights;
mod questionnaire;
mod server;

pub use ai::AiConfig;
pub use broker::BrokerConfig;
pub use error::{ConfigError, ValidationError};
pub use insights::InsightsConfig;
pub use questionnaire::QuestionnaireConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WELLBEING";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener, log filter and CORS
    #[serde(default)]
    pub server: ServerConfig,

    /// Question source and dimension ranks
    #[serde(default)]
    pub questionnaire: QuestionnaireConfig,

    /// Insight broker queue sizes
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Insight job pool and retries
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Text generation provider
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from the optional file and the environment
    ///
    /// # Environment Variable Format
    ///
    /// - `WELLBEING__SERVER__BIND=127.0.0.1:3000` -> `server.bind = "127.0.0.1:3000"`
    /// - `WELLBEING__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value cannot be
    /// parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.questionnaire.validate()?;
        self.broker.validate()?;
        self.insights.validate()?;
        self.ai.validate(self.is_production())?;
        Ok(())
    }

    /// True when running in production mode
    pub fn is_production(&self) -> bool {
        self.server.production
    }
}

/// Splits a comma-separated list, dropping blanks.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
