//! Configuration management.
//!
//! Settings load from an optional `config.toml` plus `FAREWATCH`-prefixed
//! environment variables (`FAREWATCH_UPSTREAM__BASE_URL`,
//! `FAREWATCH_UPSTREAM__TIMEOUT_SECONDS`, `FAREWATCH_LOGGING__LEVEL`),
//! with environment taking precedence.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Root configuration for the price checker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarewatchConfig {
    /// Reservation gateway settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the gateway fronting the reservation, ticket and price
/// services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Gateway base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FarewatchConfig {
    /// Load configuration from the default file location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the given file, falling back to
    /// `config.toml` in the working directory.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("FAREWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: FarewatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.base_url.is_empty() {
            bail!("upstream base URL cannot be empty");
        }
        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            bail!(
                "upstream base URL must start with http:// or https://, got {:?}",
                self.upstream.base_url
            );
        }
        if self.upstream.timeout_seconds == 0 || self.upstream.timeout_seconds > 300 {
            bail!("upstream timeout must be between 1 and 300 seconds");
        }
        Ok(())
    }
}
