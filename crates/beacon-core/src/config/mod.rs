//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `BEACON_CONFIG` env var
//! 3. **Environment variables**: `BEACON_*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`ProviderEntry`]: Lookup provider definitions with URL templates and
//!   per-minute request caps
//! - [`TransportConfig`]: Outbound HTTP client settings (timeouts, pooling)
//! - [`LoggingConfig`]: Log level and format
//!
//! # Validation
//!
//! Configuration is validated at load time. Invalid configurations (e.g., a
//! URL template without a key placeholder, a zero request cap) return errors
//! rather than failing silently at dispatch time.
//!
//! # Example
//!
//! ```toml
//! environment = "production"
//!
//! [[providers]]
//! name = "ip-api"
//! url_template = "http://ip-api.com/json/{key}"
//! max_requests_per_minute = 45
//!
//! [transport]
//! request_timeout_seconds = 10
//! ```

use crate::types::{ProviderConfig, KEY_PLACEHOLDER};
use crate::upstream::HttpTransportConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, sync::Arc, time::Duration};

/// Configuration for a single lookup provider.
///
/// Defines where requests for this provider go and how many it may receive
/// per minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Human-readable identifier for this provider (e.g., "ip-api").
    pub name: String,

    /// URL template containing exactly one `{key}` placeholder, which is
    /// replaced with the request key at dispatch time. Must start with
    /// `http`.
    pub url_template: String,

    /// Maximum requests this provider accepts per rolling minute. Must be
    /// greater than 0. Defaults to `60`.
    #[serde(default = "default_max_requests_per_minute")]
    pub max_requests_per_minute: u32,
}

fn default_max_requests_per_minute() -> u32 {
    60
}

/// Outbound HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Timeout for establishing a connection, in seconds. Must be greater
    /// than 0. Defaults to `5`.
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// End-to-end request timeout in seconds, response body included. Must
    /// be greater than 0. Defaults to `10`.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// How long idle pooled connections are kept alive, in seconds.
    /// Defaults to `30`.
    #[serde(default = "default_pool_idle_timeout_seconds")]
    pub pool_idle_timeout_seconds: u64,

    /// Maximum idle pooled connections per host. Defaults to `32`.
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

fn default_connect_timeout_seconds() -> u64 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_pool_idle_timeout_seconds() -> u64 {
    30
}

fn default_pool_max_idle_per_host() -> usize {
    32
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root application configuration containing all subsystem settings.
///
/// This is the primary configuration structure loaded from TOML files and
/// environment variables. Configuration is loaded with the `BEACON_` prefix
/// for environment overrides using `__` as a separator.
///
/// # Example
///
/// ```toml
/// environment = "production"
///
/// [[providers]]
/// name = "ip-api"
/// url_template = "http://ip-api.com/json/{key}"
/// max_requests_per_minute = 45
///
/// [[providers]]
/// name = "ipwhois"
/// url_template = "https://ipwho.is/{key}"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (e.g., "development", "production"). Defaults to `"development"`.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Lookup provider configuration. Cannot be empty.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderEntry>,

    /// Outbound HTTP transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_providers() -> Vec<ProviderEntry> {
    vec![
        ProviderEntry {
            name: "ip-api".to_string(),
            url_template: "http://ip-api.com/json/{key}".to_string(),
            max_requests_per_minute: 45,
        },
        ProviderEntry {
            name: "ipwhois".to_string(),
            url_template: "https://ipwho.is/{key}".to_string(),
            max_requests_per_minute: 60,
        },
    ]
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 5,
            request_timeout_seconds: 10,
            pool_idle_timeout_seconds: 30,
            pool_max_idle_per_host: 32,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            providers: default_providers(),
            transport: TransportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Environment variables with the `BEACON__` prefix can override any configuration value.
    /// Use `__` as a separator for nested fields (e.g., `BEACON__LOGGING__LEVEL=debug`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("transport.connect_timeout_seconds", 5)?
            .set_default("transport.request_timeout_seconds", 10)?
            .set_default("transport.pool_idle_timeout_seconds", 30)?
            .set_default("transport.pool_max_idle_per_host", 32)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("BEACON").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `BEACON_CONFIG` environment variable.
    /// Environment variable overrides are supported via the `BEACON_` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("BEACON_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Converts provider entries to the [`ProviderConfig`] format consumed by
    /// the broker.
    #[must_use]
    pub fn to_provider_configs(&self) -> Vec<ProviderConfig> {
        self.providers
            .iter()
            .map(|p| ProviderConfig {
                name: Arc::from(p.name.as_str()),
                url_template: p.url_template.clone(),
                max_requests_per_minute: p.max_requests_per_minute,
            })
            .collect()
    }

    /// Converts transport settings to the [`HttpTransportConfig`] consumed by
    /// the HTTP transport.
    #[must_use]
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            connect_timeout: self.connect_timeout(),
            request_timeout: self.request_timeout(),
            pool_idle_timeout: Duration::from_secs(self.transport.pool_idle_timeout_seconds),
            pool_max_idle_per_host: self.transport.pool_max_idle_per_host,
        }
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.transport.request_timeout_seconds)
    }

    /// Returns the connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.transport.connect_timeout_seconds)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// Checks include:
    /// - At least one provider is configured, with unique names
    /// - Every URL template starts with `http` and contains exactly one
    ///   `{key}` placeholder
    /// - All numeric values are greater than zero where required
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.providers.is_empty() {
            return Err("No lookup providers configured".to_string());
        }

        let mut seen_names = HashSet::new();
        for provider in &self.providers {
            if !seen_names.insert(provider.name.as_str()) {
                return Err(format!("Duplicate provider name: {}", provider.name));
            }
            if provider.url_template.is_empty() {
                return Err(format!("Empty URL template for provider: {}", provider.name));
            }
            if !provider.url_template.starts_with("http") {
                return Err(format!(
                    "Invalid URL template for provider {}: {}",
                    provider.name, provider.url_template
                ));
            }
            let placeholder_count = provider.url_template.matches(KEY_PLACEHOLDER).count();
            if placeholder_count != 1 {
                return Err(format!(
                    "URL template for provider {} must contain the {} placeholder exactly once (found {})",
                    provider.name, KEY_PLACEHOLDER, placeholder_count
                ));
            }
            if provider.max_requests_per_minute == 0 {
                return Err(format!(
                    "max_requests_per_minute must be greater than 0 for provider: {}",
                    provider.name
                ));
            }
        }

        if self.transport.connect_timeout_seconds == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.transport.request_timeout_seconds == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }
}
