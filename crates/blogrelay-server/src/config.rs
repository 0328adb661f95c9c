//! Environment-sourced server configuration.
//!
//! Defaults are set on the builder; environment variables with the
//! `BLOGRELAY` prefix override them (12-factor). Nested keys use `__`,
//! e.g. `BLOGRELAY_HTTP__PORT=8080` or `BLOGRELAY_BLOGGER__API_KEY=...`.

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use blogrelay_client::{BloggerClientConfig, DEFAULT_BASE_URL};

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The environment could not be parsed into a valid configuration
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Newline-delimited JSON over stdin/stdout
    Stdio,
    /// JSON over HTTP POST
    Http,
}

impl std::fmt::Display for ServerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Http => f.write_str("http"),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Active transport
    pub mode: ServerMode,
    /// HTTP transport settings (used when `mode = http`)
    pub http: HttpConfig,
    /// Dashboard channel settings
    pub dashboard: DashboardConfig,
    /// Upstream content service settings
    pub blogger: BloggerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// HTTP transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Dashboard channel settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Bind port for the snapshot/push listener
    pub port: u16,
}

/// Upstream content service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BloggerConfig {
    /// Pre-shared API key forwarded on every upstream call
    pub api_key: String,
    /// Upstream base URL
    pub base_url: String,
    /// Default page size for list operations
    pub max_results: u32,
    /// Upstream request timeout, seconds
    pub timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset
    pub level: String,
}

impl RelayConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Load`] when a variable cannot be parsed into its
    /// typed field (e.g. a non-numeric port or an unknown mode).
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("mode", "stdio")?
            .set_default("http.host", "0.0.0.0")?
            .set_default("http.port", 3000)?
            .set_default("dashboard.port", 3001)?
            .set_default("blogger.api_key", "")?
            .set_default("blogger.base_url", DEFAULT_BASE_URL)?
            .set_default("blogger.max_results", 10)?
            .set_default("blogger.timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .add_source(
                Environment::with_prefix("BLOGRELAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Upstream client settings derived from this configuration.
    #[must_use]
    pub fn client_config(&self) -> BloggerClientConfig {
        BloggerClientConfig {
            api_key: self.blogger.api_key.clone(),
            base_url: self.blogger.base_url.clone(),
            default_max_results: self.blogger.max_results,
            timeout: Duration::from_secs(self.blogger.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_describe_a_runnable_stdio_server() {
        let config = RelayConfig::from_env().unwrap();
        assert_eq!(config.mode, ServerMode::Stdio);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.dashboard.port, 3001);
        assert_eq!(config.blogger.max_results, 10);
        assert_eq!(config.blogger.timeout_secs, 30);
        assert_eq!(config.blogger.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn client_config_carries_timeout_and_page_size() {
        let config = RelayConfig::from_env().unwrap();
        let client = config.client_config();
        assert_eq!(client.default_max_results, 10);
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn mode_displays_its_wire_name() {
        assert_eq!(ServerMode::Stdio.to_string(), "stdio");
        assert_eq!(ServerMode::Http.to_string(), "http");
    }
}
