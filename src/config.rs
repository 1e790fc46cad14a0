//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines the
//! constants for response text, HTTP cache headers, metadata endpoint defaults,
//! logging and shutdown. `AppConfig` is the root configuration struct; every
//! section and field falls back to a built-in default.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Response Text
// =============================================================================

/// Prefix of the `/hello` response; the availability zone follows directly
pub const GREETING_PREFIX: &str = "Hello! My backend AZ is ";

/// Body returned by the `/ping` health check
pub const HEALTH_RESPONSE: &str = "ok";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Both routes report live state, so nothing may be stored by upstream caches
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Metadata Endpoint
// =============================================================================

/// Link-local address of the instance metadata service
pub const METADATA_HOST: &str = "169.254.169.254";

/// Path of the placement availability-zone document
pub const METADATA_AZ_PATH: &str = "/latest/meta-data/placement/availability-zone/";

pub const DEFAULT_METADATA_URL: &str = formatcp!("http://{}{}", METADATA_HOST, METADATA_AZ_PATH);

/// Connect timeout for the metadata request (milliseconds)
pub const DEFAULT_METADATA_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Total timeout for the metadata request (milliseconds)
pub const DEFAULT_METADATA_TIMEOUT_MS: u64 = 2000;

/// User-Agent sent with the metadata request
pub const METADATA_USER_AGENT: &str =
    formatcp!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

// =============================================================================
// Server, Logging and Shutdown
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "az_greeter=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Metadata endpoint used by `/hello`
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Absolute URL of the availability-zone document
    #[serde(default = "MetadataConfig::default_url")]
    pub url: String,
    #[serde(default = "MetadataConfig::default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Upper bound for the whole request, including reading the body
    #[serde(default = "MetadataConfig::default_timeout")]
    pub timeout_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            connect_timeout_ms: Self::default_connect_timeout(),
            timeout_ms: Self::default_timeout(),
        }
    }
}

impl MetadataConfig {
    fn default_url() -> String {
        DEFAULT_METADATA_URL.to_string()
    }

    fn default_connect_timeout() -> u64 {
        DEFAULT_METADATA_CONNECT_TIMEOUT_MS
    }

    fn default_timeout() -> u64 {
        DEFAULT_METADATA_TIMEOUT_MS
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.metadata.url).map_err(|e| {
            ConfigError::Validation(format!("metadata.url '{}' is invalid: {}", self.metadata.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "metadata.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.metadata.connect_timeout_ms == 0 || self.metadata.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "metadata timeouts must be greater than zero".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
