//! Web front end configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `LAUNDRY_API_URL` - Laundry backend origin (default: <http://127.0.0.1:8000>)
//! - `LAUNDRY_API_TIMEOUT_SECS` - Backend request timeout (default: none)
//! - `LAUNDRY_WEB_HOST` - Bind address (default: 127.0.0.1)
//! - `LAUNDRY_WEB_PORT` - Listen port (default: 3000)
//! - `LAUNDRY_WEB_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web front end configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this front end
    pub base_url: String,
    /// Laundry backend connection settings
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Laundry backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend origin every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout; `None` leaves the transport default
    pub timeout: Option<Duration>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LAUNDRY_WEB_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAUNDRY_WEB_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("LAUNDRY_WEB_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAUNDRY_WEB_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("LAUNDRY_WEB_BASE_URL", DEFAULT_BASE_URL);

        let api = ApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Load the backend settings alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LAUNDRY_API_URL` or
    /// `LAUNDRY_API_TIMEOUT_SECS` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("LAUNDRY_API_URL", DEFAULT_API_URL);
        let base_url = parse_api_url(&raw)
            .map_err(|reason| ConfigError::InvalidEnvVar("LAUNDRY_API_URL".to_string(), reason))?;

        let timeout = match get_optional_env("LAUNDRY_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "LAUNDRY_API_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self { base_url, timeout })
    }

    /// Settings for an explicit backend URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `raw` is not an http(s) URL.
    pub fn from_url(raw: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let base_url = parse_api_url(raw)
            .map_err(|reason| ConfigError::InvalidEnvVar("LAUNDRY_API_URL".to_string(), reason))?;
        Ok(Self { base_url, timeout })
    }

    /// Backend origin as it appears in a CSP source list.
    #[must_use]
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and check the backend origin.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}

/// Parse a Sentry sample rate, defaulting when unset.
fn parse_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
