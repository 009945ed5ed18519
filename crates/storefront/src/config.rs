//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORE_API_URL` - Base URL of the product/stock API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3333)
//! - `STORE_API_TOKEN` - Bearer token sent to the store API
//! - `CATALOG_CACHE_TTL_SECS` - Product cache TTL in seconds (default: 300)
//! - `CART_STORAGE_DIR` - Directory for the persisted cart (default: .rocketshoes)
//! - `CART_STORAGE_KEY` - Slot key for the persisted cart (default: @RocketShoes:cart)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default slot key for the persisted cart.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Store API configuration
    pub api: StoreApiConfig,
    /// Cart persistence configuration
    pub storage: CartStorageConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Store API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct StoreApiConfig {
    /// Base URL, always ending in `/` so endpoints join beneath it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Product cache time-to-live
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for StoreApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Where the cart is persisted.
#[derive(Debug, Clone)]
pub struct CartStorageConfig {
    /// Directory of the file-backed store
    pub dir: PathBuf,
    /// Slot key
    pub key: String,
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment name reported with events
    pub environment: Option<String>,
    /// Fraction of errors sent
    pub sample_rate: f32,
    /// Fraction of transactions traced
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3333")?;

        Ok(Self {
            host,
            port,
            api: StoreApiConfig::from_env()?,
            storage: CartStorageConfig::from_env(),
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("STORE_API_URL", &get_required_env("STORE_API_URL")?)?;
        let ttl_secs: u64 = parse_env("CATALOG_CACHE_TTL_SECS", "300")?;

        Ok(Self {
            base_url,
            token: get_optional_env("STORE_API_TOKEN").map(SecretString::from),
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl CartStorageConfig {
    fn from_env() -> Self {
        Self {
            dir: PathBuf::from(get_env_or_default("CART_STORAGE_DIR", ".rocketshoes")),
            key: get_env_or_default("CART_STORAGE_KEY", DEFAULT_CART_KEY),
        }
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an HTTP(S) base URL and make sure its path ends in `/`.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
