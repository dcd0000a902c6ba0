//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_PRODUCTS_PER_PAGE` - Catalog page size (default: 12)
//! - `STOREFRONT_TOAST_DURATION_MS` - How long notifications stay up (default: 3000)
//! - `STOREFRONT_SESSION_CAPACITY` - Most sessions (carts) held in memory (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

/// Default number of products per catalog page.
pub const DEFAULT_PRODUCTS_PER_PAGE: usize = 12;

/// Default notification display time in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// Default upper bound on sessions held in memory.
pub const DEFAULT_SESSION_CAPACITY: u64 = 10_000;

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog pagination settings
    pub catalog: CatalogConfig,
    /// Notification display time in milliseconds
    pub toast_duration_ms: u64,
    /// Most sessions kept in memory before eviction
    pub session_capacity: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Catalog display configuration.
#[derive(Debug, Clone, Copy)]
pub struct CatalogConfig {
    /// Products shown per page
    pub products_per_page: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_per_page: DEFAULT_PRODUCTS_PER_PAGE,
        }
    }
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

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;

        let products_per_page = parse_env_or_default::<usize>(
            "STOREFRONT_PRODUCTS_PER_PAGE",
            &DEFAULT_PRODUCTS_PER_PAGE.to_string(),
        )?;
        if products_per_page == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PRODUCTS_PER_PAGE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let toast_duration_ms = parse_env_or_default::<u64>(
            "STOREFRONT_TOAST_DURATION_MS",
            &DEFAULT_TOAST_DURATION_MS.to_string(),
        )?;

        let session_capacity = parse_env_or_default::<u64>(
            "STOREFRONT_SESSION_CAPACITY",
            &DEFAULT_SESSION_CAPACITY.to_string(),
        )?;
        if session_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SESSION_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            catalog: CatalogConfig { products_per_page },
            toast_duration_ms,
            session_capacity,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for local development and tests.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog: CatalogConfig::default(),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            session_capacity: DEFAULT_SESSION_CAPACITY,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
