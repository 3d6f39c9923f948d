//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `STOREFRONT_WHATSAPP_NUMBER` - Order line in international format
//! - `STOREFRONT_CURRENCY` - Currency code shown next to prices (default: EGP)
//! - `STOREFRONT_CATALOG_CACHE_TTL_SECS` - How long the fetched product list is reused across requests (default: 0, fetch on every request)
//! - `STOREFRONT_STATIC_DIR` - Static assets directory (default: crates/storefront/static)
//! - `STOREFRONT_UPLOADS_DIR` - Locally stored product images served at `/uploads` (default: uploads)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for structured logs

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use twinkle_catalog::env::{
    ConfigError, get_database_url, get_env_or_default, get_optional_env, get_parsed_env,
};

const DEFAULT_WHATSAPP_NUMBER: &str = "201000000000";

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// WhatsApp number orders are sent to
    pub whatsapp_number: String,
    /// Currency code displayed with prices
    pub currency: String,
    /// Lifetime of the cached full product list; zero disables the cache
    pub catalog_cache_ttl: Duration,
    pub static_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    /// Emit JSON logs instead of human-readable ones
    pub json_logs: bool,
}

impl StorefrontConfig {
    /// Defaults for everything except the database.
    #[must_use]
    pub fn with_database_url(database_url: SecretString) -> Self {
        Self {
            database_url,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            currency: "EGP".to_string(),
            catalog_cache_ttl: Duration::ZERO,
            static_dir: PathBuf::from("crates/storefront/static"),
            uploads_dir: PathBuf::from("uploads"),
            sentry_dsn: None,
            sentry_environment: None,
            json_logs: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let defaults = Self::with_database_url(get_database_url("STOREFRONT_DATABASE_URL")?);

        let cache_secs = get_parsed_env(
            "STOREFRONT_CATALOG_CACHE_TTL_SECS",
            defaults.catalog_cache_ttl.as_secs(),
        )?;

        Ok(Self {
            host: get_parsed_env("STOREFRONT_HOST", defaults.host)?,
            port: get_parsed_env("STOREFRONT_PORT", defaults.port)?,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", &defaults.base_url),
            whatsapp_number: get_env_or_default(
                "STOREFRONT_WHATSAPP_NUMBER",
                DEFAULT_WHATSAPP_NUMBER,
            ),
            currency: get_env_or_default("STOREFRONT_CURRENCY", &defaults.currency),
            catalog_cache_ttl: Duration::from_secs(cache_secs),
            static_dir: get_optional_env("STOREFRONT_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            uploads_dir: get_optional_env("STOREFRONT_UPLOADS_DIR")
                .map_or(defaults.uploads_dir, PathBuf::from),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            json_logs: get_optional_env("LOG_FORMAT").is_some_and(|f| f == "json"),
            database_url: defaults.database_url,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::with_database_url(SecretString::from("postgres://x"));
        assert_eq!(config.socket_addr().port(), 3000);
        assert_eq!(config.currency, "EGP");
        assert!(config.catalog_cache_ttl.is_zero());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = StorefrontConfig::with_database_url(SecretString::from(
            "postgres://twinkle:hunter2@db/twinkle",
        ));
        let output = format!("{config:?}");
        assert!(!output.contains("hunter2"));
    }
}
