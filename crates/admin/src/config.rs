//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL (default: `http://localhost:3001`)
//! - `ADMIN_EMAILS` - Comma-separated allow-list used when the settings table has none
//! - `ADMIN_SESSION_TTL_HOURS` - Inactivity timeout for sessions (default: 8)
//! - `ADMIN_MAX_UPLOAD_BYTES` - Largest product form body, image included (default: 10 MiB)
//! - `ADMIN_PURGE_IMAGES_ON_DELETE` - Delete stored images with their product (default: false)
//! - `ADMIN_STATIC_DIR` - Static assets directory (default: crates/admin/static)
//! - `STORAGE_BACKEND` - `local` (default) or `http`
//! - `STORAGE_LOCAL_DIR` - Root for the local backend (default: uploads)
//! - `STORAGE_PUBLIC_URL` - Base URL images are served from (default: `http://localhost:3000/uploads/`)
//! - `STORAGE_ENDPOINT` - Upload endpoint for the `http` backend
//! - `STORAGE_TOKEN` - Bearer token for the `http` backend (validated for strength)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for structured logs

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use twinkle_catalog::env::{
    ConfigError, get_database_url, get_env_or_default, get_flag_env, get_optional_env,
    get_parsed_env, get_required_env, get_validated_secret,
};
use twinkle_core::AdminAllowList;
use url::Url;

const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000/uploads/";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where uploaded product images go.
#[derive(Clone)]
pub enum StorageConfig {
    /// Files on disk, served by the storefront at `/uploads`.
    Local { dir: PathBuf, public_url: Url },
    /// A bucket accepting authenticated `PUT`s.
    Http {
        endpoint: Url,
        public_url: Url,
        token: SecretString,
    },
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { dir, public_url } => f
                .debug_struct("Local")
                .field("dir", dir)
                .field("public_url", &public_url.as_str())
                .finish(),
            Self::Http {
                endpoint,
                public_url,
                ..
            } => f
                .debug_struct("Http")
                .field("endpoint", &endpoint.as_str())
                .field("public_url", &public_url.as_str())
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let public_url = parse_url(
            "STORAGE_PUBLIC_URL",
            &get_env_or_default("STORAGE_PUBLIC_URL", DEFAULT_PUBLIC_URL),
        )?;

        match get_env_or_default("STORAGE_BACKEND", "local").as_str() {
            "local" => Ok(Self::Local {
                dir: PathBuf::from(get_env_or_default("STORAGE_LOCAL_DIR", "uploads")),
                public_url,
            }),
            "http" => Ok(Self::Http {
                endpoint: parse_url("STORAGE_ENDPOINT", &get_required_env("STORAGE_ENDPOINT")?)?,
                public_url,
                token: get_validated_secret("STORAGE_TOKEN")?,
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "STORAGE_BACKEND".to_string(),
                format!("unknown backend '{other}', expected 'local' or 'http'"),
            )),
        }
    }

    /// Directory to serve at `/uploads`, when images are kept on disk.
    #[must_use]
    pub const fn local_dir(&self) -> Option<&PathBuf> {
        match self {
            Self::Local { dir, .. } => Some(dir),
            Self::Http { .. } => None,
        }
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; an https URL marks the session cookie `Secure`
    pub base_url: String,
    /// Allow-list used when the settings table holds none
    pub admin_emails: AdminAllowList,
    pub session_ttl: Duration,
    /// Body limit for the product form, which carries image uploads
    pub max_upload_bytes: usize,
    /// Remove a product's stored images after deleting it
    pub purge_images_on_delete: bool,
    pub static_dir: PathBuf,
    pub storage: StorageConfig,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub json_logs: bool,
}

impl AdminConfig {
    /// Defaults for everything except the database, with local storage.
    #[must_use]
    pub fn with_database_url(database_url: SecretString) -> Self {
        Self {
            database_url,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            admin_emails: AdminAllowList::default(),
            session_ttl: Duration::from_secs(8 * 60 * 60),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            purge_images_on_delete: false,
            static_dir: PathBuf::from("crates/admin/static"),
            storage: StorageConfig::Local {
                dir: PathBuf::from("uploads"),
                public_url: default_public_url(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            json_logs: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does
    /// not parse, or the storage token is weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let defaults = Self::with_database_url(get_database_url("ADMIN_DATABASE_URL")?);
        let ttl_hours: u64 = get_parsed_env("ADMIN_SESSION_TTL_HOURS", 8)?;

        Ok(Self {
            host: get_parsed_env("ADMIN_HOST", defaults.host)?,
            port: get_parsed_env("ADMIN_PORT", defaults.port)?,
            base_url: get_env_or_default("ADMIN_BASE_URL", &defaults.base_url),
            admin_emails: get_optional_env("ADMIN_EMAILS")
                .map(|list| AdminAllowList::parse_list(&list))
                .unwrap_or_default(),
            session_ttl: Duration::from_secs(ttl_hours * 60 * 60),
            max_upload_bytes: get_parsed_env(
                "ADMIN_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
            purge_images_on_delete: get_flag_env("ADMIN_PURGE_IMAGES_ON_DELETE"),
            static_dir: get_optional_env("ADMIN_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            storage: StorageConfig::from_env()?,
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

    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn default_public_url() -> Url {
    Url::parse(DEFAULT_PUBLIC_URL).expect("default public URL is valid")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdminConfig::with_database_url(SecretString::from("postgres://x"));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.session_ttl, Duration::from_secs(28_800));
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert!(!config.is_secure());
        assert!(config.storage.local_dir().is_some());
    }

    #[test]
    fn test_storage_debug_redacts_token() {
        let storage = StorageConfig::Http {
            endpoint: Url::parse("https://bucket.example.net/").unwrap(),
            public_url: Url::parse("https://media.example.net/").unwrap(),
            token: SecretString::from("tk_9f8Qz2LmX4vB7nR1"),
        };
        let output = format!("{storage:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("tk_9f8Qz2LmX4vB7nR1"));
    }
}
