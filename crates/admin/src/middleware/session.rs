//! Session configuration for admin.
//!
//! Cookies are `HttpOnly`, `SameSite=Strict`, and `Secure` whenever the base
//! URL is https. Sessions expire after a period of inactivity.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, cookie::SameSite};

use crate::config::AdminConfig;

pub const SESSION_COOKIE_NAME: &str = "twinkle_admin_session";

/// Wrap `store` in the admin session layer.
///
/// The binary passes a `PostgresStore`; tests use the in-memory store.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    let ttl_secs = i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(ttl_secs),
        ))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
