//! Database operations for the admin server.
//!
//! ## Tables
//!
//! - `admin_account` - Email + password identities
//! - `settings` - Runtime settings (JSONB), including the allow-list
//!
//! Products are reached through `twinkle_catalog::PgProductStore`, and the
//! session table is owned by `tower-sessions-sqlx-store`.
//!
//! Migrations live in `crates/catalog/migrations/` and run via `twinkle migrate`.

pub mod accounts;
pub mod settings;

use thiserror::Error;

pub use accounts::AccountRepository;
pub use settings::{ADMIN_EMAILS_KEY, AllowListSource, MockAllowListSource, SettingsRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
