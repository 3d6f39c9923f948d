use std::path::PathBuf;

use thiserror::Error;
use twinkle_admin::{db::RepositoryError, services::AuthError};
use twinkle_catalog::CatalogError;
use twinkle_core::EmailError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Admin account already exists with email: {0}")]
    AccountExists(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Seed(#[from] serde_yaml::Error),
}
