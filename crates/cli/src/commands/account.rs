//! `twinkle account create`
//!
//! An account alone does not grant access: its email must also be on the
//! allow-list (`twinkle allow-list add`).

use sqlx::PgPool;
use twinkle_admin::{
    db::{AccountRepository, RepositoryError},
    services::{hash_password, validate_password},
};
use twinkle_core::Email;

use crate::error::CliError;

pub async fn create(pool: &PgPool, email: &str, password: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let hash = hash_password(password)?;

    let account = AccountRepository::new(pool)
        .create(&email, &hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CliError::AccountExists(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(id = %account.id, email = %account.email, "Account created");
    Ok(())
}
