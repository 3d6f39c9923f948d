//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while signing in or managing accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Valid credentials, but the email is not on the allow-list.
    #[error("account is not allow-listed")]
    NotAllowListed,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] twinkle_core::EmailError),

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("password hashing failed")]
    PasswordHash,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
