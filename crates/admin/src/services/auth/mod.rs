//! Admin sign-in.
//!
//! Identities are email + argon2 password hashes. Signing in proves who the
//! user is; whether they may manage the catalog is the gate's decision.

mod error;

pub use error::AuthError;

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use twinkle_core::{Email, UserId, UserProfile};

use crate::db::AccountRepository;

const MIN_PASSWORD_LENGTH: usize = 12;

/// Something that can check an email and password.
#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the profile for valid credentials. `role` is left unset.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<UserProfile, AuthError>;
}

/// Accounts in the `admin_account` table.
#[derive(Debug, Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<UserProfile, AuthError> {
        let account = AccountRepository::new(&self.pool)
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;

        Ok(UserProfile {
            uid: account.id,
            email: Some(account.email),
            role: None,
        })
    }
}

/// Fixed accounts held in memory, for tests and local demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityProvider {
    accounts: HashMap<String, (UserId, String)>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn with_account(mut self, email: &Email, password: &str) -> Result<Self, AuthError> {
        let hash = hash_password(password)?;
        self.accounts
            .insert(email.as_str().to_owned(), (UserId::generate(), hash));
        Ok(self)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<UserProfile, AuthError> {
        let (uid, hash) = self
            .accounts
            .get(email.as_str())
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, hash)?;

        Ok(UserProfile {
            uid: uid.clone(),
            email: Some(email.clone()),
            role: None,
        })
    }
}

/// # Errors
///
/// Returns `AuthError::WeakPassword` for passwords shorter than 12 characters.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unreadable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
