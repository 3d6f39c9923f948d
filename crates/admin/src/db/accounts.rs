//! Admin account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use twinkle_core::{Email, UserId};

use super::RepositoryError;
use crate::models::AdminAccount;

#[derive(Debug, sqlx::FromRow)]
struct AdminAccountRow {
    id: UserId,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminAccountRow> for AdminAccount {
    type Error = RepositoryError;

    fn try_from(row: AdminAccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// Repository for `admin_account` rows.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAccountRow>(
            "SELECT id, email, password_hash, created_at FROM admin_account WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminAccount::try_from).transpose()
    }

    /// Insert an account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAccountRow>(
            r"
            INSERT INTO admin_account (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            ",
        )
        .bind(UserId::generate())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("account {email} already exists"))
            }
            other => RepositoryError::Database(other),
        })?;

        tracing::info!(email = %email, "Admin account created");
        AdminAccount::try_from(row)
    }
}
