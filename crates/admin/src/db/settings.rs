//! Runtime settings, stored as JSONB under a text key.
//!
//! The admin allow-list lives under [`ADMIN_EMAILS_KEY`] so it can change
//! without a redeploy.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use twinkle_core::AdminAllowList;

use super::RepositoryError;

pub const ADMIN_EMAILS_KEY: &str = "admin_emails";

/// Somewhere the gate can reload the allow-list from.
#[automock]
#[async_trait]
pub trait AllowListSource: Send + Sync {
    /// `Ok(None)` when no list has been stored.
    async fn load_allow_list(&self) -> Result<Option<AdminAllowList>, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_setting(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn save_allow_list(&self, list: &AdminAllowList) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(list)?;
        self.set_setting(ADMIN_EMAILS_KEY, &value).await?;
        tracing::info!(entries = list.len(), "Admin allow-list saved");
        Ok(())
    }
}

#[async_trait]
impl AllowListSource for SettingsRepository {
    async fn load_allow_list(&self) -> Result<Option<AdminAllowList>, RepositoryError> {
        self.get_setting(ADMIN_EMAILS_KEY)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(RepositoryError::from)
    }
}
