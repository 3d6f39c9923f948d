//! `twinkle migrate`
//!
//! Migrations live in `crates/catalog/migrations/` and cover the product,
//! admin account and settings tables. Session tables are created by the
//! admin binary's session store.

use sqlx::PgPool;

use crate::error::CliError;

pub async fn run(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Running migrations...");
    twinkle_catalog::db::MIGRATOR.run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}
