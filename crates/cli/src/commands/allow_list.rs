//! `twinkle allow-list add|remove|show`
//!
//! Edits the list stored in the settings table. When nothing is stored yet,
//! edits start from `ADMIN_EMAILS` so the first change does not drop the
//! addresses the server was already using.

use sqlx::PgPool;
use twinkle_admin::db::{AllowListSource, SettingsRepository};
use twinkle_core::{AdminAllowList, Email};

use crate::error::CliError;

async fn current(settings: &SettingsRepository) -> Result<AdminAllowList, CliError> {
    Ok(match settings.load_allow_list().await? {
        Some(list) => list,
        None => std::env::var("ADMIN_EMAILS")
            .map(|v| AdminAllowList::parse_list(&v))
            .unwrap_or_default(),
    })
}

pub async fn add(pool: &PgPool, email: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let settings = SettingsRepository::new(pool.clone());

    let mut list = current(&settings).await?;
    if list.insert(&email) {
        settings.save_allow_list(&list).await?;
        tracing::info!(email = %email, entries = list.len(), "Added to allow-list");
    } else {
        tracing::info!(email = %email, "Already allow-listed");
    }
    Ok(())
}

pub async fn remove(pool: &PgPool, email: &str) -> Result<(), CliError> {
    let settings = SettingsRepository::new(pool.clone());

    let mut list = current(&settings).await?;
    if list.remove(email) {
        settings.save_allow_list(&list).await?;
        tracing::info!(email, entries = list.len(), "Removed from allow-list");
    } else {
        tracing::warn!(email, "Not on the allow-list");
    }
    if list.is_empty() {
        tracing::warn!("Allow-list is now empty; nobody can sign in");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(pool: &PgPool) -> Result<(), CliError> {
    let settings = SettingsRepository::new(pool.clone());
    let list = current(&settings).await?;

    if list.is_empty() {
        println!("(allow-list is empty)");
    }
    for email in list.iter() {
        println!("{email}");
    }
    Ok(())
}
