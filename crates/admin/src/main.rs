//! Twinkle Admin - catalog dashboard on port 3001.
//!
//! # Security
//!
//! Only accounts whose email is on the admin allow-list can sign in. Bind to
//! a private interface; the default host is `127.0.0.1`.
//!
//! # Architecture
//!
//! - Axum with Askama templates
//! - Products written through `twinkle-catalog` (`PostgreSQL`)
//! - Images uploaded to local disk or an HTTP bucket
//! - Sessions kept in `PostgreSQL` via `tower-sessions`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::error::Error;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};
use twinkle_admin::{
    AdminConfig, AppState, Services, app,
    config::StorageConfig,
    db::SettingsRepository,
    middleware::create_session_layer,
    services::{AuthGate, PgIdentityProvider, spawn_audit_log},
};
use twinkle_catalog::{HttpObjectStore, LocalObjectStore, ObjectStore, PgProductStore, db};

fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "twinkle_admin=info,twinkle_catalog=info,tower_http=info".into());

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn object_store(storage: &StorageConfig) -> Arc<dyn ObjectStore> {
    match storage {
        StorageConfig::Local { dir, public_url } => {
            tracing::info!(dir = %dir.display(), "Storing images on local disk");
            Arc::new(LocalObjectStore::new(dir.clone(), public_url.clone()))
        }
        StorageConfig::Http {
            endpoint,
            public_url,
            token,
        } => {
            tracing::info!(endpoint = %endpoint, "Storing images in remote bucket");
            Arc::new(HttpObjectStore::new(
                endpoint.clone(),
                public_url.clone(),
                token.clone(),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AdminConfig::from_env()?;

    let _sentry_guard = init_sentry(&config);
    init_tracing(config.json_logs);

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    let settings = Arc::new(SettingsRepository::new(pool.clone()));
    let gate = AuthGate::load(settings.as_ref(), &config.admin_emails).await;
    let audit = spawn_audit_log(&gate);

    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;
    let session_layer = create_session_layer(session_store, &config);

    let state = AppState::new(
        config.clone(),
        Services {
            products: Arc::new(PgProductStore::new(pool.clone())),
            media: object_store(&config.storage),
            identity: Arc::new(PgIdentityProvider::new(pool)),
            allow_lists: settings,
            gate,
        },
    );

    let router = app(state, session_layer)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("admin listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    audit.abort();
    served?;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
