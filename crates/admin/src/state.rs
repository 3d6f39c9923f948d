//! Application state shared across handlers.

use std::sync::Arc;

use twinkle_catalog::{ObjectStore, ProductStore};

use crate::config::AdminConfig;
use crate::db::AllowListSource;
use crate::services::{AuthGate, IdentityProvider};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Every collaborator is a trait object so the
/// router can run against in-memory backends.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    products: Arc<dyn ProductStore>,
    media: Arc<dyn ObjectStore>,
    identity: Arc<dyn IdentityProvider>,
    allow_lists: Arc<dyn AllowListSource>,
    gate: AuthGate,
}

/// Collaborators for [`AppState::new`].
pub struct Services {
    pub products: Arc<dyn ProductStore>,
    pub media: Arc<dyn ObjectStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub allow_lists: Arc<dyn AllowListSource>,
    pub gate: AuthGate,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, services: Services) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products: services.products,
                media: services.media,
                identity: services.identity,
                allow_lists: services.allow_lists,
                gate: services.gate,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    #[must_use]
    pub fn media(&self) -> &dyn ObjectStore {
        self.inner.media.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    #[must_use]
    pub fn allow_lists(&self) -> &dyn AllowListSource {
        self.inner.allow_lists.as_ref()
    }

    #[must_use]
    pub fn gate(&self) -> &AuthGate {
        &self.inner.gate
    }
}
