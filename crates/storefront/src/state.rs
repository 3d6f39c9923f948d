//! Application state shared across handlers.

use std::sync::Arc;

use twinkle_catalog::ProductStore;
use twinkle_core::WhatsAppCheckout;

use crate::catalog_cache::CatalogCache;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: Arc<dyn ProductStore>,
    catalog: CatalogCache,
    checkout: WhatsAppCheckout,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, products: Arc<dyn ProductStore>) -> Self {
        let catalog = CatalogCache::new(config.catalog_cache_ttl);
        let checkout = WhatsAppCheckout::new(&config.whatsapp_number, config.currency.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                catalog,
                checkout,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    #[must_use]
    pub fn checkout(&self) -> &WhatsAppCheckout {
        &self.inner.checkout
    }
}
