//! Cached full product list.
//!
//! The shop and home pages fetch the whole catalog once per request and
//! filter it in memory. With a non-zero TTL the list is also reused across
//! requests, at the cost of showing admin changes only once the entry
//! expires. A zero TTL disables that reuse.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use twinkle_catalog::{CatalogError, ProductStore};
use twinkle_core::{CategoryFilter, Product};

const FULL_LIST_KEY: &str = "products:all";

#[derive(Clone)]
pub struct CatalogCache {
    cache: Option<Cache<&'static str, Arc<Vec<Product>>>>,
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = (!ttl.is_zero())
            .then(|| Cache::builder().max_capacity(1).time_to_live(ttl).build());
        Self { cache }
    }

    /// The full product list, fetched from `store` on a miss.
    ///
    /// Failures are not cached.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the list has to be fetched and cannot be.
    pub async fn full_list(
        &self,
        store: &dyn ProductStore,
    ) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(cache) = &self.cache
            && let Some(products) = cache.get(FULL_LIST_KEY).await
        {
            return Ok(products);
        }

        let products = Arc::new(store.list_products(CategoryFilter::All).await?);
        tracing::debug!(count = products.len(), "Fetched full product list");
        if let Some(cache) = &self.cache {
            cache.insert(FULL_LIST_KEY, Arc::clone(&products)).await;
        }
        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use twinkle_catalog::MockProductStore;

    use super::*;

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let mut store = MockProductStore::new();
        store
            .expect_list_products()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let cache = CatalogCache::new(Duration::from_secs(60));
        cache.full_list(&store).await.unwrap();
        cache.full_list(&store).await.unwrap();
    }

    #[tokio::test]
    async fn zero_ttl_fetches_every_time() {
        let mut store = MockProductStore::new();
        store
            .expect_list_products()
            .times(2)
            .returning(|_| Ok(Vec::new()));

        let cache = CatalogCache::new(Duration::ZERO);
        cache.full_list(&store).await.unwrap();
        cache.full_list(&store).await.unwrap();
    }

    #[tokio::test]
    async fn failures_are_retried() {
        let mut store = MockProductStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_list_products()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Err(CatalogError::Unavailable("timeout".into())));
        store
            .expect_list_products()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Ok(Vec::new()));

        let cache = CatalogCache::new(Duration::from_secs(60));
        assert!(cache.full_list(&store).await.is_err());
        assert!(cache.full_list(&store).await.is_ok());
    }
}
