//! In-memory product store for tests and local demos.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use twinkle_core::{CategoryFilter, NewProduct, Product, ProductId, ProductPatch};

use super::ProductStore;
use crate::error::CatalogError;

/// Products held in a vector, newest first.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `products` in the given listing order.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>, CatalogError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> Result<ProductId, CatalogError> {
        let id = ProductId::generate();
        let product = Product::from_new(id.clone(), product, Some(Utc::now()));
        self.products.write().await.insert(0, product);
        Ok(id)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(CatalogError::NotFound)?;
        product.apply(patch);
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}
