//! Product store contract and backends.

mod memory;
mod postgres;

use async_trait::async_trait;
use mockall::automock;
use twinkle_core::{CategoryFilter, NewProduct, Product, ProductId, ProductPatch};

use crate::error::CatalogError;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Reads and writes catalog products.
///
/// Writes are independent statements: concurrent updates to the same product
/// are last-write-wins.
#[automock]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products in the given category (or all), newest first.
    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>, CatalogError>;

    /// `Ok(None)` when no product has this id.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Store a new product and return the id assigned to it.
    async fn create_product(&self, product: NewProduct) -> Result<ProductId, CatalogError>;

    /// Overwrite the fields present in `patch`.
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    async fn update_product(&self, id: &ProductId, patch: ProductPatch)
    -> Result<(), CatalogError>;

    /// Returns [`CatalogError::NotFound`] for an unknown id.
    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), CatalogError>;
}
