//! `PostgreSQL` product store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use twinkle_core::{
    Category, CategoryFilter, NewProduct, Price, Product, ProductId, ProductPatch, SubCategory,
};

use super::ProductStore;
use crate::error::CatalogError;

const PRODUCT_COLUMNS: &str = "id, title, category, sub_category, price, description, images, \
                               video_url, stock, is_featured, created_at";

/// Product store backed by the `product` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    category: String,
    sub_category: String,
    price: Decimal,
    description: String,
    images: Vec<String>,
    video_url: Option<String>,
    stock: i32,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row
            .category
            .parse()
            .map_err(|e| CatalogError::DataCorruption(format!("product {}: {e}", row.id)))?;
        let sub_category: SubCategory = row
            .sub_category
            .parse()
            .map_err(|e| CatalogError::DataCorruption(format!("product {}: {e}", row.id)))?;
        let price = Price::new(row.price)
            .map_err(|e| CatalogError::DataCorruption(format!("product {}: {e}", row.id)))?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            CatalogError::DataCorruption(format!("product {}: negative stock", row.id))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            category,
            sub_category,
            price,
            description: row.description,
            images: row.images,
            video_url: row.video_url,
            stock,
            is_featured: row.is_featured,
            created_at: Some(row.created_at),
        })
    }
}

fn stock_column(stock: u32) -> Result<i32, CatalogError> {
    i32::try_from(stock).map_err(|_| CatalogError::Invalid(format!("stock {stock} is too large")))
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>, CatalogError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE ($1::text IS NULL OR category = $1) \
             ORDER BY created_at DESC, id"
        ))
        .bind(filter.category())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    async fn create_product(&self, product: NewProduct) -> Result<ProductId, CatalogError> {
        let stock = stock_column(product.stock)?;

        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO product
                (id, title, category, sub_category, price, description, images,
                 video_url, stock, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            ",
        )
        .bind(ProductId::generate())
        .bind(&product.title)
        .bind(product.category)
        .bind(product.sub_category)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.images)
        .bind(&product.video_url)
        .bind(stock)
        .bind(product.is_featured)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(product_id = %id, title = %product.title, "Created product");
        Ok(id)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<(), CatalogError> {
        let stock = patch.stock.map(stock_column).transpose()?;
        let (set_video, video_url) = match patch.video_url {
            Some(url) => (true, url),
            None => (false, None),
        };

        let result = sqlx::query(
            r"
            UPDATE product SET
                title        = COALESCE($2, title),
                category     = COALESCE($3, category),
                sub_category = COALESCE($4, sub_category),
                price        = COALESCE($5, price),
                description  = COALESCE($6, description),
                images       = COALESCE($7, images),
                video_url    = CASE WHEN $8 THEN $9 ELSE video_url END,
                stock        = COALESCE($10, stock),
                is_featured  = COALESCE($11, is_featured),
                updated_at   = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.category)
        .bind(patch.sub_category)
        .bind(patch.price)
        .bind(patch.description)
        .bind(patch.images)
        .bind(set_video)
        .bind(video_url)
        .bind(stock)
        .bind(patch.is_featured)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        tracing::info!(product_id = %id, "Updated product");
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: ProductId::new("p-1"),
            title: "Saffron Dusk".into(),
            category: "Perfumes".into(),
            sub_category: "Designer Brands".into(),
            price: Decimal::new(150_000, 2),
            description: String::new(),
            images: vec!["a.jpg".into(), "b.jpg".into()],
            video_url: None,
            stock: 2,
            is_featured: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_product() {
        let product = Product::try_from(row()).unwrap();
        assert_eq!(product.category, Category::Perfumes);
        assert_eq!(product.sub_category, SubCategory::DesignerBrands);
        assert_eq!(product.price.to_string(), "1,500");
        assert_eq!(product.images.len(), 2);
    }

    #[test]
    fn unknown_category_is_corruption() {
        let mut bad = row();
        bad.category = "Candles".into();
        assert!(matches!(
            Product::try_from(bad),
            Err(CatalogError::DataCorruption(_))
        ));
    }

    #[test]
    fn negative_values_are_corruption() {
        let mut bad = row();
        bad.stock = -1;
        assert!(matches!(
            Product::try_from(bad),
            Err(CatalogError::DataCorruption(_))
        ));

        let mut bad = row();
        bad.price = Decimal::new(-1, 0);
        assert!(matches!(
            Product::try_from(bad),
            Err(CatalogError::DataCorruption(_))
        ));
    }

    #[test]
    fn oversized_stock_is_rejected() {
        assert!(matches!(stock_column(u32::MAX), Err(CatalogError::Invalid(_))));
        assert_eq!(stock_column(12).unwrap(), 12);
    }
}
