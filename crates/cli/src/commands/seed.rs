//! `twinkle seed <file>`
//!
//! Reads a YAML list of products and inserts each one. Keys are camelCase,
//! matching the JSON the storefront API returns:
//!
//! ```yaml
//! - title: Amber Nights
//!   category: Perfumes
//!   subCategory: Twinkle Blends
//!   price: "1250"
//!   images: ["https://media.example.com/products/amber.jpg"]
//!   stock: 4
//!   isFeatured: true
//! ```
//!
//! The whole file is parsed before anything is written.

use std::path::Path;

use sqlx::PgPool;
use twinkle_catalog::{PgProductStore, ProductStore};
use twinkle_core::NewProduct;

use crate::error::CliError;

pub fn parse(content: &str) -> Result<Vec<NewProduct>, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

pub async fn run(pool: &PgPool, path: &Path) -> Result<(), CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?;
    let products = parse(&content)?;
    tracing::info!(path = %path.display(), count = products.len(), "Parsed seed file");

    let store = PgProductStore::new(pool.clone());
    for product in products {
        let title = product.title.clone();
        let id = store.create_product(product).await?;
        tracing::info!(product_id = %id, title, "Inserted product");
    }

    tracing::info!("Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use twinkle_core::{Category, SubCategory};

    use super::*;

    #[test]
    fn parses_camel_case_products() {
        let products = parse(
            r#"
- title: Amber Nights
  category: Perfumes
  subCategory: Twinkle Blends
  price: "1250"
  images: ["https://media.example.com/products/amber.jpg"]
  stock: 4
  isFeatured: true
- title: Silver Chain
  category: Accessories
  price: "300"
"#,
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].sub_category, SubCategory::TwinkleBlends);
        assert!(products[0].is_featured);
        assert_eq!(products[1].category, Category::Accessories);
        assert_eq!(products[1].stock, 0);
        assert!(products[1].images.is_empty());
    }

    #[test]
    fn rejects_unknown_category() {
        let result = parse(
            r#"
- title: Mystery
  category: Candles
  price: "10"
"#,
        );
        assert!(matches!(result, Err(CliError::Seed(_))));
    }

    #[test]
    fn rejects_negative_price() {
        let result = parse(
            r#"
- title: Refund
  category: Perfumes
  price: "-5"
"#,
        );
        assert!(result.is_err());
    }
}
