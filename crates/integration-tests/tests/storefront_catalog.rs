//! Storefront pages over an in-memory catalog.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use twinkle_catalog::{MemoryProductStore, ProductStore};
use twinkle_core::{Category, ProductId};
use twinkle_integration_tests::{body_text, get, product, storefront};

fn catalog() -> MemoryProductStore {
    let mut featured = product("p1", "Amber Nights", Category::Perfumes, "1250");
    featured.is_featured = true;
    let mut sold_out = product("a1", "Silver Chain", Category::Accessories, "300");
    sold_out.stock = 0;
    MemoryProductStore::with_products(vec![featured, sold_out])
}

#[tokio::test]
async fn health_endpoints_answer() {
    let shop = storefront(catalog());

    assert_eq!(get(&shop, "/health", None).await.status(), StatusCode::OK);
    assert_eq!(
        get(&shop, "/health/ready", None).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn home_shows_only_featured_products() {
    let shop = storefront(catalog());

    let body = body_text(get(&shop, "/", None).await).await;

    assert!(body.contains("Amber Nights"));
    assert!(!body.contains("Silver Chain"));
}

#[tokio::test]
async fn category_filter_narrows_the_shop() {
    let shop = storefront(catalog());

    let all = body_text(get(&shop, "/shop", None).await).await;
    assert!(all.contains("Amber Nights"));
    assert!(all.contains("Silver Chain"));

    let accessories = body_text(get(&shop, "/shop?category=Accessories", None).await).await;
    assert!(accessories.contains("Silver Chain"));
    assert!(!accessories.contains("Amber Nights"));
}

#[tokio::test]
async fn deleted_product_leaves_the_next_page_load() {
    let products = catalog();
    let shop = storefront(products.clone());

    let before = body_text(get(&shop, "/shop", None).await).await;
    assert!(before.contains("Amber Nights"));

    products
        .delete_product(&ProductId::new("p1"))
        .await
        .unwrap();

    let after = body_text(get(&shop, "/shop", None).await).await;
    assert!(!after.contains("Amber Nights"));
    assert!(after.contains("Silver Chain"));
    let home = body_text(get(&shop, "/", None).await).await;
    assert!(!home.contains("Amber Nights"));
}

#[tokio::test]
async fn empty_catalog_shows_empty_state() {
    let shop = storefront(MemoryProductStore::new());

    let response = get(&shop, "/shop?category=Perfumes", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("No products found in this category.")
    );
}

#[tokio::test]
async fn detail_page_links_to_whatsapp() {
    let shop = storefront(catalog());

    let response = get(&shop, "/products/p1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("https://wa.me/201000000000?text="));
    assert!(body.contains("Amber%20Nights%20priced%20at%201250%20EGP"));
}

#[tokio::test]
async fn sold_out_product_says_so() {
    let shop = storefront(catalog());

    let body = body_text(get(&shop, "/products/a1", None).await).await;

    assert!(body.contains("Out of stock"));
}

#[tokio::test]
async fn json_api_lists_products() {
    let shop = storefront(catalog());

    let body = body_text(get(&shop, "/api/products?category=Perfumes", None).await).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["products"].as_array().unwrap().len(), 1);
    assert_eq!(json["products"][0]["title"], "Amber Nights");
}
