//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Home page (hero, featured products)
//! GET  /shop?category=        - Catalog with category filter
//! GET  /products/{id}?image=  - Product detail with gallery selection
//!
//! # JSON API
//! GET  /api/products?category= - Products, filtered in the query
//! GET  /api/products/{id}      - Single product
//! ```

pub mod api;
pub mod home;
pub mod products;
pub mod shop;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(shop::index))
        .route("/products/{id}", get(products::show))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::list))
        .route("/products/{id}", get(api::show))
}
