//! JSON product API.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use twinkle_core::{CategoryFilter, Product, ProductId};

use super::shop::ShopQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

/// `GET /api/products?category=` - filtered in the query, not from the cache.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Json<ProductList>> {
    let filter = CategoryFilter::from_query(query.category.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let products = state.products().list_products(filter).await?;
    Ok(Json(ProductList { products }))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .products()
        .get_product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
