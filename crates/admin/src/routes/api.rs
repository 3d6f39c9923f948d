//! JSON endpoints for scripted catalog checks. Admin only.

use axum::{Json, Router, extract::State, routing::get};
use twinkle_core::{CategoryFilter, Product};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/products", get(list_products))
}

/// GET /api/products - every product, newest first.
async fn list_products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        state.products().list_products(CategoryFilter::All).await?,
    ))
}
