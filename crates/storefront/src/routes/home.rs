//! Home page: hero and featured products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;
use twinkle_core::featured_products;

use super::shop::ProductCard;
use crate::filters;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCard>,
}

/// Render the home page.
///
/// The hero never depends on the store; a failed fetch only hides the
/// featured row.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = match state.catalog().full_list(state.products()).await {
        Ok(all) => featured_products(&all)
            .into_iter()
            .map(|p| ProductCard::new(p, state.checkout().currency()))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load featured products");
            Vec::new()
        }
    };

    HomeTemplate { featured }
}
