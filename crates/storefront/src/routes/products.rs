//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use twinkle_core::{Gallery, Product, ProductId};

use super::shop::{category_line, price_label};
use crate::filters;
use crate::state::AppState;

/// Shown under the order button on every product.
pub const DELIVERY_NOTE: &str = "Delivery within 2-4 business days. Cash on delivery available.";

#[derive(Clone)]
pub struct Thumbnail {
    pub href: String,
    pub url: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    /// Kept as text so a hand-edited value falls back to the cover image
    /// instead of rejecting the request.
    pub image: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub title: String,
    pub category_line: String,
    pub price: String,
    pub description: String,
    pub active_image: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub in_stock: bool,
    pub video_url: Option<String>,
    pub whatsapp_url: String,
    pub delivery_note: &'static str,
}

impl ProductTemplate {
    fn new(product: &Product, selection: Option<usize>, state: &AppState) -> Self {
        let gallery = Gallery::with_selection(&product.images, selection);
        let base = format!("/products/{}", urlencoding::encode(product.id.as_str()));

        let thumbnails = if gallery.has_thumbnails() {
            gallery
                .thumbnails()
                .map(|(index, url, active)| Thumbnail {
                    href: format!("{base}?image={index}"),
                    url: url.to_owned(),
                    active,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            title: product.title.clone(),
            category_line: category_line(product),
            price: price_label(product, state.checkout().currency()),
            description: product.description.clone(),
            active_image: gallery.active().map(str::to_owned),
            thumbnails,
            in_stock: product.in_stock(),
            video_url: product.video_url.clone(),
            whatsapp_url: state.checkout().order_url(product),
            delivery_note: DELIVERY_NOTE,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "unavailable.html")]
pub struct UnavailableTemplate;

/// Render a product by id, with `?image=i` choosing the large image.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Response {
    let id = ProductId::new(id);
    let selection = query.image.as_deref().and_then(|i| i.parse().ok());

    match state.products().get_product(&id).await {
        Ok(Some(product)) => ProductTemplate::new(&product, selection, &state).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, NotFoundTemplate).into_response(),
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to load product");
            (StatusCode::SERVICE_UNAVAILABLE, UnavailableTemplate).into_response()
        }
    }
}
