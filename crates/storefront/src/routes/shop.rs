//! Catalog page with the category filter bar.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use twinkle_core::{CategoryFilter, Product, filter_products};

use crate::filters;
use crate::state::AppState;

const SHOP_PATH: &str = "/shop";

/// Product tile shared by the shop and home pages.
#[derive(Clone)]
pub struct ProductCard {
    pub href: String,
    pub title: String,
    pub category_line: String,
    pub price: String,
    pub cover_image: Option<String>,
    pub in_stock: bool,
}

impl ProductCard {
    pub fn new(product: &Product, currency: &str) -> Self {
        Self {
            href: format!("/products/{}", urlencoding::encode(product.id.as_str())),
            title: product.title.clone(),
            category_line: category_line(product),
            price: price_label(product, currency),
            cover_image: product.cover_image().map(str::to_owned),
            in_stock: product.in_stock(),
        }
    }
}

/// `Perfumes • Twinkle Blends`, or just the category when there is no
/// sub-category.
pub fn category_line(product: &Product) -> String {
    if product.sub_category.is_specified() {
        format!("{} • {}", product.category, product.sub_category)
    } else {
        product.category.to_string()
    }
}

pub fn price_label(product: &Product, currency: &str) -> String {
    format!("{} {currency}", product.price)
}

/// One entry in the filter bar.
#[derive(Clone)]
pub struct FilterLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

fn filter_links(selected: Option<CategoryFilter>) -> Vec<FilterLink> {
    CategoryFilter::options()
        .into_iter()
        .map(|option| FilterLink {
            label: option.label(),
            href: option.href(SHOP_PATH),
            active: selected == Some(option),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub heading: String,
    pub filters: Vec<FilterLink>,
    pub products: Vec<ProductCard>,
    pub unavailable: bool,
}

/// Render the catalog, narrowed by `?category=`.
///
/// An unrecognized category renders the empty state. A store failure renders
/// an explicit unavailable notice with status 503.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ShopQuery>) -> Response {
    let filter = CategoryFilter::from_query(query.category.as_deref()).ok();
    let heading = filter.map_or("Our Collection", |f| match f {
        CategoryFilter::All => "Our Collection",
        CategoryFilter::Only(category) => category.as_str(),
    });

    let mut template = ShopTemplate {
        heading: heading.to_string(),
        filters: filter_links(filter),
        products: Vec::new(),
        unavailable: false,
    };

    let Some(filter) = filter else {
        tracing::debug!(category = ?query.category, "Unknown category requested");
        return template.into_response();
    };

    match state.catalog().full_list(state.products()).await {
        Ok(all) => {
            let currency = state.checkout().currency();
            template.products = filter_products(&all, filter)
                .into_iter()
                .map(|p| ProductCard::new(p, currency))
                .collect();
            template.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog");
            template.unavailable = true;
            (StatusCode::SERVICE_UNAVAILABLE, template).into_response()
        }
    }
}
