//! The product record and the payloads used to create and modify it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId, SubCategory};

/// A catalog product.
///
/// `images` is ordered: the first entry is the cover image and the gallery
/// shows them in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: Category,
    pub sub_category: SubCategory,
    pub price: Price,
    pub description: String,
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub stock: u32,
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The cover image, if the product has any images.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Assemble a stored record from a creation payload.
    #[must_use]
    pub fn from_new(id: ProductId, new: NewProduct, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            title: new.title,
            category: new.category,
            sub_category: new.sub_category,
            price: new.price,
            description: new.description,
            images: new.images,
            video_url: new.video_url,
            stock: new.stock,
            is_featured: new.is_featured,
            created_at,
        }
    }

    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(sub_category) = patch.sub_category {
            self.sub_category = sub_category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(video_url) = patch.video_url {
            self.video_url = video_url;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
    }
}

/// A product that has not been stored yet. The store assigns the id and
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub sub_category: SubCategory,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub is_featured: bool,
}

/// Partial update. `None` leaves the stored value unchanged.
///
/// `video_url` is doubly optional so an update can clear the link:
/// `Some(None)` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub sub_category: Option<SubCategory>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub video_url: Option<Option<String>>,
    pub stock: Option<u32>,
    pub is_featured: Option<bool>,
}

impl ProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
