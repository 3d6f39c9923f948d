//! Admin form draft.
//!
//! The draft holds what the admin has typed so far, including text that does
//! not parse yet, so the form can be re-rendered without losing input.
//! Only [`ProductDraft::submission`] decides whether it is ready to be stored.

use serde::{Deserialize, Serialize};

use crate::product::{NewProduct, Product, ProductPatch};
use crate::types::{Category, Price, ProductId, SubCategory};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Set when editing an existing product.
    pub id: Option<ProductId>,
    pub title: String,
    pub category: Category,
    pub sub_category: SubCategory,
    /// Raw price text.
    pub price: String,
    pub description: String,
    pub images: Vec<String>,
    pub video_url: String,
    /// Raw stock text. Blank or unparseable counts as zero.
    pub stock: String,
    pub is_featured: bool,
}

/// What saving a complete draft should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftSubmission {
    Create(NewProduct),
    Update(ProductId, ProductPatch),
}

impl ProductDraft {
    /// Load an existing product for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            title: product.title.clone(),
            category: product.category,
            sub_category: product.sub_category,
            price: product.price.plain(),
            description: product.description.clone(),
            images: product.images.clone(),
            video_url: product.video_url.clone().unwrap_or_default(),
            stock: product.stock.to_string(),
            is_featured: product.is_featured,
        }
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn push_image(&mut self, url: impl Into<String>) {
        self.images.push(url.into());
    }

    /// Drop the image at `index`. Out-of-range indexes change nothing.
    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Turn the draft into a store operation.
    ///
    /// Returns `None` while the title is blank or the price is missing, zero,
    /// or not a valid positive amount. The caller treats that as "nothing
    /// to save" rather than an error.
    #[must_use]
    pub fn submission(&self) -> Option<DraftSubmission> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let price: Price = self.price.parse().ok().filter(|p: &Price| !p.is_zero())?;

        let video_url = Some(self.video_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        let product = NewProduct {
            title: title.to_owned(),
            category: self.category,
            sub_category: self.sub_category,
            price,
            description: self.description.trim().to_owned(),
            images: self.images.clone(),
            video_url,
            stock: self.stock.trim().parse().unwrap_or(0),
            is_featured: self.is_featured,
        };

        Some(match &self.id {
            None => DraftSubmission::Create(product),
            Some(id) => DraftSubmission::Update(id.clone(), ProductPatch::from(product)),
        })
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(product: NewProduct) -> Self {
        Self {
            title: Some(product.title),
            category: Some(product.category),
            sub_category: Some(product.sub_category),
            price: Some(product.price),
            description: Some(product.description),
            images: Some(product.images),
            video_url: Some(product.video_url),
            stock: Some(product.stock),
            is_featured: Some(product.is_featured),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn filled() -> ProductDraft {
        ProductDraft {
            title: "Amber Nights".to_owned(),
            price: "1250".to_owned(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn defaults_match_a_fresh_form() {
        let draft = ProductDraft::default();
        assert_eq!(draft.category, Category::Perfumes);
        assert_eq!(draft.sub_category, SubCategory::Unspecified);
        assert!(draft.images.is_empty());
        assert!(!draft.is_featured);
        assert!(!draft.is_editing());
    }

    #[test]
    fn missing_title_or_price_is_not_submittable() {
        let mut draft = filled();
        draft.title = "   ".to_owned();
        assert!(draft.submission().is_none());

        let mut draft = filled();
        draft.price = String::new();
        assert!(draft.submission().is_none());

        let mut draft = filled();
        draft.price = "-3".to_owned();
        assert!(draft.submission().is_none());

        let mut draft = filled();
        draft.price = "0".to_owned();
        assert!(draft.submission().is_none());

        let mut draft = filled();
        draft.price = "12.345".to_owned();
        assert!(draft.submission().is_none());
    }

    #[test]
    fn new_draft_creates() {
        let Some(DraftSubmission::Create(product)) = filled().submission() else {
            panic!("expected a create submission");
        };
        assert_eq!(product.title, "Amber Nights");
        assert_eq!(product.price, "1250".parse().unwrap());
        assert_eq!(product.stock, 0);
        assert!(product.video_url.is_none());
    }

    #[test]
    fn draft_with_id_updates() {
        let mut draft = filled();
        draft.id = Some(ProductId::new("p-9"));
        draft.stock = "4".to_owned();
        let Some(DraftSubmission::Update(id, patch)) = draft.submission() else {
            panic!("expected an update submission");
        };
        assert_eq!(id.as_str(), "p-9");
        assert_eq!(patch.stock, Some(4));
        assert_eq!(patch.video_url, Some(None));
    }

    #[test]
    fn images_append_and_remove_by_index() {
        let mut draft = filled();
        draft.push_image("one.jpg");
        draft.push_image("two.jpg");
        draft.push_image("three.jpg");
        draft.remove_image(1);
        assert_eq!(draft.images, vec!["one.jpg", "three.jpg"]);
        draft.remove_image(10);
        assert_eq!(draft.images.len(), 2);
    }

    #[test]
    fn editing_round_trips_a_product() {
        let mut draft = filled();
        draft.push_image("cover.jpg");
        let Some(DraftSubmission::Create(new)) = draft.submission() else {
            panic!("expected a create submission");
        };
        let product = Product::from_new(ProductId::new("p-1"), new, None);

        let editing = ProductDraft::from_product(&product);
        assert!(editing.is_editing());
        assert_eq!(editing.price, "1250");
        assert_eq!(editing.images, vec!["cover.jpg"]);
    }
}
