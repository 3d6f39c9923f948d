//! Category filtering over a fetched product set.
//!
//! The shop fetches the full list once and narrows it in memory, so switching
//! categories never goes back to the store.

use crate::product::Product;
use crate::types::{Category, CategoryError};

/// The shop's category selection. `All` is the absence of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Interpret the `category` query parameter.
    ///
    /// A missing, empty, or `All` value means no filter.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::UnknownCategory`] for any other unrecognized value.
    pub fn from_query(value: Option<&str>) -> Result<Self, CategoryError> {
        match value.map(str::trim) {
            None | Some("" | "All") => Ok(Self::All),
            Some(name) => name.parse().map(Self::Only),
        }
    }

    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::All => None,
            Self::Only(category) => Some(category),
        }
    }

    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        self.category().is_none_or(|c| product.category == c)
    }

    /// Label shown in the filter bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.as_str(),
        }
    }

    /// Shareable link for this filter. `All` clears the parameter.
    #[must_use]
    pub fn href(self, base: &str) -> String {
        match self {
            Self::All => base.to_owned(),
            Self::Only(category) => {
                format!("{base}?category={}", urlencoding::encode(category.as_str()))
            }
        }
    }

    /// Every selectable filter, `All` first.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }
}

/// Products matching `filter`, in their original order.
#[must_use]
pub fn filter_products(products: &[Product], filter: CategoryFilter) -> Vec<&Product> {
    products.iter().filter(|p| filter.matches(p)).collect()
}

/// Products flagged for the home page, in their original order.
#[must_use]
pub fn featured_products(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_featured).collect()
}
