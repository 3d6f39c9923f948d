//! Error types for the product access layer.

use thiserror::Error;

/// Errors from a [`ProductStore`](crate::ProductStore).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a product.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The input cannot be stored as given (e.g. stock beyond the column range).
    #[error("invalid product: {0}")]
    Invalid(String),

    #[error("product not found")]
    NotFound,

    #[error("product store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from an [`ObjectStore`](crate::ObjectStore).
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    #[error("upload is empty")]
    Empty,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage rejected {key} with status {status}")]
    Rejected { key: String, status: u16 },

    #[error("invalid storage URL: {0}")]
    Url(#[from] url::ParseError),
}
