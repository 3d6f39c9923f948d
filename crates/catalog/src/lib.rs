//! Twinkle Catalog - product access layer.
//!
//! Everything that reads or writes catalog data lives here so the storefront,
//! admin dashboard and CLI all go through the same contracts:
//!
//! - [`store`] - The [`ProductStore`] trait with Postgres and in-memory backends
//! - [`media`] - The [`ObjectStore`] trait for product images (local disk, HTTP bucket)
//! - [`db`] - Connection pool and embedded migrations
//! - [`env`] - Environment helpers shared by the binaries' configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod env;
pub mod error;
pub mod media;
pub mod store;

pub use error::{CatalogError, MediaError};
pub use media::{
    HttpObjectStore, LocalObjectStore, MemoryObjectStore, MockObjectStore, ObjectKey,
    ObjectStore, purge_images, upload_image,
};
pub use store::{MemoryProductStore, MockProductStore, PgProductStore, ProductStore};
